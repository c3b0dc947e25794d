//! Structured command outcomes.
//!
//! The core is pure with respect to chat formatting: every user action
//! returns one of these plain-data results and the command surface
//! decides how to render it.

use serde::Serialize;
use voxsession::QueueEntry;

/// Result of a `play` request.
#[derive(Debug, Clone, Serialize)]
pub struct PlayOutcome {
    pub title: String,
    pub requester: String,
    /// 1-based queue position at enqueue time.
    pub position: usize,
    /// True when this request transitioned the session to playing.
    pub started: bool,
}

/// Result of a selection against a search prompt.
#[derive(Debug, Clone, Serialize)]
pub enum SelectOutcome {
    /// Stale or foreign input (unknown prompt, out-of-range choice):
    /// deliberately ignored, nothing to report to the user.
    Ignored,
    /// The chosen candidate was revalidated and queued.
    Queued {
        title: String,
        position: usize,
        started: bool,
    },
}

/// Result of a `skip` request.
#[derive(Debug, Clone, Serialize)]
pub enum SkipOutcome {
    /// Connected but idle: nothing to skip.
    NothingPlaying,
    /// Stop issued; the completion path performs the advance.
    Skipped { title: Option<String> },
}

/// Result of a `remove` request.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutcome {
    /// 0-based index that was removed.
    pub index: usize,
    pub title: String,
}

/// Result of a `shuffle` request.
#[derive(Debug, Clone, Serialize)]
pub struct ShuffleOutcome {
    /// Number of entries shuffled.
    pub shuffled: usize,
}

/// Result of a `join` request.
#[derive(Debug, Clone, Serialize)]
pub enum JoinOutcome {
    Connected,
    AlreadyConnected,
}

/// Result of a `leave` request.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveOutcome {
    /// Number of queued tracks discarded.
    pub cleared: usize,
}

/// The currently playing track, for `list`.
#[derive(Debug, Clone, Serialize)]
pub struct NowPlaying {
    pub title: String,
    pub requester: String,
}

/// Snapshot of a session's playback state, for `list`.
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    pub now_playing: Option<NowPlaying>,
    pub entries: Vec<QueueEntry>,
}

impl QueueView {
    /// True when there is nothing playing and nothing queued.
    pub fn is_empty(&self) -> bool {
        self.now_playing.is_none() && self.entries.is_empty()
    }
}
