//! Per-session playback state.
//!
//! A `Session` is pure bookkeeping: the FIFO queue of not-yet-started
//! tracks, the slot for the currently playing track, and the selection
//! registry for outstanding search prompts. It never talks to the
//! transport and never decides transitions — that is the orchestrator's
//! job. All operations are plain structural mutations on in-memory data.
//!
//! Invariants maintained by construction:
//!   - the queue only ever holds tracks that have not started playing;
//!   - the currently playing track lives in its own slot, never in the
//!     queue;
//!   - the session is "playing" exactly when that slot is occupied.

use crate::selection::SelectionRegistry;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::VecDeque;
use voxresolver::Track;

/// Stable identifier of a playback session (one per guild/room).
pub type SessionId = u64;

/// One queued track as exposed to the command surface.
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    /// 1-based position in the queue
    pub position: usize,
    pub title: String,
    pub requester: String,
    pub duration_secs: Option<u64>,
}

/// Per-session playback context.
#[derive(Debug, Default)]
pub struct Session {
    id: SessionId,
    queue: VecDeque<Track>,
    current: Option<Track>,
    selection: SelectionRegistry,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            queue: VecDeque::new(),
            current: None,
            selection: SelectionRegistry::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    // ============ Playing slot ============

    /// True while a track occupies the playing slot.
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// The currently playing track, if any.
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Puts a track into the playing slot.
    pub fn set_current(&mut self, track: Track) {
        self.current = Some(track);
    }

    /// Empties the playing slot, returning the track that was playing.
    pub fn take_current(&mut self) -> Option<Track> {
        self.current.take()
    }

    // ============ Queue ============

    /// Appends a track. Returns its 1-based queue position. Enqueueing
    /// never starts playback by itself.
    pub fn enqueue(&mut self, track: Track) -> usize {
        self.queue.push_back(track);
        self.queue.len()
    }

    /// Pops the queue head (the next track to play).
    pub fn pop_next(&mut self) -> Option<Track> {
        self.queue.pop_front()
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Removes the track at `index` (0-based). `None` when out of range.
    /// Never touches the currently playing track.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.queue.len() {
            self.queue.remove(index)
        } else {
            None
        }
    }

    /// Shuffles the not-yet-playing queue in place.
    pub fn shuffle(&mut self) {
        self.queue.make_contiguous().shuffle(&mut rand::rng());
    }

    /// Clears the queue (explicit leave). The playing slot is handled
    /// separately by the caller.
    pub fn clear_queue(&mut self) -> usize {
        let cleared = self.queue.len();
        self.queue.clear();
        cleared
    }

    /// Read-only view of the queue for the command surface.
    pub fn queue_snapshot(&self) -> Vec<QueueEntry> {
        self.queue
            .iter()
            .enumerate()
            .map(|(i, track)| QueueEntry {
                position: i + 1,
                title: track.title.clone(),
                requester: track.requester.clone(),
                duration_secs: track.duration_secs,
            })
            .collect()
    }

    // ============ Selection ============

    pub fn selection(&self) -> &SelectionRegistry {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionRegistry {
        &mut self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxresolver::TrackCandidate;

    fn track(title: &str) -> Track {
        TrackCandidate {
            source_url: format!("https://example.com/{title}"),
            stream_url: format!("https://cdn.example.com/{title}"),
            title: title.to_string(),
            duration_secs: Some(100),
            uploader: None,
        }
        .into_track("tester")
    }

    #[test]
    fn enqueue_reports_one_based_position() {
        let mut session = Session::new(1);
        assert_eq!(session.enqueue(track("a")), 1);
        assert_eq!(session.enqueue(track("b")), 2);
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn queue_conservation_on_enqueue_and_pop() {
        let mut session = Session::new(1);
        session.enqueue(track("a"));
        session.enqueue(track("b"));

        let before = session.queue_len();
        session.enqueue(track("c"));
        assert_eq!(session.queue_len(), before + 1);

        let popped = session.pop_next().unwrap();
        assert_eq!(popped.title, "a");
        assert_eq!(session.queue_len(), before);
    }

    #[test]
    fn pop_is_fifo() {
        let mut session = Session::new(1);
        for name in ["a", "b", "c"] {
            session.enqueue(track(name));
        }
        let order: Vec<String> = std::iter::from_fn(|| session.pop_next())
            .map(|t| t.title)
            .collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn remove_out_of_range_is_none_and_mutates_nothing() {
        let mut session = Session::new(1);
        session.enqueue(track("a"));
        assert!(session.remove(3).is_none());
        assert_eq!(session.queue_len(), 1);

        let removed = session.remove(0).unwrap();
        assert_eq!(removed.title, "a");
        assert_eq!(session.queue_len(), 0);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut session = Session::new(1);
        for i in 0..8 {
            session.enqueue(track(&format!("t{i}")));
        }
        session.shuffle();
        let mut titles: Vec<String> = session
            .queue_snapshot()
            .into_iter()
            .map(|e| e.title)
            .collect();
        titles.sort();
        let expected: Vec<String> = (0..8).map(|i| format!("t{i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn playing_slot_is_separate_from_queue() {
        let mut session = Session::new(1);
        session.enqueue(track("a"));
        assert!(!session.is_playing());

        let next = session.pop_next().unwrap();
        session.set_current(next);
        assert!(session.is_playing());
        assert_eq!(session.queue_len(), 0);

        let ended = session.take_current().unwrap();
        assert_eq!(ended.title, "a");
        assert!(!session.is_playing());
    }

    #[test]
    fn clear_queue_reports_cleared_count() {
        let mut session = Session::new(1);
        session.enqueue(track("a"));
        session.enqueue(track("b"));
        assert_eq!(session.clear_queue(), 2);
        assert!(!session.has_next());
    }
}
