//! Completion signals and player notifications.
//!
//! The transport's end-of-track callback runs on whatever context the
//! transport owns. It must never mutate session state inline: it posts
//! a [`TrackEnd`] message through the completion sender instead, and
//! the orchestrator's driver task performs the actual transition. This
//! handoff is the load-bearing rule that prevents double-starts and
//! double-pops.

use tokio::sync::mpsc;
use voxsession::SessionId;

/// End-of-track signal, one per successful start.
#[derive(Debug, Clone)]
pub struct TrackEnd {
    pub session: SessionId,
    /// Cause reported by the transport on an abnormal stop; `None` for
    /// a clean stop (natural end or explicit skip).
    pub error: Option<String>,
}

/// Sender half handed to the transport integration.
pub type CompletionSender = mpsc::UnboundedSender<TrackEnd>;

/// Events emitted for transitions that happen outside any command
/// call (auto-advance, departure), so the command surface can render
/// them. Subscribers that lag or disappear never block the
/// orchestrator.
#[derive(Debug, Clone)]
pub enum PlayerNotification {
    /// A track began playing (first start or auto-advance).
    TrackStarted {
        session: SessionId,
        title: String,
        requester: String,
    },
    /// The queue ran dry with listeners still present.
    QueueFinished {
        session: SessionId,
        /// True when the end was classified normal and the transport
        /// was proactively disconnected.
        disconnected: bool,
    },
    /// The channel had no human listeners left at completion time.
    SessionAbandoned { session: SessionId },
}
