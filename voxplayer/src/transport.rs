//! Voice-transport collaborator boundary.
//!
//! The orchestrator only ever talks to the audio side through
//! [`VoiceTransport`], so the gateway/encoding stack stays swappable
//! and the state machine can be driven by a recording mock in tests.
//! Higher layers must not reach around this trait.

use crate::error::TransportError;
use voxsession::SessionId;

/// Reference to a joinable voice channel, as opaque to the core as a
/// message id: only the transport knows what it denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRef(pub u64);

/// One occupant of a voice channel.
#[derive(Debug, Clone)]
pub struct Participant {
    pub display_name: String,
    /// Automated accounts (including this bot itself) do not count as
    /// an audience.
    pub is_bot: bool,
}

impl Participant {
    pub fn human(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            is_bot: false,
        }
    }

    pub fn bot(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            is_bot: true,
        }
    }
}

/// External audio transport, one logical connection per session.
///
/// Contract expected by the orchestrator:
///   - `start_playback` causes exactly one completion signal per
///     successful start, delivered through the completion sender
///     obtained from the orchestrator (see
///     `Orchestrator::completion_sender`), with an error value on an
///     abnormal stop;
///   - `stop` triggers that same completion signal;
///   - all methods are safe to call for unknown sessions (they report
///     disconnected/idle instead of failing).
#[async_trait::async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn connect(&self, session: SessionId, channel: ChannelRef) -> Result<(), TransportError>;

    async fn start_playback(
        &self,
        session: SessionId,
        stream_url: &str,
    ) -> Result<(), TransportError>;

    async fn stop(&self, session: SessionId) -> Result<(), TransportError>;

    async fn disconnect(&self, session: SessionId) -> Result<(), TransportError>;

    async fn is_connected(&self, session: SessionId) -> bool;

    async fn is_playing(&self, session: SessionId) -> bool;

    /// Current occupants of the connected channel; empty when not
    /// connected.
    async fn participants(&self, session: SessionId) -> Vec<Participant>;
}
