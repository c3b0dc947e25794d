//! Error types for the playback orchestrator.

use thiserror::Error;
use voxresolver::ResolverError;

/// Result type specialised for voxplayer.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Faults reported by the voice-transport collaborator.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The action needed an active connection and none exists.
    #[error("not connected to a voice channel")]
    NotConnected,

    /// Anything else the transport could not do.
    #[error("transport fault: {0}")]
    Fault(String),
}

/// Errors crossing the boundary to the command surface.
///
/// Every variant is retryable by the user; nothing here is
/// process-fatal. Abnormal mid-playback stops never surface through
/// this type — they drive the completion path instead.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Query resolution failed across all access profiles.
    #[error(transparent)]
    Resolution(#[from] ResolverError),

    /// Missing query, out-of-range index, expired prompt: a usage
    /// signal, handled with no state mutation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The action required an active voice connection.
    #[error("not connected to a voice channel")]
    NotConnected,

    /// The transport failed an explicit command (connect, stop, ...).
    #[error("transport fault: {0}")]
    Transport(String),
}

impl From<TransportError> for PlayerError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NotConnected => PlayerError::NotConnected,
            TransportError::Fault(cause) => PlayerError::Transport(cause),
        }
    }
}
