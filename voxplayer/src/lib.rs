//! # voxplayer - Playback orchestrator for VoxQueue
//!
//! The state machine that decides when playback starts, advances, or
//! stops for each session, reconciling concurrent triggers (explicit
//! skip, natural track end, empty-room detection, new enqueue) without
//! double-starting playback or leaking a connection.
//!
//! External collaborators stay behind traits: the audio side behind
//! [`VoiceTransport`], the lookup side behind `voxresolver`'s backend.
//! Every user action is one async method on [`Orchestrator`] returning
//! a structured outcome; rendering is entirely the caller's concern.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxplayer::{ChannelRef, Orchestrator};
//! use voxresolver::{TrackResolver, YtDlpBackend};
//! use voxsession::SessionStore;
//!
//! # async fn example(transport: Arc<dyn voxplayer::VoiceTransport>) -> voxplayer::Result<()> {
//! let store = Arc::new(SessionStore::new());
//! let resolver = Arc::new(TrackResolver::new(Arc::new(YtDlpBackend::from_config())));
//! let orchestrator = Orchestrator::new(store, resolver, transport);
//!
//! let outcome = orchestrator
//!     .play(1001, "daft punk around the world", "ayu", ChannelRef(42))
//!     .await?;
//! println!("queued #{}: {}", outcome.position, outcome.title);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod outcome;
pub mod settings;
pub mod transport;

pub use error::{PlayerError, Result, TransportError};
pub use events::{CompletionSender, PlayerNotification, TrackEnd};
pub use orchestrator::Orchestrator;
pub use outcome::{
    JoinOutcome, LeaveOutcome, NowPlaying, PlayOutcome, QueueView, RemoveOutcome, SelectOutcome,
    ShuffleOutcome, SkipOutcome,
};
pub use settings::PlayerSettings;
pub use transport::{ChannelRef, Participant, VoiceTransport};
