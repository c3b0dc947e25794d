//! # voxsession - Per-session playback state for VoxQueue
//!
//! Pure bookkeeping, no business logic: the per-session queue and
//! playing slot (`Session`), the search-prompt selection registry
//! (`SelectionRegistry`), and the process-wide get-or-create store
//! (`SessionStore`). Transition decisions live in `voxplayer`; the
//! resolver output shape comes from `voxresolver`.

pub mod selection;
pub mod session;
pub mod store;

pub use selection::{PromptId, SelectionRegistry};
pub use session::{QueueEntry, Session, SessionId};
pub use store::{SessionHandle, SessionStore};
