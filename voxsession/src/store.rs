//! Process-wide session registry.
//!
//! One entry per session id, created lazily on first reference and
//! never removed for the life of the process — an idle session costs
//! only its empty-queue memory. The store is an injectable dependency
//! owned by whoever builds the orchestrator; there is no ambient
//! global.
//!
//! The handles it returns (`Arc<Mutex<Session>>`) are the per-session
//! serialization point: every state transition for a session runs with
//! that mutex held, which is what makes transitions totally ordered
//! per session without any cross-session coordination.

use crate::session::{Session, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to one session's state.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Registry of all sessions, keyed by session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create: never fails, idempotent. Two calls with the same
    /// id observe the same session state.
    pub async fn get(&self, id: SessionId) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(&id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock: another task may have created
        // the entry between the two lock acquisitions.
        let handle = sessions
            .entry(id)
            .or_insert_with(|| {
                debug!(session = id, "creating session state");
                Arc::new(Mutex::new(Session::new(id)))
            });
        Arc::clone(handle)
    }

    /// Number of sessions ever referenced.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = SessionStore::new();
        let a = store.get(7).await;
        a.lock().await.enqueue(
            voxresolver::TrackCandidate {
                source_url: "https://example.com/w".to_string(),
                stream_url: "https://cdn.example.com/s".to_string(),
                title: "Song".to_string(),
                duration_secs: None,
                uploader: None,
            }
            .into_track("tester"),
        );

        let b = store.get(7).await;
        // Same instance, same state — never a fresh empty session.
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.lock().await.queue_len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.get(1).await;
        let b = store.get(2).await;
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_gets_converge_on_one_entry() {
        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.get(42).await }));
        }
        let mut first: Option<SessionHandle> = None;
        for h in handles {
            let handle = h.await.unwrap();
            if let Some(ref f) = first {
                assert!(Arc::ptr_eq(f, &handle));
            } else {
                first = Some(handle);
            }
        }
        assert_eq!(store.len().await, 1);
    }
}
