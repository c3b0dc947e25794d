//! Playback orchestrator: the per-session state machine.
//!
//! States per session: Idle / Playing, Idle initially. The queue and
//! playing slot are exclusively owned by this component; every
//! transition runs with the session's mutex held, which makes
//! transitions totally ordered per session. The two operations that
//! arrive from foreign contexts are marshalled first:
//!
//!   - track resolution (slow, network-bound) runs before the session
//!     lock is taken, so one slow lookup never stalls other sessions;
//!   - transport completion callbacks post a message into the
//!     completion channel; the driver task spawned at construction
//!     performs the actual transition.
//!
//! Transitions:
//!   1. enqueue — never starts playback by itself;
//!   2. maybe-start — Idle + non-empty queue only: pop head, occupy
//!      the playing slot, issue the transport start;
//!   3. completion — empty room ⇒ leave (queue untouched, takes
//!      precedence); else next track ⇒ advance; else classify the end
//!      as normal (disconnect) or abnormal (stay connected, idle);
//!   4. skip — a deliberate trigger of (3) via transport stop, never a
//!      second advance path;
//!   5. leave — disconnect, clear, reset, from any state.

use crate::error::{PlayerError, Result};
use crate::events::{CompletionSender, PlayerNotification, TrackEnd};
use crate::outcome::{
    JoinOutcome, LeaveOutcome, NowPlaying, PlayOutcome, QueueView, RemoveOutcome, SelectOutcome,
    ShuffleOutcome, SkipOutcome,
};
use crate::settings::PlayerSettings;
use crate::transport::{ChannelRef, VoiceTransport};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use voxresolver::{Track, TrackCandidate, TrackResolver};
use voxsession::{PromptId, Session, SessionId, SessionStore};

/// Capacity of the notification channel; laggards lose old events,
/// they never block the orchestrator.
const NOTIFY_CAPACITY: usize = 64;

/// The playback state machine over all sessions.
pub struct Orchestrator {
    store: Arc<SessionStore>,
    resolver: Arc<TrackResolver>,
    transport: Arc<dyn VoiceTransport>,
    settings: PlayerSettings,
    completion_tx: CompletionSender,
    notify_tx: broadcast::Sender<PlayerNotification>,
}

impl Orchestrator {
    /// Builds the orchestrator with tunables from `voxconfig` and
    /// spawns its completion driver task. Requires a running tokio
    /// runtime.
    pub fn new(
        store: Arc<SessionStore>,
        resolver: Arc<TrackResolver>,
        transport: Arc<dyn VoiceTransport>,
    ) -> Arc<Self> {
        Self::with_settings(store, resolver, transport, PlayerSettings::from_config())
    }

    /// Same as [`Orchestrator::new`] with explicit tunables.
    pub fn with_settings(
        store: Arc<SessionStore>,
        resolver: Arc<TrackResolver>,
        transport: Arc<dyn VoiceTransport>,
        settings: PlayerSettings,
    ) -> Arc<Self> {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (notify_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        let this = Arc::new(Self {
            store,
            resolver,
            transport,
            settings,
            completion_tx,
            notify_tx,
        });
        tokio::spawn(Self::drive_completions(
            Arc::downgrade(&this),
            completion_rx,
        ));
        this
    }

    /// Sender the transport integration uses to post end-of-track
    /// signals. Signals are processed by the driver task, never inline.
    pub fn completion_sender(&self) -> CompletionSender {
        self.completion_tx.clone()
    }

    /// Subscribes to notifications for transitions that happen outside
    /// any command call.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerNotification> {
        self.notify_tx.subscribe()
    }

    // ============ User actions ============

    /// Resolve a query and enqueue the result; start playback when the
    /// session was idle (connecting on demand).
    ///
    /// Resolution failures surface before any queue mutation. A
    /// connect failure after enqueue leaves the track queued for a
    /// retry once the caller joins a voice channel.
    pub async fn play(
        &self,
        session_id: SessionId,
        query: &str,
        requester: &str,
        channel: ChannelRef,
    ) -> Result<PlayOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlayerError::InvalidRequest(
                "usage: play <keywords or direct link>".to_string(),
            ));
        }

        // Off the session lock: slow, and other sessions must not wait.
        let track = self.resolver.resolve(query, requester).await?;

        let handle = self.store.get(session_id).await;
        let mut session = handle.lock().await;
        let title = track.title.clone();
        let position = session.enqueue(track);
        debug!(
            session = session_id,
            title = title.as_str(),
            position,
            "queued track"
        );

        let started = self.maybe_start(session_id, &mut session, channel).await?;
        Ok(PlayOutcome {
            title,
            requester: requester.to_string(),
            position,
            started,
        })
    }

    /// Top-N search, for the command surface to render as a prompt.
    pub async fn search(&self, query: &str) -> Result<Vec<TrackCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlayerError::InvalidRequest(
                "usage: search <keywords>".to_string(),
            ));
        }
        Ok(self
            .resolver
            .resolve_top(query, self.settings.search_width)
            .await?)
    }

    /// Attaches a candidate list to an outstanding prompt.
    pub async fn register_prompt(
        &self,
        session_id: SessionId,
        prompt: PromptId,
        candidates: Vec<TrackCandidate>,
    ) {
        let handle = self.store.get(session_id).await;
        handle.lock().await.selection_mut().register(prompt, candidates);
    }

    /// Resolves a discrete user choice against a registered prompt.
    ///
    /// Unknown prompt or out-of-range choice is stale/foreign input:
    /// deliberately ignored. A valid choice is revalidated through the
    /// resolver before it may enter the queue — listed stream URLs go
    /// stale between listing and selection.
    pub async fn select(
        &self,
        session_id: SessionId,
        prompt: PromptId,
        choice: usize,
        requester: &str,
        channel: ChannelRef,
    ) -> Result<SelectOutcome> {
        let handle = self.store.get(session_id).await;
        let candidate = handle.lock().await.selection().resolve_choice(prompt, choice);
        let Some(candidate) = candidate else {
            debug!(
                session = session_id,
                prompt, choice, "ignoring stale or foreign selection"
            );
            return Ok(SelectOutcome::Ignored);
        };

        // Off the session lock, like any resolution.
        let track = self.resolver.revalidate(&candidate, requester).await?;

        let mut session = handle.lock().await;
        let title = track.title.clone();
        let position = session.enqueue(track);
        let started = self.maybe_start(session_id, &mut session, channel).await?;
        Ok(SelectOutcome::Queued {
            title,
            position,
            started,
        })
    }

    /// Skip the current track: force a transport stop and let the
    /// completion path perform the (single) advance.
    pub async fn skip(&self, session_id: SessionId) -> Result<SkipOutcome> {
        if !self.transport.is_connected(session_id).await {
            return Err(PlayerError::NotConnected);
        }
        if !self.transport.is_playing(session_id).await {
            return Ok(SkipOutcome::NothingPlaying);
        }

        let title = {
            let handle = self.store.get(session_id).await;
            let session = handle.lock().await;
            session.current().map(|t| t.title.clone())
        };

        info!(session = session_id, "skip requested, stopping transport");
        self.transport.stop(session_id).await?;
        Ok(SkipOutcome::Skipped { title })
    }

    /// Remove the queue entry at `index` (0-based). Never touches the
    /// currently playing track.
    pub async fn remove(&self, session_id: SessionId, index: usize) -> Result<RemoveOutcome> {
        let handle = self.store.get(session_id).await;
        let mut session = handle.lock().await;
        match session.remove(index) {
            Some(track) => Ok(RemoveOutcome {
                index,
                title: track.title,
            }),
            None => Err(PlayerError::InvalidRequest(format!(
                "no queue entry at index {index}"
            ))),
        }
    }

    /// Shuffle the not-yet-playing queue.
    pub async fn shuffle(&self, session_id: SessionId) -> Result<ShuffleOutcome> {
        let handle = self.store.get(session_id).await;
        let mut session = handle.lock().await;
        if session.queue_len() < 2 {
            return Err(PlayerError::InvalidRequest(
                "nothing to shuffle".to_string(),
            ));
        }
        session.shuffle();
        Ok(ShuffleOutcome {
            shuffled: session.queue_len(),
        })
    }

    /// Current playing track and queue snapshot.
    pub async fn list(&self, session_id: SessionId) -> QueueView {
        let handle = self.store.get(session_id).await;
        let session = handle.lock().await;
        QueueView {
            now_playing: session.current().map(|t| NowPlaying {
                title: t.title.clone(),
                requester: t.requester.clone(),
            }),
            entries: session.queue_snapshot(),
        }
    }

    /// Connect to a voice channel; idempotent when already connected.
    pub async fn join(&self, session_id: SessionId, channel: ChannelRef) -> Result<JoinOutcome> {
        if self.transport.is_connected(session_id).await {
            return Ok(JoinOutcome::AlreadyConnected);
        }
        self.transport.connect(session_id, channel).await?;
        info!(session = session_id, channel = channel.0, "joined voice channel");
        Ok(JoinOutcome::Connected)
    }

    /// Explicit leave: disconnect, clear the queue, reset the playing
    /// slot, whatever the prior state.
    pub async fn leave(&self, session_id: SessionId) -> Result<LeaveOutcome> {
        if !self.transport.is_connected(session_id).await {
            return Err(PlayerError::NotConnected);
        }
        let handle = self.store.get(session_id).await;
        let mut session = handle.lock().await;
        self.transport.disconnect(session_id).await?;
        let cleared = session.clear_queue();
        session.take_current();
        info!(session = session_id, cleared, "left voice channel");
        Ok(LeaveOutcome { cleared })
    }

    // ============ Transitions ============

    /// Transition 2. No-op unless the session is idle with a non-empty
    /// queue. Connects on demand, then starts the queue head.
    async fn maybe_start(
        &self,
        session_id: SessionId,
        session: &mut Session,
        channel: ChannelRef,
    ) -> Result<bool> {
        if session.is_playing() || !session.has_next() {
            return Ok(false);
        }
        if !self.transport.is_connected(session_id).await {
            self.transport.connect(session_id, channel).await?;
        }
        Ok(self.start_next(session_id, session).await)
    }

    /// Pops the queue head into the playing slot and issues the
    /// transport start. The slot is occupied before the start call;
    /// a synchronous start failure posts a synthetic completion so the
    /// session recovers through the normal completion path instead of
    /// staying wedged in Playing with no signal ever coming.
    async fn start_next(&self, session_id: SessionId, session: &mut Session) -> bool {
        let Some(mut track) = session.pop_next() else {
            return false;
        };
        track.mark_started();
        let title = track.title.clone();
        let requester = track.requester.clone();
        let stream_url = track.stream_url.clone();
        session.set_current(track);

        info!(session = session_id, title = title.as_str(), "starting playback");
        if let Err(e) = self.transport.start_playback(session_id, &stream_url).await {
            warn!(
                session = session_id,
                title = title.as_str(),
                "transport start failed ({e}), posting synthetic completion"
            );
            let _ = self.completion_tx.send(TrackEnd {
                session: session_id,
                error: Some(e.to_string()),
            });
        }
        let _ = self.notify_tx.send(PlayerNotification::TrackStarted {
            session: session_id,
            title,
            requester,
        });
        true
    }

    /// Driver task: receives end-of-track signals and runs transition
    /// 3 for each, after the settle delay. Holds only a weak reference
    /// so dropping the orchestrator shuts the task down.
    async fn drive_completions(
        this: Weak<Self>,
        mut completion_rx: mpsc::UnboundedReceiver<TrackEnd>,
    ) {
        while let Some(end) = completion_rx.recv().await {
            let Some(this) = this.upgrade() else {
                break;
            };
            // Each signal settles independently so one session's
            // debounce never delays another's.
            tokio::spawn(async move {
                if let Some(cause) = &end.error {
                    warn!(
                        session = end.session,
                        cause = cause.as_str(),
                        "track ended abnormally"
                    );
                }
                tokio::time::sleep(this.settings.settle_delay).await;
                this.handle_track_end(end.session).await;
            });
        }
    }

    /// Transition 3: advance-or-stop after a completion signal.
    async fn handle_track_end(&self, session_id: SessionId) {
        let handle = self.store.get(session_id).await;
        let mut session = handle.lock().await;
        let ended = session.take_current();

        // 3a — an empty room wins over everything: leave immediately,
        // even with tracks still queued. The queue is left untouched.
        let humans = self
            .transport
            .participants(session_id)
            .await
            .iter()
            .filter(|p| !p.is_bot)
            .count();
        if humans == 0 {
            info!(session = session_id, "no listeners left, leaving immediately");
            if self.transport.is_connected(session_id).await {
                if let Err(e) = self.transport.disconnect(session_id).await {
                    warn!(session = session_id, "disconnect failed: {e}");
                }
            }
            let _ = self
                .notify_tx
                .send(PlayerNotification::SessionAbandoned { session: session_id });
            return;
        }

        // 3b — next track queued: advance, stay Playing.
        if session.has_next() {
            self.start_next(session_id, &mut session).await;
            return;
        }

        // 3c — queue dry: classify the end. A normal end leaves the
        // channel; an abnormal one (likely a broken stream) stays
        // connected and idle so a retry does not thrash join/leave.
        if is_normal_end(ended.as_ref(), self.settings.normal_end_ratio) {
            info!(session = session_id, "queue finished, disconnecting");
            if let Err(e) = self.transport.disconnect(session_id).await {
                warn!(session = session_id, "disconnect failed: {e}");
            }
            let _ = self.notify_tx.send(PlayerNotification::QueueFinished {
                session: session_id,
                disconnected: true,
            });
        } else {
            warn!(
                session = session_id,
                "early end of playback, staying connected for a retry"
            );
            let _ = self.notify_tx.send(PlayerNotification::QueueFinished {
                session: session_id,
                disconnected: false,
            });
        }
    }
}

/// Normal iff announced duration and elapsed play time are both known
/// and elapsed reached `ratio` of the announced duration. Any missing
/// value means abnormal: upstream duration metadata is unreliable.
fn is_normal_end(ended: Option<&Track>, ratio: f64) -> bool {
    let Some(track) = ended else {
        return false;
    };
    match (track.duration_secs, track.elapsed_secs()) {
        (Some(duration), Some(elapsed)) if duration > 0 => {
            elapsed >= ratio * duration as f64
        }
        _ => false,
    }
}
