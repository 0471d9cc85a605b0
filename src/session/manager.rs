//! Session manager driving the matchmaking queue lifecycle
//!
//! This module provides the core SessionManager that orchestrates the queue
//! client, the per-session status poll loop, and the elapsed-time ticker.
//! Failures surface through the session snapshot's `error` field; nothing in
//! here panics or throws across the manager boundary.

use crate::client::{JoinQueueRequest, QueueClient, SessionStatusSnapshot};
use crate::config::PollingSettings;
use crate::metrics::MetricsCollector;
use crate::poll::{ElapsedTicker, PollScheduler};
use crate::session::state::{read_session, write_session, SharedSession};
use crate::session::{MatchmakingSession, SessionPhase};
use crate::types::{PoolStats, SessionId, SessionPreferences, SessionStatus};
use crate::utils::is_placeholder_player_id;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// The main session manager.
///
/// Owns the authoritative local session state plus exactly one status poll
/// slot and one ticker slot; repeated `start_session` calls replace those
/// slots rather than accumulate timers.
#[derive(Clone)]
pub struct SessionManager {
    /// Queue service client
    client: Arc<dyn QueueClient>,
    /// Poll intervals and failure bounds
    settings: PollingSettings,
    /// Authoritative local session state
    session: SharedSession,
    /// Status poll slot for the active session
    status_poller: PollScheduler,
    /// Elapsed-time ticker for the active session
    ticker: ElapsedTicker,
    /// Consecutive status-poll failures for the active session
    poll_failures: Arc<AtomicU32>,
    /// Metrics collector for lifecycle and polling data
    metrics: Arc<MetricsCollector>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(client: Arc<dyn QueueClient>, settings: PollingSettings) -> Self {
        let metrics = Arc::new(MetricsCollector::new().unwrap_or_else(|_| {
            warn!("Failed to create metrics collector, using default");
            MetricsCollector::default()
        }));

        Self::with_metrics(client, settings, metrics)
    }

    /// Create a new session manager with an explicit metrics collector
    pub fn with_metrics(
        client: Arc<dyn QueueClient>,
        settings: PollingSettings,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            client,
            settings,
            session: Arc::new(RwLock::new(MatchmakingSession::default())),
            status_poller: PollScheduler::new(),
            ticker: ElapsedTicker::new(),
            poll_failures: Arc::new(AtomicU32::new(0)),
            metrics,
        }
    }

    /// Current session state, cloned atomically
    pub fn snapshot(&self) -> MatchmakingSession {
        read_session(&self.session).clone()
    }

    /// Metrics collector backing this manager
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    /// Whether the status poll loop is live (for observability and tests)
    pub fn has_active_poll_loop(&self) -> bool {
        self.status_poller.is_running()
    }

    /// Whether the elapsed-time ticker is live
    pub fn has_active_ticker(&self) -> bool {
        self.ticker.is_running()
    }

    /// Start tracking a new queue session.
    ///
    /// Any session already being tracked is cancelled first. Validation and
    /// join failures land in the returned snapshot's `error` field; no
    /// background loops are started on failure.
    pub async fn start_session(
        &self,
        player_id: &str,
        preferences: SessionPreferences,
    ) -> MatchmakingSession {
        let already_active = read_session(&self.session).is_active();
        if already_active {
            info!("start_session called with a session in flight, replacing it");
            self.cancel_session().await;
        }

        if is_placeholder_player_id(player_id) {
            warn!(
                "Rejected start_session for placeholder player id '{}'",
                player_id
            );
            self.metrics.session().join_failures_total.inc();
            write_session(&self.session).reset_for_new_attempt();
            return self.finish_session(SessionPhase::Errored, |session| {
                session.error = Some(format!(
                    "invalid player id '{}': not an authenticated account",
                    player_id.trim()
                ));
            });
        }

        info!(
            "Starting queue session - player: '{}', game: '{}', mode: '{}', region: '{}'",
            player_id, preferences.game_id, preferences.game_mode, preferences.region
        );

        // Optimistic searching state so the caller can show immediate
        // feedback while the join call is in flight.
        {
            let mut session = write_session(&self.session);
            session.reset_for_new_attempt();
            session.phase = SessionPhase::Joining;
            session.is_searching = true;
        }
        self.metrics.session().sessions_started_total.inc();
        self.poll_failures.store(0, Ordering::Relaxed);

        let request = JoinQueueRequest::new(player_id.to_string(), preferences);
        match self.client.join(request).await {
            Ok(join) => {
                info!(
                    "Joined queue - session: '{}', position: {}, estimated_wait: {}s",
                    join.session_id, join.queue_position, join.estimated_wait_seconds
                );

                {
                    let mut session = write_session(&self.session);
                    session.phase = SessionPhase::Searching;
                    session.session_id = Some(join.session_id.clone());
                    session.queue_position = join.queue_position;
                    session.estimated_wait_seconds = join.estimated_wait_seconds;
                }
                self.metrics.session().active_sessions.set(1);

                self.start_status_polling(join.session_id);
                self.start_ticker();
                self.snapshot()
            }
            Err(e) => {
                warn!("Queue join failed: {}", e);
                self.metrics.session().join_failures_total.inc();
                self.finish_session(SessionPhase::Errored, |session| {
                    session.error = Some(format!("failed to join queue: {e}"));
                })
            }
        }
    }

    /// Stop tracking the current session.
    ///
    /// Idempotent: with no active session this does nothing. Local state is
    /// cleared before the server is notified; a failed leave is recorded as
    /// an advisory warning, never an error.
    pub async fn cancel_session(&self) -> MatchmakingSession {
        let session_id = read_session(&self.session).session_id.clone();
        let Some(session_id) = session_id else {
            debug!("cancel_session with no active session, nothing to do");
            return self.snapshot();
        };

        info!("Cancelling queue session '{}'", session_id);
        self.stop_background_tasks();
        {
            let mut session = write_session(&self.session);
            session.reset_for_new_attempt();
        }
        self.metrics.record_session_outcome("cancelled");

        match self.client.leave(&session_id).await {
            Ok(true) => {
                debug!("Left queue session '{}'", session_id);
            }
            Ok(false) => {
                warn!("Queue service did not acknowledge leaving '{}'", session_id);
                self.record_warning(format!(
                    "queue service did not acknowledge leaving session '{session_id}'"
                ));
            }
            Err(e) => {
                warn!("Failed to leave queue session '{}': {}", session_id, e);
                self.record_warning(format!(
                    "failed to notify queue service of cancellation: {e}"
                ));
            }
        }

        self.snapshot()
    }

    /// Feed a session-independent pool statistics snapshot into the state
    pub fn record_pool_stats(&self, stats: PoolStats) {
        write_session(&self.session).pool_stats = Some(stats);
    }

    /// Start the recurring status poll for a session id.
    ///
    /// Every poll is tagged with the id it was issued for; responses for
    /// any other id are discarded unseen.
    fn start_status_polling(&self, session_id: SessionId) {
        let manager = self.clone();
        self.status_poller
            .start(self.settings.status_interval(), move || {
                let manager = manager.clone();
                let session_id = session_id.clone();
                async move {
                    manager.poll_status_once(session_id).await;
                }
            });
        self.metrics.poll().active_poll_loops.set(1);
    }

    /// Start the once-per-second elapsed-time ticker
    fn start_ticker(&self) {
        let session = Arc::clone(&self.session);
        self.ticker.start(move || {
            let mut session = write_session(&session);
            if session.is_searching && session.session_id.is_some() {
                session.elapsed_seconds += 1;
                true
            } else {
                false
            }
        });
        self.metrics.poll().active_tickers.set(1);
    }

    /// One status poll round trip for the given session id
    async fn poll_status_once(&self, session_id: SessionId) {
        self.metrics.poll().status_polls_total.inc();
        let timer = self
            .metrics
            .poll()
            .status_poll_duration_seconds
            .start_timer();
        let outcome = self.client.get_status(&session_id).await;
        timer.observe_duration();

        // The session may have been cancelled or replaced while the call
        // was in flight; anything addressed to the old id is dropped here.
        if read_session(&self.session).session_id.as_deref() != Some(session_id.as_str()) {
            debug!(
                "Discarding status response for stale session '{}'",
                session_id
            );
            self.metrics.poll().stale_responses_dropped_total.inc();
            return;
        }

        match outcome {
            Ok(Some(snapshot)) => {
                self.poll_failures.store(0, Ordering::Relaxed);
                self.apply_status(&session_id, snapshot);
            }
            Ok(None) => {
                warn!(
                    "Session '{}' is no longer known to the queue service",
                    session_id
                );
                self.finish_if_current(&session_id, SessionPhase::Expired, |_| {});
            }
            Err(e) => {
                let failures = self.poll_failures.fetch_add(1, Ordering::Relaxed) + 1;
                self.metrics.poll().poll_failures_total.inc();
                let max_failures = self.settings.max_consecutive_poll_failures;
                if failures >= max_failures {
                    warn!(
                        "Status polling failed {} times in a row, giving up: {}",
                        failures, e
                    );
                    self.finish_if_current(&session_id, SessionPhase::Errored, |session| {
                        session.error = Some(format!("status polling failed: {e}"));
                    });
                } else {
                    debug!(
                        "Status poll failed ({}/{}), retrying on next tick: {}",
                        failures, max_failures, e
                    );
                }
            }
        }
    }

    /// Apply a status report to the tracked session
    fn apply_status(&self, session_id: &str, snapshot: SessionStatusSnapshot) {
        // A reply tagged for any other session never touches the state,
        // no matter which request it answers.
        if snapshot.session_id != session_id {
            debug!(
                "Discarding status reply tagged '{}' while polling '{}'",
                snapshot.session_id, session_id
            );
            self.metrics.poll().stale_responses_dropped_total.inc();
            return;
        }

        {
            let mut session = write_session(&self.session);
            // Re-check under the write lock: a cancel may have slipped in
            // between the stale check and here.
            if session.session_id.as_deref() != Some(session_id) {
                self.metrics.poll().stale_responses_dropped_total.inc();
                return;
            }

            if let Some(position) = snapshot.queue_position {
                session.queue_position = position;
            }
            if let Some(total) = snapshot.total_queue_count {
                session.total_queue_count = total;
            }
            session.estimated_wait_seconds = snapshot.estimated_wait;
        }

        match snapshot.status {
            SessionStatus::Queued | SessionStatus::Searching => {
                debug!(
                    "Session '{}' still {}, position: {:?}",
                    session_id, snapshot.status, snapshot.queue_position
                );
            }
            SessionStatus::Matched | SessionStatus::Ready => {
                info!(
                    "Session '{}' matched - match: {:?}, lobby: {:?}",
                    session_id, snapshot.match_id, snapshot.lobby_id
                );
                self.finish_if_current(session_id, SessionPhase::Matched, |session| {
                    session.match_id = snapshot.match_id.clone();
                    session.lobby_id = snapshot.lobby_id.clone();
                });
            }
            SessionStatus::Cancelled => {
                info!("Session '{}' was cancelled server-side", session_id);
                self.finish_if_current(session_id, SessionPhase::Cancelled, |_| {});
            }
            SessionStatus::Expired => {
                info!("Session '{}' expired", session_id);
                self.finish_if_current(session_id, SessionPhase::Expired, |_| {});
            }
        }
    }

    /// Finish the session a poll reported on, but only if it is still the
    /// one being tracked. Anything else arriving here is a stale straggler.
    fn finish_if_current(
        &self,
        session_id: &str,
        phase: SessionPhase,
        apply: impl FnOnce(&mut MatchmakingSession),
    ) {
        {
            let mut session = write_session(&self.session);
            if session.session_id.as_deref() != Some(session_id) {
                self.metrics.poll().stale_responses_dropped_total.inc();
                return;
            }
            session.phase = phase;
            session.is_searching = false;
            session.session_id = None;
            apply(&mut session);
        }
        self.stop_background_tasks();
        self.metrics.record_session_outcome(&phase.to_string());
    }

    /// Move to a terminal phase: tear down both timers, clear the session
    /// id, and record the outcome.
    fn finish_session(
        &self,
        phase: SessionPhase,
        apply: impl FnOnce(&mut MatchmakingSession),
    ) -> MatchmakingSession {
        self.stop_background_tasks();
        let snapshot = {
            let mut session = write_session(&self.session);
            session.phase = phase;
            session.is_searching = false;
            session.session_id = None;
            apply(&mut session);
            session.clone()
        };
        self.metrics.record_session_outcome(&phase.to_string());
        snapshot
    }

    /// Stop the poll loop and the ticker; safe when neither is running
    fn stop_background_tasks(&self) {
        self.status_poller.stop();
        self.ticker.stop();
        self.metrics.poll().active_poll_loops.set(0);
        self.metrics.poll().active_tickers.set(0);
    }

    /// Attach an advisory warning unless a newer session took over
    fn record_warning(&self, warning: String) {
        let mut session = write_session(&self.session);
        if !session.is_active() {
            session.warning = Some(warning);
        }
    }
}
