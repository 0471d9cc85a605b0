//! Scripted queue client for tests
//!
//! Kept next to the real implementation so unit tests, integration tests,
//! and host applications can share the same double. Every network-shaped
//! call is recorded, so "no network call occurred" is an assertable fact.

use crate::client::api::QueueClient;
use crate::client::wire::{JoinQueueRequest, SessionJoinResult, SessionStatusSnapshot};
use crate::error::{QueueError, Result};
use crate::types::{PoolStats, SessionStatus};
use crate::utils::{current_timestamp, is_placeholder_player_id};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// Scripted outcome for a `join` call
#[derive(Debug, Clone)]
enum ScriptedJoin {
    Accept(SessionJoinResult),
    Fail(String),
}

/// Scripted outcome for a `get_status` call
#[derive(Debug, Clone)]
enum ScriptedStatus {
    Report(SessionStatusSnapshot),
    NotFound,
    Fail(String),
}

/// Scripted behavior for `leave` calls
#[derive(Debug, Clone)]
enum LeaveBehavior {
    Acknowledge,
    Decline,
    Fail(String),
}

/// Scripted behavior for `get_pool_stats` calls
#[derive(Debug, Clone)]
enum PoolBehavior {
    Stats(Option<PoolStats>),
    Fail(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// In-memory queue client with scripted responses and full call recording
pub struct ScriptedQueueClient {
    join_script: Mutex<VecDeque<ScriptedJoin>>,
    status_script: Mutex<VecDeque<ScriptedStatus>>,
    leave_behavior: Mutex<LeaveBehavior>,
    pool_behavior: Mutex<PoolBehavior>,
    /// Simulated network latency applied to `get_status`
    status_delay: Mutex<Option<Duration>>,
    join_calls: Mutex<Vec<JoinQueueRequest>>,
    leave_calls: Mutex<Vec<String>>,
    status_calls: Mutex<Vec<String>>,
    pool_calls: Mutex<Vec<String>>,
}

impl Default for ScriptedQueueClient {
    fn default() -> Self {
        Self {
            join_script: Mutex::new(VecDeque::new()),
            status_script: Mutex::new(VecDeque::new()),
            leave_behavior: Mutex::new(LeaveBehavior::Acknowledge),
            pool_behavior: Mutex::new(PoolBehavior::Stats(None)),
            status_delay: Mutex::new(None),
            join_calls: Mutex::new(Vec::new()),
            leave_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            pool_calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedQueueClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful join outcome
    pub fn script_join_success(
        &self,
        session_id: &str,
        queue_position: u32,
        estimated_wait_seconds: u64,
    ) {
        lock(&self.join_script).push_back(ScriptedJoin::Accept(SessionJoinResult {
            session_id: session_id.to_string(),
            status: SessionStatus::Queued,
            queue_position,
            estimated_wait_seconds,
            queued_at: current_timestamp(),
        }));
    }

    /// Queue a failing join outcome
    pub fn script_join_failure(&self, message: &str) {
        lock(&self.join_script).push_back(ScriptedJoin::Fail(message.to_string()));
    }

    /// Queue a status report. The last scripted status repeats on
    /// subsequent polls, so a single entry models a steady state.
    pub fn script_status(&self, snapshot: SessionStatusSnapshot) {
        lock(&self.status_script).push_back(ScriptedStatus::Report(snapshot));
    }

    /// Queue a "session unknown" status outcome
    pub fn script_status_not_found(&self) {
        lock(&self.status_script).push_back(ScriptedStatus::NotFound);
    }

    /// Queue a failing status outcome
    pub fn script_status_failure(&self, message: &str) {
        lock(&self.status_script).push_back(ScriptedStatus::Fail(message.to_string()));
    }

    /// Make subsequent `leave` calls report an unacknowledged leave
    pub fn decline_leave(&self) {
        *lock(&self.leave_behavior) = LeaveBehavior::Decline;
    }

    /// Make subsequent `leave` calls fail
    pub fn fail_leave(&self, message: &str) {
        *lock(&self.leave_behavior) = LeaveBehavior::Fail(message.to_string());
    }

    /// Serve these pool statistics to every `get_pool_stats` call
    pub fn set_pool_stats(&self, stats: PoolStats) {
        *lock(&self.pool_behavior) = PoolBehavior::Stats(Some(stats));
    }

    /// Make subsequent `get_pool_stats` calls fail
    pub fn fail_pool_stats(&self, message: &str) {
        *lock(&self.pool_behavior) = PoolBehavior::Fail(message.to_string());
    }

    /// Delay every `get_status` response by the given duration
    pub fn set_status_delay(&self, delay: Duration) {
        *lock(&self.status_delay) = Some(delay);
    }

    pub fn join_calls(&self) -> Vec<JoinQueueRequest> {
        lock(&self.join_calls).clone()
    }

    pub fn leave_calls(&self) -> Vec<String> {
        lock(&self.leave_calls).clone()
    }

    pub fn status_calls(&self) -> Vec<String> {
        lock(&self.status_calls).clone()
    }

    pub fn pool_calls(&self) -> Vec<String> {
        lock(&self.pool_calls).clone()
    }

    /// Total calls that would have reached the network
    pub fn network_call_count(&self) -> usize {
        lock(&self.join_calls).len()
            + lock(&self.leave_calls).len()
            + lock(&self.status_calls).len()
            + lock(&self.pool_calls).len()
    }
}

/// Build a queued/searching status report
pub fn searching_status(
    session_id: &str,
    queue_position: u32,
    total_queue_count: u32,
    estimated_wait: u64,
) -> SessionStatusSnapshot {
    SessionStatusSnapshot {
        session_id: session_id.to_string(),
        status: SessionStatus::Searching,
        elapsed_time: 0,
        estimated_wait,
        queue_position: Some(queue_position),
        total_queue_count: Some(total_queue_count),
        match_id: None,
        lobby_id: None,
    }
}

/// Build a matched status report
pub fn matched_status(session_id: &str, match_id: &str, lobby_id: Option<&str>) -> SessionStatusSnapshot {
    SessionStatusSnapshot {
        session_id: session_id.to_string(),
        status: SessionStatus::Matched,
        elapsed_time: 0,
        estimated_wait: 0,
        queue_position: None,
        total_queue_count: None,
        match_id: Some(match_id.to_string()),
        lobby_id: lobby_id.map(|id| id.to_string()),
    }
}

/// Build a terminal status report without match identifiers
pub fn terminal_status(session_id: &str, status: SessionStatus) -> SessionStatusSnapshot {
    SessionStatusSnapshot {
        session_id: session_id.to_string(),
        status,
        elapsed_time: 0,
        estimated_wait: 0,
        queue_position: None,
        total_queue_count: None,
        match_id: None,
        lobby_id: None,
    }
}

#[async_trait]
impl QueueClient for ScriptedQueueClient {
    async fn join(&self, request: JoinQueueRequest) -> Result<SessionJoinResult> {
        if is_placeholder_player_id(&request.player_id) {
            return Err(QueueError::InvalidPlayerId {
                reason: format!(
                    "'{}' is not an authenticated account id",
                    request.player_id.trim()
                ),
            }
            .into());
        }

        lock(&self.join_calls).push(request);

        let scripted = lock(&self.join_script).pop_front();
        match scripted {
            Some(ScriptedJoin::Accept(result)) => Ok(result),
            Some(ScriptedJoin::Fail(message)) => {
                Err(QueueError::TransportFailed { message }.into())
            }
            None => Ok(SessionJoinResult {
                session_id: format!("session-{}", Uuid::new_v4()),
                status: SessionStatus::Queued,
                queue_position: 1,
                estimated_wait_seconds: 30,
                queued_at: current_timestamp(),
            }),
        }
    }

    async fn leave(&self, session_id: &str) -> Result<bool> {
        lock(&self.leave_calls).push(session_id.to_string());

        let behavior = lock(&self.leave_behavior).clone();
        match behavior {
            LeaveBehavior::Acknowledge => Ok(true),
            LeaveBehavior::Decline => Ok(false),
            LeaveBehavior::Fail(message) => Err(QueueError::TransportFailed { message }.into()),
        }
    }

    async fn get_status(&self, session_id: &str) -> Result<Option<SessionStatusSnapshot>> {
        lock(&self.status_calls).push(session_id.to_string());

        let delay = *lock(&self.status_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = {
            let mut script = lock(&self.status_script);
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match scripted {
            Some(ScriptedStatus::Report(snapshot)) => Ok(Some(snapshot)),
            Some(ScriptedStatus::Fail(message)) => {
                Err(QueueError::TransportFailed { message }.into())
            }
            Some(ScriptedStatus::NotFound) | None => Ok(None),
        }
    }

    async fn get_pool_stats(
        &self,
        game_id: &str,
        _game_mode: Option<&str>,
        _region: Option<&str>,
    ) -> Result<Option<PoolStats>> {
        lock(&self.pool_calls).push(game_id.to_string());

        let behavior = lock(&self.pool_behavior).clone();
        match behavior {
            PoolBehavior::Stats(stats) => Ok(stats),
            PoolBehavior::Fail(message) => Err(QueueError::TransportFailed { message }.into()),
        }
    }
}
