//! Local view of a matchmaking queue session

use crate::types::{LobbyId, MatchId, PoolStats, SessionId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lifecycle phase of the tracked session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Joining,
    Searching,
    Matched,
    Cancelled,
    Expired,
    Errored,
}

impl SessionPhase {
    /// Whether this phase ends the session (no further polling without a
    /// fresh start)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Matched
                | SessionPhase::Cancelled
                | SessionPhase::Expired
                | SessionPhase::Errored
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Joining => write!(f, "joining"),
            SessionPhase::Searching => write!(f, "searching"),
            SessionPhase::Matched => write!(f, "matched"),
            SessionPhase::Cancelled => write!(f, "cancelled"),
            SessionPhase::Expired => write!(f, "expired"),
            SessionPhase::Errored => write!(f, "errored"),
        }
    }
}

/// The session state owned by the manager.
///
/// Observers receive whole-struct clones taken under the state lock, so a
/// snapshot is always internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchmakingSession {
    pub phase: SessionPhase,
    /// Server-assigned id; absent until a join succeeds
    pub session_id: Option<SessionId>,
    pub is_searching: bool,
    pub queue_position: u32,
    pub total_queue_count: u32,
    pub estimated_wait_seconds: u64,
    /// Locally ticked wait time; advances only while searching
    pub elapsed_seconds: u64,
    pub match_id: Option<MatchId>,
    pub lobby_id: Option<LobbyId>,
    /// Latest aggregate pool snapshot; independent of the session lifecycle
    pub pool_stats: Option<PoolStats>,
    pub error: Option<String>,
    /// Advisory only, e.g. a leave the server did not acknowledge
    pub warning: Option<String>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

impl MatchmakingSession {
    /// Whether a server-side session is currently being tracked
    pub fn is_active(&self) -> bool {
        self.session_id.is_some() && self.is_searching
    }

    /// Reset for a fresh attempt, keeping the session-independent pool
    /// statistics.
    pub fn reset_for_new_attempt(&mut self) {
        let pool_stats = self.pool_stats.take();
        *self = MatchmakingSession {
            pool_stats,
            ..MatchmakingSession::default()
        };
    }
}

/// Shared handle to the session state
pub(crate) type SharedSession = Arc<RwLock<MatchmakingSession>>;

/// Read the session state. Lock poisoning is recovered: the state itself is
/// always left coherent because writers never panic mid-update.
pub(crate) fn read_session(session: &SharedSession) -> RwLockReadGuard<'_, MatchmakingSession> {
    match session.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Write the session state, recovering from lock poisoning
pub(crate) fn write_session(session: &SharedSession) -> RwLockWriteGuard<'_, MatchmakingSession> {
    match session.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
