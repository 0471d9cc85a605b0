//! Common types used throughout the matchmaking client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for players
pub type PlayerId = String;

/// Server-assigned identifier for a queue session (opaque to the client)
pub type SessionId = String;

/// Server-assigned identifier for a found match
pub type MatchId = String;

/// Server-assigned identifier for a game lobby
pub type LobbyId = String;

/// Service tier a player queues under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTier {
    Standard,
    Premium,
    Elite,
}

impl std::fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceTier::Standard => write!(f, "standard"),
            ServiceTier::Premium => write!(f, "premium"),
            ServiceTier::Elite => write!(f, "elite"),
        }
    }
}

/// Acceptable opponent skill window for a join request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRange {
    pub min_mmr: u32,
    pub max_mmr: u32,
}

impl SkillRange {
    /// Window centered on a rating, clamped at zero
    pub fn around(mmr: u32, spread: u32) -> Self {
        Self {
            min_mmr: mmr.saturating_sub(spread),
            max_mmr: mmr.saturating_add(spread),
        }
    }
}

/// Immutable input to a single join attempt, produced by the selection wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPreferences {
    pub game_id: String,
    pub game_mode: String,
    pub region: String,
    pub skill_range: SkillRange,
    /// Maximum acceptable network latency in milliseconds
    pub max_ping_ms: u32,
    pub allow_cross_platform: bool,
    pub tier: ServiceTier,
    pub priority_boost: bool,
}

/// Session state as reported by the matchmaking service (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Queued,
    Searching,
    Matched,
    Ready,
    Cancelled,
    Expired,
}

impl SessionStatus {
    /// Whether this status ends client-side searching
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Matched
                | SessionStatus::Ready
                | SessionStatus::Cancelled
                | SessionStatus::Expired
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Queued => write!(f, "queued"),
            SessionStatus::Searching => write!(f, "searching"),
            SessionStatus::Matched => write!(f, "matched"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Cancelled => write!(f, "cancelled"),
            SessionStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Coarse health indicator for a matchmaking pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueHealth {
    Healthy,
    Moderate,
    Slow,
    Degraded,
}

impl std::fmt::Display for QueueHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueHealth::Healthy => write!(f, "healthy"),
            QueueHealth::Moderate => write!(f, "moderate"),
            QueueHealth::Slow => write!(f, "slow"),
            QueueHealth::Degraded => write!(f, "degraded"),
        }
    }
}

/// Aggregate statistics for everyone waiting in a game/mode/region pool
///
/// Independent of any individual session; owned by the pool stats
/// subscription and read-only to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub pool_id: String,
    pub game_id: String,
    pub game_mode: String,
    pub region: String,
    pub total_players: u32,
    /// Waiting players broken down by service tier (server-defined keys)
    pub players_by_tier: HashMap<String, u32>,
    pub average_wait_time_seconds: f64,
    pub estimated_match_time_seconds: f64,
    pub queue_health: QueueHealth,
    pub timestamp: DateTime<Utc>,
}
