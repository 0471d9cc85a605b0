//! Wire types exchanged with the matchmaking service

use crate::types::{
    LobbyId, MatchId, PlayerId, SessionId, SessionPreferences, SessionStatus, SkillRange,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /queue`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinQueueRequest {
    pub player_id: PlayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<String>,
    pub game_id: String,
    pub game_mode: String,
    pub region: String,
    pub skill_range: SkillRange,
    pub max_ping: u32,
    pub allow_cross_platform: bool,
    pub tier: crate::types::ServiceTier,
    pub priority_boost: bool,
    pub player_mmr: u32,
}

impl JoinQueueRequest {
    /// Build a join request from wizard preferences.
    ///
    /// The wizard emits the acceptable skill window centered on the player's
    /// own rating, so `player_mmr` is the window midpoint.
    pub fn new(player_id: PlayerId, preferences: SessionPreferences) -> Self {
        let player_mmr =
            preferences.skill_range.min_mmr / 2 + preferences.skill_range.max_mmr / 2;
        Self {
            player_id,
            squad_id: None,
            game_id: preferences.game_id,
            game_mode: preferences.game_mode,
            region: preferences.region,
            skill_range: preferences.skill_range,
            max_ping: preferences.max_ping_ms,
            allow_cross_platform: preferences.allow_cross_platform,
            tier: preferences.tier,
            priority_boost: preferences.priority_boost,
            player_mmr,
        }
    }

    /// Attach a squad id for group queueing
    pub fn with_squad(mut self, squad_id: impl Into<String>) -> Self {
        self.squad_id = Some(squad_id.into());
        self
    }

    /// Override the player rating sent to the service
    pub fn with_player_mmr(mut self, player_mmr: u32) -> Self {
        self.player_mmr = player_mmr;
        self
    }
}

/// Response of `POST /queue`: the accepted session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionJoinResult {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub queue_position: u32,
    pub estimated_wait_seconds: u64,
    pub queued_at: DateTime<Utc>,
}

/// Response of `GET /session/{session_id}`: a point-in-time status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusSnapshot {
    pub session_id: SessionId,
    pub status: SessionStatus,
    /// Wait time as tracked server-side, in seconds
    pub elapsed_time: u64,
    pub estimated_wait: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_queue_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<MatchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_id: Option<LobbyId>,
}
