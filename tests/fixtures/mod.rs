//! Test fixtures shared by the integration suite

use arena_queue::client::ScriptedQueueClient;
use arena_queue::config::PollingSettings;
use arena_queue::session::SessionManager;
use arena_queue::types::{PoolStats, QueueHealth, ServiceTier, SessionPreferences, SkillRange};
use arena_queue::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::Arc;

/// Install a test tracing subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wizard output for a ranked queue attempt
pub fn ranked_preferences(game_id: &str) -> SessionPreferences {
    SessionPreferences {
        game_id: game_id.to_string(),
        game_mode: "ranked-2v2".to_string(),
        region: "eu-west".to_string(),
        skill_range: SkillRange::around(1500, 100),
        max_ping_ms: 80,
        allow_cross_platform: true,
        tier: ServiceTier::Premium,
        priority_boost: false,
    }
}

/// A pool snapshot with the given headcount
pub fn pool_snapshot(game_id: &str, total_players: u32) -> PoolStats {
    PoolStats {
        pool_id: format!("{game_id}-ranked-2v2-eu-west"),
        game_id: game_id.to_string(),
        game_mode: "ranked-2v2".to_string(),
        region: "eu-west".to_string(),
        total_players,
        players_by_tier: HashMap::from([
            ("standard".to_string(), total_players.saturating_sub(40)),
            ("premium".to_string(), 40.min(total_players)),
        ]),
        average_wait_time_seconds: 48.0,
        estimated_match_time_seconds: 35.0,
        queue_health: QueueHealth::Healthy,
        timestamp: current_timestamp(),
    }
}

/// A manager wired to a fresh scripted client
pub fn scripted_manager() -> (SessionManager, Arc<ScriptedQueueClient>) {
    let client = Arc::new(ScriptedQueueClient::new());
    let manager = SessionManager::new(client.clone(), PollingSettings::default());
    (manager, client)
}
