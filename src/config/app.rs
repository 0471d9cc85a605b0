//! Main application configuration
//!
//! This module defines the configuration structures for the arena-queue
//! client, including environment variable loading and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Main configuration for the matchmaking client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub polling: PollingSettings,
}

/// HTTP client settings for the queue service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the matchmaking service
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Intervals and bounds for the background polling loops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Session status poll interval in milliseconds
    pub status_interval_ms: u64,
    /// Pool statistics poll interval in milliseconds
    pub pool_stats_interval_ms: u64,
    /// Consecutive status-poll failures tolerated before the session errors out
    pub max_consecutive_poll_failures: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8230".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            status_interval_ms: 3_000,      // 3 seconds
            pool_stats_interval_ms: 15_000, // 15 seconds
            max_consecutive_poll_failures: 5,
        }
    }
}

impl ClientSettings {
    /// Per-request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl PollingSettings {
    /// Status poll interval as a `Duration`
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    /// Pool statistics poll interval as a `Duration`
    pub fn pool_stats_interval(&self) -> Duration {
        Duration::from_millis(self.pool_stats_interval_ms)
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Client settings
        if let Ok(base_url) = env::var("MATCHMAKING_BASE_URL") {
            config.client.base_url = base_url;
        }
        if let Ok(timeout) = env::var("MATCHMAKING_REQUEST_TIMEOUT_SECONDS") {
            config.client.request_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid MATCHMAKING_REQUEST_TIMEOUT_SECONDS: {}", timeout))?;
        }

        // Polling settings
        if let Ok(interval) = env::var("STATUS_POLL_INTERVAL_MS") {
            config.polling.status_interval_ms = interval
                .parse()
                .map_err(|_| anyhow!("Invalid STATUS_POLL_INTERVAL_MS: {}", interval))?;
        }
        if let Ok(interval) = env::var("POOL_STATS_INTERVAL_MS") {
            config.polling.pool_stats_interval_ms = interval
                .parse()
                .map_err(|_| anyhow!("Invalid POOL_STATS_INTERVAL_MS: {}", interval))?;
        }
        if let Ok(max_failures) = env::var("MAX_CONSECUTIVE_POLL_FAILURES") {
            config.polling.max_consecutive_poll_failures = max_failures
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_CONSECUTIVE_POLL_FAILURES: {}", max_failures))?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate a configuration, rejecting values the client cannot run with
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.client.base_url.trim().is_empty() {
        return Err(anyhow!("base_url must not be empty"));
    }
    if config.client.request_timeout_seconds == 0 {
        return Err(anyhow!("request_timeout_seconds must be positive"));
    }
    if config.polling.status_interval_ms == 0 {
        return Err(anyhow!("status_interval_ms must be positive"));
    }
    if config.polling.pool_stats_interval_ms == 0 {
        return Err(anyhow!("pool_stats_interval_ms must be positive"));
    }
    if config.polling.max_consecutive_poll_failures == 0 {
        return Err(anyhow!("max_consecutive_poll_failures must be at least 1"));
    }
    Ok(())
}
