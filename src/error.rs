//! Error types for the matchmaking client
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking-client scenarios
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid player id: {reason}")]
    InvalidPlayerId { reason: String },

    #[error("Queue service request failed: {message}")]
    TransportFailed { message: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Pool not found for game: {game_id}")]
    PoolNotFound { game_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal client error: {message}")]
    InternalError { message: String },
}
