//! Configuration management for the matchmaking client
//!
//! This module handles configuration loading from environment variables,
//! validation, and default values for the session manager and its clients.

pub mod app;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ClientSettings, PollingSettings};
