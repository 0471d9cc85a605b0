//! Arena Queue - Client-side matchmaking session manager
//!
//! This crate tracks a player's matchmaking queue session against a remote
//! matchmaking service: joining a queue, polling session status, ticking the
//! elapsed-time counter, and subscribing to aggregate pool statistics.

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod poll;
pub mod session;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{QueueError, Result};
pub use types::*;

// Re-export key components
pub use client::{HttpQueueClient, QueueClient, ScriptedQueueClient};
pub use poll::{ElapsedTicker, PollScheduler};
pub use session::{MatchmakingSession, SessionManager, SessionPhase};
pub use stats::{PoolStatsQuery, PoolStatsSubscriber, PoolStatsSubscription};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
