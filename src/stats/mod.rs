//! Aggregate pool statistics subscriptions

pub mod subscriber;

// Re-export commonly used types
pub use subscriber::{PoolStatsQuery, PoolStatsSubscriber, PoolStatsSubscription};
