//! Queue service client
//!
//! Request/response wrappers around the matchmaking service, plus the wire
//! types it speaks. Clients are stateless: no retries, no memory of prior
//! calls.

pub mod api;
pub mod http;
pub mod mock;
pub mod wire;

// Re-export commonly used types
pub use api::QueueClient;
pub use http::HttpQueueClient;
pub use mock::ScriptedQueueClient;
pub use wire::{JoinQueueRequest, SessionJoinResult, SessionStatusSnapshot};
