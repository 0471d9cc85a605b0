//! Queue client contract

use crate::client::wire::{JoinQueueRequest, SessionJoinResult, SessionStatusSnapshot};
use crate::error::Result;
use crate::types::PoolStats;
use async_trait::async_trait;

/// Trait for talking to the matchmaking queue service.
///
/// All operations are single request/response calls. The tri-state outcome
/// convention: `Ok(Some(_))` is success with data, `Ok(None)` is a
/// well-formed "not found" reply, `Err(_)` is a transport or server
/// failure. Callers must not assume a response implies success.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Join a matchmaking queue.
    ///
    /// Rejects locally, before any I/O, when the player id is empty or a
    /// known placeholder value.
    async fn join(&self, request: JoinQueueRequest) -> Result<SessionJoinResult>;

    /// Leave a queue session. Idempotent: any 2xx-equivalent reply
    /// (including "already gone") reports `true`.
    async fn leave(&self, session_id: &str) -> Result<bool>;

    /// Fetch the current status of a queue session.
    async fn get_status(&self, session_id: &str) -> Result<Option<SessionStatusSnapshot>>;

    /// Fetch aggregate pool statistics for a game, optionally narrowed by
    /// mode and region.
    async fn get_pool_stats(
        &self,
        game_id: &str,
        game_mode: Option<&str>,
        region: Option<&str>,
    ) -> Result<Option<PoolStats>>;
}
