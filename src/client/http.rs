//! HTTP implementation of the queue client

use crate::client::api::QueueClient;
use crate::client::wire::{JoinQueueRequest, SessionJoinResult, SessionStatusSnapshot};
use crate::config::ClientSettings;
use crate::error::{QueueError, Result};
use crate::types::PoolStats;
use crate::utils::is_placeholder_player_id;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// Queue client over the matchmaking service's REST interface
pub struct HttpQueueClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpQueueClient {
    /// Create a new client from settings
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| QueueError::ConfigurationError {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read an error body for diagnostics, tolerating unreadable bodies
    async fn error_body(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string())
    }
}

#[async_trait]
impl QueueClient for HttpQueueClient {
    async fn join(&self, request: JoinQueueRequest) -> Result<SessionJoinResult> {
        if is_placeholder_player_id(&request.player_id) {
            return Err(QueueError::InvalidPlayerId {
                reason: format!(
                    "'{}' is not an authenticated account id",
                    request.player_id.trim()
                ),
            }
            .into());
        }

        let url = self.url("/queue");
        debug!("POST {} for player '{}'", url, request.player_id);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| QueueError::TransportFailed {
                message: format!("join request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(QueueError::TransportFailed {
                message: format!("queue service returned {status}: {body}"),
            }
            .into());
        }

        let result = response
            .json::<SessionJoinResult>()
            .await
            .map_err(|e| QueueError::TransportFailed {
                message: format!("join response parse failed: {e}"),
            })?;
        Ok(result)
    }

    async fn leave(&self, session_id: &str) -> Result<bool> {
        let url = self.url(&format!("/queue/{session_id}"));
        debug!("DELETE {}", url);

        let response =
            self.http
                .delete(&url)
                .send()
                .await
                .map_err(|e| QueueError::TransportFailed {
                    message: format!("leave request failed: {e}"),
                })?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            // A session the server no longer tracks counts as left.
            return Ok(true);
        }

        let body = Self::error_body(response).await;
        Err(QueueError::TransportFailed {
            message: format!("queue service returned {status}: {body}"),
        }
        .into())
    }

    async fn get_status(&self, session_id: &str) -> Result<Option<SessionStatusSnapshot>> {
        let url = self.url(&format!("/session/{session_id}"));

        let response =
            self.http
                .get(&url)
                .send()
                .await
                .map_err(|e| QueueError::TransportFailed {
                    message: format!("status request failed: {e}"),
                })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(QueueError::TransportFailed {
                message: format!("queue service returned {status}: {body}"),
            }
            .into());
        }

        let snapshot = response.json::<SessionStatusSnapshot>().await.map_err(|e| {
            QueueError::TransportFailed {
                message: format!("status response parse failed: {e}"),
            }
        })?;
        Ok(Some(snapshot))
    }

    async fn get_pool_stats(
        &self,
        game_id: &str,
        game_mode: Option<&str>,
        region: Option<&str>,
    ) -> Result<Option<PoolStats>> {
        let url = self.url(&format!("/pools/{game_id}"));

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(mode) = game_mode {
            query.push(("game_mode", mode));
        }
        if let Some(region) = region {
            query.push(("region", region));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| QueueError::TransportFailed {
                message: format!("pool stats request failed: {e}"),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(QueueError::TransportFailed {
                message: format!("queue service returned {status}: {body}"),
            }
            .into());
        }

        let stats =
            response
                .json::<PoolStats>()
                .await
                .map_err(|e| QueueError::TransportFailed {
                    message: format!("pool stats response parse failed: {e}"),
                })?;
        Ok(Some(stats))
    }
}
