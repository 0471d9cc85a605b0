//! Recurring pool statistics subscription
//!
//! Periodically fetches aggregate queue statistics for a game/mode/region.
//! Subscriptions run on their own scheduler slot and are fully independent
//! of any matchmaking session: they survive session cancellation and end
//! only through their own `unsubscribe` (or by being dropped).

use crate::client::QueueClient;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::poll::PollScheduler;
use crate::types::PoolStats;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What to watch: a game, optionally narrowed by mode and region
#[derive(Debug, Clone)]
pub struct PoolStatsQuery {
    pub game_id: String,
    pub game_mode: Option<String>,
    pub region: Option<String>,
}

impl PoolStatsQuery {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            game_mode: None,
            region: None,
        }
    }

    pub fn with_mode(mut self, game_mode: impl Into<String>) -> Self {
        self.game_mode = Some(game_mode.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Factory for pool statistics subscriptions
pub struct PoolStatsSubscriber {
    client: Arc<dyn QueueClient>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl PoolStatsSubscriber {
    /// Create a new subscriber
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self {
            client,
            metrics: None,
        }
    }

    /// Create a new subscriber that counts fetches into a collector
    pub fn with_metrics(client: Arc<dyn QueueClient>, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            client,
            metrics: Some(metrics),
        }
    }

    /// Start a recurring subscription.
    ///
    /// The first fetch happens immediately; `on_stats` fires for every
    /// successful fetch. Fetch failures are logged and skipped; the next
    /// tick tries again.
    pub fn subscribe<F>(
        &self,
        query: PoolStatsQuery,
        interval: Duration,
        on_stats: F,
    ) -> PoolStatsSubscription
    where
        F: Fn(PoolStats) + Send + Sync + 'static,
    {
        let scheduler = PollScheduler::new();
        let client = Arc::clone(&self.client);
        let metrics = self.metrics.clone();
        let on_stats = Arc::new(on_stats);

        scheduler.start(interval, move || {
            let client = Arc::clone(&client);
            let metrics = metrics.clone();
            let on_stats = Arc::clone(&on_stats);
            let query = query.clone();
            async move {
                match fetch_once(&*client, &query).await {
                    Ok(Some(stats)) => {
                        if let Some(metrics) = metrics {
                            metrics.poll().pool_stats_fetches_total.inc();
                        }
                        on_stats(stats);
                    }
                    Ok(None) => {
                        debug!("No pool published for game '{}'", query.game_id);
                    }
                    Err(e) => {
                        warn!("Pool stats fetch for '{}' failed: {}", query.game_id, e);
                    }
                }
            }
        });

        PoolStatsSubscription { scheduler }
    }
}

async fn fetch_once(client: &dyn QueueClient, query: &PoolStatsQuery) -> Result<Option<PoolStats>> {
    client
        .get_pool_stats(
            &query.game_id,
            query.game_mode.as_deref(),
            query.region.as_deref(),
        )
        .await
}

/// Handle to a running subscription. Dropping it stops the polling too.
pub struct PoolStatsSubscription {
    scheduler: PollScheduler,
}

impl PoolStatsSubscription {
    /// Stop the subscription; no callback fires after this returns
    pub fn unsubscribe(self) {
        self.scheduler.stop();
    }

    /// Whether the subscription is still polling
    pub fn is_active(&self) -> bool {
        self.scheduler.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedQueueClient;
    use crate::types::QueueHealth;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::sleep;

    fn sample_stats() -> PoolStats {
        PoolStats {
            pool_id: "pool-1".to_string(),
            game_id: "nova-arena".to_string(),
            game_mode: "ranked-2v2".to_string(),
            region: "eu-west".to_string(),
            total_players: 87,
            players_by_tier: HashMap::from([
                ("standard".to_string(), 60),
                ("premium".to_string(), 27),
            ]),
            average_wait_time_seconds: 52.5,
            estimated_match_time_seconds: 40.0,
            queue_health: QueueHealth::Healthy,
            timestamp: crate::utils::current_timestamp(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_fires_immediately_then_on_interval() {
        let client = Arc::new(ScriptedQueueClient::new());
        client.set_pool_stats(sample_stats());
        let subscriber = PoolStatsSubscriber::new(client.clone());

        let deliveries = Arc::new(AtomicU32::new(0));
        let counter = deliveries.clone();
        let subscription = subscriber.subscribe(
            PoolStatsQuery::new("nova-arena").with_region("eu-west"),
            Duration::from_secs(15),
            move |stats| {
                assert_eq!(stats.total_players, 87);
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_millis(10)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 3);
        assert!(subscription.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_stops_deliveries() {
        let client = Arc::new(ScriptedQueueClient::new());
        client.set_pool_stats(sample_stats());
        let subscriber = PoolStatsSubscriber::new(client.clone());

        let deliveries = Arc::new(AtomicU32::new(0));
        let counter = deliveries.clone();
        let subscription = subscriber.subscribe(
            PoolStatsQuery::new("nova-arena"),
            Duration::from_secs(15),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_millis(10)).await;
        subscription.unsubscribe();

        let frozen = deliveries.load(Ordering::SeqCst);
        sleep(Duration::from_secs(60)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failures_are_skipped_not_fatal() {
        let client = Arc::new(ScriptedQueueClient::new());
        client.fail_pool_stats("503 unavailable");
        let subscriber = PoolStatsSubscriber::new(client.clone());

        let deliveries = Arc::new(AtomicU32::new(0));
        let counter = deliveries.clone();
        let subscription = subscriber.subscribe(
            PoolStatsQuery::new("nova-arena"),
            Duration::from_secs(15),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_millis(10)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 0);
        assert!(subscription.is_active());

        // Service recovers; the next tick delivers.
        client.set_pool_stats(sample_stats());
        sleep(Duration::from_secs(15)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_pool_is_not_delivered() {
        let client = Arc::new(ScriptedQueueClient::new());
        let subscriber = PoolStatsSubscriber::new(client.clone());

        let deliveries = Arc::new(AtomicU32::new(0));
        let counter = deliveries.clone();
        let _subscription = subscriber.subscribe(
            PoolStatsQuery::new("unlisted-game"),
            Duration::from_secs(15),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_secs(31)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 0);
        assert!(client.pool_calls().len() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_subscription_stops_polling() {
        let client = Arc::new(ScriptedQueueClient::new());
        client.set_pool_stats(sample_stats());
        let subscriber = PoolStatsSubscriber::new(client.clone());

        {
            let _subscription = subscriber.subscribe(
                PoolStatsQuery::new("nova-arena"),
                Duration::from_secs(15),
                |_| {},
            );
            sleep(Duration::from_millis(10)).await;
        }

        let calls = client.pool_calls().len();
        sleep(Duration::from_secs(60)).await;
        assert_eq!(client.pool_calls().len(), calls);
    }
}
