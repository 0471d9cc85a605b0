//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the matchmaking client. The
//! crate only collects; exposing the registry over HTTP is the host
//! application's concern.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;

/// Main metrics collector for the matchmaking client
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Session lifecycle metrics
    session_metrics: SessionMetrics,

    /// Polling and timer metrics
    poll_metrics: PollMetrics,
}

/// Session lifecycle metrics
#[derive(Clone)]
pub struct SessionMetrics {
    /// Total matchmaking sessions started
    pub sessions_started_total: IntCounter,

    /// Sessions reaching a terminal state, by outcome
    pub session_outcomes_total: IntCounterVec,

    /// Join attempts rejected or failed before a session existed
    pub join_failures_total: IntCounter,

    /// Whether a session is currently tracked (0 or 1)
    pub active_sessions: IntGauge,
}

/// Polling and timer metrics
#[derive(Clone)]
pub struct PollMetrics {
    /// Total status polls issued
    pub status_polls_total: IntCounter,

    /// Status polls that failed
    pub poll_failures_total: IntCounter,

    /// Status responses discarded because their session was no longer current
    pub stale_responses_dropped_total: IntCounter,

    /// Live status poll loops (0 or 1 per manager)
    pub active_poll_loops: IntGauge,

    /// Live elapsed-time tickers (0 or 1 per manager)
    pub active_tickers: IntGauge,

    /// Successful pool statistics fetches
    pub pool_stats_fetches_total: IntCounter,

    /// Status poll round-trip duration
    pub status_poll_duration_seconds: Histogram,
}

impl SessionMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let sessions_started_total = IntCounter::with_opts(Opts::new(
            "sessions_started_total",
            "Total matchmaking sessions started",
        ))?;
        registry.register(Box::new(sessions_started_total.clone()))?;

        let session_outcomes_total = IntCounterVec::new(
            Opts::new(
                "session_outcomes_total",
                "Sessions reaching a terminal state, by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(session_outcomes_total.clone()))?;

        let join_failures_total = IntCounter::with_opts(Opts::new(
            "join_failures_total",
            "Join attempts rejected or failed before a session existed",
        ))?;
        registry.register(Box::new(join_failures_total.clone()))?;

        let active_sessions = IntGauge::with_opts(Opts::new(
            "active_sessions",
            "Whether a session is currently tracked",
        ))?;
        registry.register(Box::new(active_sessions.clone()))?;

        Ok(Self {
            sessions_started_total,
            session_outcomes_total,
            join_failures_total,
            active_sessions,
        })
    }
}

impl PollMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let status_polls_total = IntCounter::with_opts(Opts::new(
            "status_polls_total",
            "Total status polls issued",
        ))?;
        registry.register(Box::new(status_polls_total.clone()))?;

        let poll_failures_total = IntCounter::with_opts(Opts::new(
            "poll_failures_total",
            "Status polls that failed",
        ))?;
        registry.register(Box::new(poll_failures_total.clone()))?;

        let stale_responses_dropped_total = IntCounter::with_opts(Opts::new(
            "stale_responses_dropped_total",
            "Status responses discarded because their session was no longer current",
        ))?;
        registry.register(Box::new(stale_responses_dropped_total.clone()))?;

        let active_poll_loops = IntGauge::with_opts(Opts::new(
            "active_poll_loops",
            "Live status poll loops",
        ))?;
        registry.register(Box::new(active_poll_loops.clone()))?;

        let active_tickers = IntGauge::with_opts(Opts::new(
            "active_tickers",
            "Live elapsed-time tickers",
        ))?;
        registry.register(Box::new(active_tickers.clone()))?;

        let pool_stats_fetches_total = IntCounter::with_opts(Opts::new(
            "pool_stats_fetches_total",
            "Successful pool statistics fetches",
        ))?;
        registry.register(Box::new(pool_stats_fetches_total.clone()))?;

        let status_poll_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "status_poll_duration_seconds",
            "Status poll round-trip duration",
        ))?;
        registry.register(Box::new(status_poll_duration_seconds.clone()))?;

        Ok(Self {
            status_polls_total,
            poll_failures_total,
            stale_responses_dropped_total,
            active_poll_loops,
            active_tickers,
            pool_stats_fetches_total,
            status_poll_duration_seconds,
        })
    }
}

impl MetricsCollector {
    /// Create a new collector with a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let session_metrics = SessionMetrics::new(&registry)?;
        let poll_metrics = PollMetrics::new(&registry)?;

        Ok(Self {
            registry,
            session_metrics,
            poll_metrics,
        })
    }

    /// Get the underlying Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Session lifecycle metrics
    pub fn session(&self) -> &SessionMetrics {
        &self.session_metrics
    }

    /// Polling and timer metrics
    pub fn poll(&self) -> &PollMetrics {
        &self.poll_metrics
    }

    /// Record a terminal session outcome
    pub fn record_session_outcome(&self, outcome: &str) {
        self.session_metrics
            .session_outcomes_total
            .with_label_values(&[outcome])
            .inc();
        self.session_metrics.active_sessions.set(0);
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("metric registration on a fresh registry cannot collide")
    }
}
