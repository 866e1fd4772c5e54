//! `/health` and `/status`
//!
//! Status reports uptime, run counters and run-duration percentiles of the
//! scrapes served since start.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScraperConfig;
use crate::fetch::Session;

/// Liveness probe body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: String,
}

/// Counters behind `/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
    /// Seconds since start
    pub uptime_seconds: u64,
    /// Runs that produced an outcome
    pub runs_completed: u64,
    /// Runs that ended in an error
    pub runs_failed: u64,
    /// Durations of completed runs
    pub run_duration: RunDurations,
    /// RFC 3339 generation time
    pub timestamp: String,
}

/// Run-duration percentiles, milliseconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDurations {
    /// Median
    pub p50_ms: u64,
    /// 95th percentile
    pub p95_ms: u64,
    /// 99th percentile
    pub p99_ms: u64,
    /// Slowest run
    pub max_ms: u64,
}

/// Shared state of the web front end: the session every request scrapes
/// through, the config, and run statistics.
#[derive(Debug)]
pub struct AppState {
    session: Session,
    config: ScraperConfig,
    started: Instant,
    runs_completed: AtomicU64,
    runs_failed: AtomicU64,
    // 1 ms to 1 h, 3 significant figures; None if the bounds were rejected
    durations: Option<Mutex<Histogram<u64>>>,
}

impl AppState {
    /// Create the state around a session and config
    pub fn new(session: Session, config: ScraperConfig) -> Self {
        Self {
            session,
            config,
            started: Instant::now(),
            runs_completed: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            durations: Histogram::new_with_bounds(1, 3_600_000, 3).ok().map(Mutex::new),
        }
    }

    /// Session used for every scrape
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Scraper configuration
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Record a finished run; returns the completed count
    pub fn record_success(&self, elapsed: Duration) -> u64 {
        if let Some(durations) = &self.durations {
            let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX).max(1);
            durations.lock().saturating_record(ms);
        }
        self.runs_completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a failed run; returns the failed count
    pub fn record_failure(&self) -> u64 {
        self.runs_failed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Snapshot for `/status`
    pub fn status(&self) -> StatusResponse {
        let run_duration = match &self.durations {
            Some(durations) => {
                let hist = durations.lock();
                RunDurations {
                    p50_ms: hist.value_at_quantile(0.50),
                    p95_ms: hist.value_at_quantile(0.95),
                    p99_ms: hist.value_at_quantile(0.99),
                    max_ms: hist.max(),
                }
            }
            None => RunDurations::default(),
        };

        StatusResponse {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            uptime_seconds: self.started.elapsed().as_secs(),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            run_duration,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// `GET /status`
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    debug!("Status requested");
    Json(state.status())
}

/// Router with the health and status endpoints
pub fn status_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{HttpCache, StaticTransport};

    fn state() -> AppState {
        let session = Session::new(StaticTransport::new(), HttpCache::memory());
        AppState::new(session, ScraperConfig::default())
    }

    #[test]
    fn test_run_counters() {
        let state = state();
        assert_eq!(state.record_success(Duration::from_millis(20)), 1);
        assert_eq!(state.record_success(Duration::from_millis(40)), 2);
        assert_eq!(state.record_failure(), 1);

        let status = state.status();
        assert_eq!(status.runs_completed, 2);
        assert_eq!(status.runs_failed, 1);
        assert_eq!(status.name, "pydocs-scraper");
    }

    #[test]
    fn test_run_durations() {
        let state = state();
        for ms in [10, 20, 50, 100, 5000] {
            state.record_success(Duration::from_millis(ms));
        }

        let durations = state.status().run_duration;
        assert!(durations.p50_ms > 0);
        assert!(durations.p95_ms >= durations.p50_ms);
        assert!(durations.p99_ms >= durations.p95_ms);
        assert!((5000..=5010).contains(&durations.max_ms));
    }

    #[test]
    fn test_out_of_range_durations_saturate() {
        let state = state();
        state.record_success(Duration::from_secs(10_000));
        state.record_success(Duration::ZERO);
        assert_eq!(state.status().runs_completed, 2);
        assert!(state.status().run_duration.max_ms <= 3_700_000);
    }

    #[tokio::test]
    async fn test_health_handler() {
        assert_eq!(health_handler().await.0.status, "healthy");
    }

    #[tokio::test]
    async fn test_status_handler() {
        let state = Arc::new(state());
        state.record_failure();
        let Json(status) = status_handler(State(state)).await;
        assert_eq!(status.runs_failed, 1);
    }
}
