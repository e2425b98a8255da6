//! Metrics and observability handlers
//!
//! Counts `/chat` requests by outcome and attributes every failure to the
//! pipeline stage it happened in.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use axum::{Json, extract::State};
use domain::ExchangeStage;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Metrics response containing all application metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Application metadata
    pub app: AppMetrics,
    /// Chat request statistics
    pub requests: RequestMetrics,
    /// Failures per pipeline stage
    pub stage_failures: StageFailureMetrics,
}

/// Application metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetrics {
    pub version: String,
    pub name: String,
    pub uptime_seconds: u64,
}

/// Request statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    /// Total requests received
    pub total_requests: u64,
    /// Successful requests (2xx)
    pub success_count: u64,
    /// Client errors (4xx)
    pub client_error_count: u64,
    /// Server errors (5xx)
    pub server_error_count: u64,
    /// Average response time in milliseconds
    pub avg_response_time_ms: f64,
    /// Current active requests
    pub active_requests: u64,
}

/// Failure counters keyed by stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageFailureMetrics {
    pub ingress: u64,
    pub upload: u64,
    pub transcription: u64,
    pub generation: u64,
    pub synthesis: u64,
    /// Configuration or internal errors with no stage
    pub unattributed: u64,
}

const STAGE_SLOTS: usize = 6;

const fn stage_slot(stage: Option<ExchangeStage>) -> usize {
    match stage {
        Some(ExchangeStage::Ingress) => 0,
        Some(ExchangeStage::Upload) => 1,
        Some(ExchangeStage::Transcription) => 2,
        Some(ExchangeStage::Generation) => 3,
        Some(ExchangeStage::Synthesis) => 4,
        None => 5,
    }
}

/// Atomic counters for request metrics
#[derive(Debug)]
pub struct MetricsCollector {
    /// Server start time
    start_time: Instant,
    total_requests: AtomicU64,
    success_count: AtomicU64,
    client_error_count: AtomicU64,
    server_error_count: AtomicU64,
    active_requests: AtomicU64,
    /// Total response time in microseconds
    total_response_time_us: AtomicU64,
    stage_failures: [AtomicU64; STAGE_SLOTS],
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a new metrics collector
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            client_error_count: AtomicU64::new(0),
            server_error_count: AtomicU64::new(0),
            active_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            stage_failures: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Record start of a request
    pub fn request_start(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.active_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record end of a request
    pub fn request_end(&self, response_time_us: u64, status_code: u16) {
        self.active_requests.fetch_sub(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(response_time_us, Ordering::Relaxed);

        match status_code {
            200..=299 => {
                self.success_count.fetch_add(1, Ordering::Relaxed);
            },
            400..=499 => {
                self.client_error_count.fetch_add(1, Ordering::Relaxed);
            },
            500..=599 => {
                self.server_error_count.fetch_add(1, Ordering::Relaxed);
            },
            _ => {},
        }
    }

    /// Record a failed exchange against its stage
    pub fn record_failure(&self, stage: Option<ExchangeStage>) {
        self.stage_failures[stage_slot(stage)].fetch_add(1, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get request metrics
    #[must_use]
    pub fn request_metrics(&self) -> RequestMetrics {
        let total = self.total_requests.load(Ordering::Relaxed);
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);

        RequestMetrics {
            total_requests: total,
            success_count: self.success_count.load(Ordering::Relaxed),
            client_error_count: self.client_error_count.load(Ordering::Relaxed),
            server_error_count: self.server_error_count.load(Ordering::Relaxed),
            #[allow(clippy::cast_precision_loss)]
            avg_response_time_ms: if total > 0 {
                (total_time as f64) / (total as f64) / 1000.0
            } else {
                0.0
            },
            active_requests: self.active_requests.load(Ordering::Relaxed),
        }
    }

    /// Get per-stage failure counts
    #[must_use]
    pub fn stage_failure_metrics(&self) -> StageFailureMetrics {
        let load = |stage| self.stage_failures[stage_slot(stage)].load(Ordering::Relaxed);

        StageFailureMetrics {
            ingress: load(Some(ExchangeStage::Ingress)),
            upload: load(Some(ExchangeStage::Upload)),
            transcription: load(Some(ExchangeStage::Transcription)),
            generation: load(Some(ExchangeStage::Generation)),
            synthesis: load(Some(ExchangeStage::Synthesis)),
            unattributed: load(None),
        }
    }
}

/// Get metrics endpoint
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let metrics = state.metrics.as_ref();

    Json(MetricsResponse {
        app: AppMetrics {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
            uptime_seconds: metrics.uptime_seconds(),
        },
        requests: metrics.request_metrics(),
        stage_failures: metrics.stage_failure_metrics(),
    })
}
