//! HTTP request handlers: metrics scrape, health, JSON snapshot.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntGauge, TextEncoder};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use statgauge_core::collector::ParseWarning;
use statgauge_core::model::SystemSnapshot;

use crate::state::SharedState;

// ============================================================
// Health
// ============================================================

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Metrics
// ============================================================

/// Keeps the in-flight gauge raised for the lifetime of one scrape,
/// including scrapes abandoned by the client.
struct InFlightGuard(IntGauge);

impl InFlightGuard {
    fn new(gauge: &IntGauge) -> Self {
        gauge.inc();
        Self(gauge.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

pub(crate) async fn handle_metrics(State(state): State<SharedState>) -> Response {
    let _in_flight = InFlightGuard::new(&state.handler_metrics.in_flight);

    let mut families = gather_stat(&state).await;
    families.extend(state.telemetry_registry.gather());
    families.sort_by(|a, b| a.get_name().cmp(b.get_name()));

    let response = encode(&families);
    state
        .handler_metrics
        .requests
        .with_label_values(&[response.status().as_str()])
        .inc();
    response
}

/// Gathers the stat registry off the async runtime; a failed or timed-out
/// pass contributes no families.
async fn gather_stat(state: &SharedState) -> Vec<MetricFamily> {
    let registry = state.stat_registry.clone();
    run_bounded(
        &state.source_permit,
        state.scrape_timeout,
        "stat gather",
        move || registry.gather(),
    )
    .await
    .unwrap_or_default()
}

fn encode(families: &[MetricFamily]) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

// ============================================================
// Snapshot
// ============================================================

#[derive(Serialize)]
pub(crate) struct SnapshotResponse {
    /// Collection time, seconds since the Unix epoch.
    timestamp: i64,
    snapshot: SystemSnapshot,
    warnings: Vec<ParseWarning>,
}

pub(crate) async fn handle_snapshot(
    State(state): State<SharedState>,
) -> Result<Json<SnapshotResponse>, StatusCode> {
    let collector = Arc::clone(&state.collector);
    let outcome = run_bounded(
        &state.source_permit,
        state.scrape_timeout,
        "snapshot",
        move || collector.collect(),
    )
    .await
    .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(SnapshotResponse {
        timestamp: chrono::Utc::now().timestamp(),
        snapshot: outcome.snapshot,
        warnings: outcome.warnings,
    }))
}

// ============================================================
// Helpers
// ============================================================

/// Runs `f` on the blocking pool once a permit is free, giving up after
/// `timeout`.
///
/// The permit moves into the blocking task, so a task that outlives its
/// timeout keeps it and later calls wait (and time out) instead of stacking
/// more reads on a hung source.
async fn run_bounded<T, F>(
    permits: &Arc<Semaphore>,
    timeout: Duration,
    what: &'static str,
    f: F,
) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let run = async {
        let permit = Arc::clone(permits).acquire_owned().await.ok()?;
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        });
        match task.await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(task = what, error = %e, "blocking task failed");
                None
            }
        }
    };

    match tokio::time::timeout(timeout, run).await {
        Ok(value) => value,
        Err(_) => {
            warn!(
                task = what,
                timeout_ms = timeout.as_millis() as u64,
                "blocking task timed out"
            );
            None
        }
    }
}
