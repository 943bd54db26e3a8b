use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use fleet_analysis::{Machine, Reading};

use crate::AppState;
use crate::fleet_api::error_recorder::ErrorRecorder;
use crate::shared::extractors::request_id::RequestId;
use crate::shared::extractors::validations::ValidatedPayload;

use super::errors::{self, HandlerResult};
use super::models::{AnalyzeRequest, AnalyzeResponse};

const HANDLER_NAME: &str = "machines_analyze";

/// Analyze a fleet's telemetry
///
/// Computes per-machine operating hours, average start and end times and
/// energy consumption, the busiest day per fuel class, and the fleet's
/// efficiency ranking. Readings for machines absent from `machines` are
/// ignored.
#[utoipa::path(
    post,
    path = "/machines/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Fleet analysis report", body = AnalyzeResponse),
        (status = 400, description = "Invalid request payload"),
        (status = 422, description = "Too many readings in one request"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "machines",
)]
#[tracing::instrument(skip_all, name = "machines_analyze")]
pub async fn handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    ValidatedPayload(payload): ValidatedPayload<AnalyzeRequest>,
) -> HandlerResult<(StatusCode, Json<AnalyzeResponse>)> {
    tracing::info!(
        machines = payload.machines.len(),
        readings = payload.data.len(),
        request_id = %request_id,
        "Fleet analysis request",
    );

    let recorder =
        ErrorRecorder::new(&state.telemetry, HANDLER_NAME, &request_id);

    let max = state.config.max_readings_per_request;
    let count = payload.data.len();
    if count > max {
        let e = errors::Error::TooManyReadings { count, max };
        return Err(recorder.record(e.code(), e));
    }

    let machines: Vec<Machine> =
        payload.machines.into_iter().map(Machine::from).collect();
    let readings: Vec<Reading> =
        payload.data.into_iter().map(Reading::from).collect();

    let started = Instant::now();
    let run = tokio::task::spawn_blocking(move || {
        fleet_analysis::run_analysis(&machines, &readings)
    })
    .await
    .map_err(|e| {
        let e = errors::Error::from(e);
        recorder.record(e.code(), e)
    })?;
    let elapsed = started.elapsed();

    state.telemetry.maybe_use_metrics(|m| {
        m.record_analysis(run.readings_accepted, run.readings_dropped, elapsed);
    });

    tracing::info!(
        machines_reported = run.report.machine_metrics.len(),
        readings_dropped = run.readings_dropped,
        elapsed_ms = elapsed.as_millis() as u64,
        request_id = %request_id,
        "Fleet analysis complete",
    );

    Ok((StatusCode::OK, Json(AnalyzeResponse::from(run.report))))
}
