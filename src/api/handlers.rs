//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{AggregateQuery, ErrorResponse, TimelineQuery, TimelineRecord};
use crate::series::{TimeFrame, aggregate_by_time_frame};

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

/// Returns the scenario report.
///
/// `GET /report` → 200 + `ScenarioReport` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.report).into_response()
}

/// Returns timeline records, optionally filtered by interval index range.
///
/// `GET /timeline` → 200 + `Vec<TimelineRecord>` JSON
/// `GET /timeline?from=N&to=M` → filtered range (inclusive)
/// `GET /timeline?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Response {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return bad_request(format!("`from` ({from}) must be <= `to` ({to})"));
    }

    let records: Vec<TimelineRecord> = state
        .series
        .iter()
        .enumerate()
        .skip(from)
        .take_while(|(index, _)| *index <= to)
        .map(|(index, interval)| {
            TimelineRecord::new(index, interval, state.report.simulation.step(index))
        })
        .collect();

    Json(records).into_response()
}

/// Returns consumption buckets for a calendar frame.
///
/// `GET /aggregate?frame=week` → 200 + `Vec<AggregatedBucket>` JSON
/// `GET /aggregate?frame=fortnight` → 400 + `ErrorResponse`
pub async fn get_aggregate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AggregateQuery>,
) -> Response {
    let frame = match query.frame.as_deref().map(str::parse::<TimeFrame>) {
        None => TimeFrame::Day,
        Some(Ok(frame)) => frame,
        Some(Err(error)) => return bad_request(error),
    };

    Json(aggregate_by_time_frame(&state.series, frame)).into_response()
}
