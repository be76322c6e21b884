//! REST API serving a finished scenario run.
//!
//! Provides three GET endpoints:
//! - `/report`: tariff costs, simulation outcome and sizing advice
//! - `/timeline`: per-interval consumption and simulated state, with optional index range
//! - `/aggregate`: consumption buckets for a calendar frame

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::report::ScenarioReport;
use crate::series::ConsumptionInterval;

pub use types::{AggregateQuery, ErrorResponse, TimelineQuery, TimelineRecord};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the scenario run and wrapped in `Arc`; every
/// handler only reads it.
pub struct AppState {
    /// Consumption series the scenario ran against.
    pub series: Vec<ConsumptionInterval>,
    /// Scenario outcome.
    pub report: ScenarioReport,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/timeline", get(handlers::get_timeline))
        .route("/aggregate", get(handlers::get_aggregate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
