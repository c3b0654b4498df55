//! HTTP endpoints for the latency query server using axum.
//!
//! Endpoints:
//! - GET /api/latency/history?from&to[&fromTime][&toTime]
//! - GET /api/latency/stats?from&to[&fromTime][&toTime]
//! - GET /api/latency/recent

use crate::error::Result;
use crate::hub::LatencyHub;
use crate::query::{self, PairQuery, HISTORY_PATH, RECENT_PATH, STATS_PATH};
use crate::server::error::ApiError;
use crate::server::monitor::ServerCounters;
use crate::store::{Sample, Stats};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

type QueryParams = std::result::Result<Query<PairQuery>, QueryRejection>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<LatencyHub>,
    pub counters: ServerCounters,
}

impl AppState {
    /// Count the request and, when it failed, the error
    fn track<T>(&self, result: Result<T>) -> std::result::Result<Json<T>, ApiError> {
        self.counters.increment_requests();
        result.map(Json).map_err(|e| {
            self.counters.increment_error();
            debug!(error = %e, "Rejected request");
            ApiError::from(e)
        })
    }

    fn reject(&self, error: ApiError) -> ApiError {
        self.counters.increment_requests();
        self.counters.increment_error();
        error
    }
}

/// Build the router over `hub`, reporting activity to `counters`
pub fn router(hub: Arc<LatencyHub>, counters: ServerCounters) -> Router {
    Router::new()
        .route(HISTORY_PATH, get(history))
        .route(STATS_PATH, get(stats))
        .route(RECENT_PATH, get(recent))
        .fallback(not_found)
        .with_state(AppState { hub, counters })
        .layer(TraceLayer::new_for_http())
}

async fn history(
    State(state): State<AppState>,
    params: QueryParams,
) -> std::result::Result<Json<Vec<Sample>>, ApiError> {
    let Query(params) = params.map_err(|r| state.reject(r.into()))?;
    state.track(query::history(&state.hub, &params))
}

async fn stats(
    State(state): State<AppState>,
    params: QueryParams,
) -> std::result::Result<Json<Stats>, ApiError> {
    let Query(params) = params.map_err(|r| state.reject(r.into()))?;
    state.track(query::stats(&state.hub, &params))
}

async fn recent(State(state): State<AppState>) -> Json<Vec<Sample>> {
    state.counters.increment_requests();
    Json(query::recent(&state.hub))
}

async fn not_found(State(state): State<AppState>) -> ApiError {
    state.reject(ApiError::NotFound)
}
