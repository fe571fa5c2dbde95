//! orill-il library - illumination pipeline service
//!
//! Fans a payload out to the configured analyzers, boosts and audits their output,
//! derives the next question, and records the run.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analyzers;
pub mod api;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod types;

use pipeline::IlluminationCycle;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub cycle: Arc<IlluminationCycle>,
    /// Used when `/api/analytics/summary` has no `limit`
    pub recent_runs_limit: i64,
}

impl AppState {
    pub fn new(cycle: IlluminationCycle, recent_runs_limit: i64) -> Self {
        Self {
            cycle: Arc::new(cycle),
            recent_runs_limit,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let routes = Router::new()
        .route("/api/illuminate", post(api::illuminate))
        .route("/api/analytics/summary", get(api::get_analytics_summary))
        .route("/api/analyzers", get(api::list_analyzers))
        .route("/api/buildinfo", get(api::get_build_info));

    Router::new()
        .merge(routes)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
