//! Registry introspection

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegistryResponse {
    /// Dispatch order
    pub analyzers: Vec<String>,
    pub guardrail_layers: Vec<String>,
}

/// GET /api/analyzers
pub async fn list_analyzers(State(state): State<AppState>) -> Json<RegistryResponse> {
    Json(RegistryResponse {
        analyzers: state
            .cycle
            .analyzer_names()
            .into_iter()
            .map(String::from)
            .collect(),
        guardrail_layers: state.cycle.guardrail_layers().to_vec(),
    })
}
