//! Illumination endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::pipeline::SOURCE_API;
use crate::types::{CycleReport, Payload};
use crate::AppState;

/// POST /api/illuminate body
#[derive(Debug, Default, Deserialize)]
pub struct IlluminateRequest {
    /// Missing or null means an empty payload
    #[serde(default)]
    pub payload: Option<Value>,
}

impl IlluminateRequest {
    fn into_payload(self) -> ApiResult<Payload> {
        match self.payload {
            None | Some(Value::Null) => Ok(Payload::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(ApiError::BadRequest(
                "payload must be a JSON object".to_string(),
            )),
        }
    }
}

/// POST /api/illuminate
///
/// Runs one full cycle with source "api" and returns the recorded report.
pub async fn illuminate(
    State(state): State<AppState>,
    body: Result<Json<IlluminateRequest>, JsonRejection>,
) -> ApiResult<Json<CycleReport>> {
    let Json(request) = body?;
    let payload = request.into_payload()?;
    let report = state.cycle.run_cycle(SOURCE_API, &payload).await?;
    Ok(Json(report))
}
