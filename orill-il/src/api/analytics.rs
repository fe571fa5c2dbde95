//! Analytics endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::services::AnalyticsSummary;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Defaults to the configured recent-runs limit
    pub limit: Option<i64>,
}

/// GET /api/analytics/summary?limit=N
///
/// Per-analyzer acuity, audit status counts, and the newest runs, read from one
/// snapshot. A non-numeric or non-positive `limit` is rejected with 400.
pub async fn get_analytics_summary(
    State(state): State<AppState>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> ApiResult<Json<AnalyticsSummary>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(state.recent_runs_limit);
    let summary = state.cycle.recorder().analytics_summary(limit).await?;
    Ok(Json(summary))
}
