use axum::{extract::State, http::StatusCode, Json};
use models::dashboard::DashboardSummary;

use crate::errors::ApiError;
use crate::state::AppState;

/// `GET /dashboard/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.dashboard.summary().await.map_err(ApiError::dashboard)?;
    Ok(Json(summary.as_ref().clone()))
}

/// `POST /dashboard/cache/invalidate`
pub async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.dashboard.invalidate().await;
    StatusCode::NO_CONTENT
}
