//! Aggregate statistics endpoints.

use crate::auth::caller;
use crate::{ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use habitgram_service::{HeatmapStats, RadarScore, WeeklyCount};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct WeeklyResponse {
    pub success: bool,
    pub days: Vec<WeeklyCount>,
}

/// Last 7 days of completion counts, oldest first.
pub(crate) async fn weekly(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WeeklyResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let days = state.stats.weekly(user_id).await?;
    Ok(Json(WeeklyResponse { success: true, days }))
}

#[derive(Debug, Serialize)]
pub(crate) struct HeatmapResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: HeatmapStats,
}

/// The 365-day heatmap plus global totals.
pub(crate) async fn heatmap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let stats = state.stats.heatmap(user_id).await?;
    Ok(Json(HeatmapResponse {
        success: true,
        stats,
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct RadarResponse {
    pub success: bool,
    pub axes: Vec<RadarScore>,
}

/// Category radar scores over the six fixed axes.
pub(crate) async fn radar(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RadarResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let axes = state.stats.radar(user_id).await?;
    Ok(Json(RadarResponse { success: true, axes }))
}
