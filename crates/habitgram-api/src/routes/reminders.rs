//! Cron-triggered reminder scan.

use crate::auth::check_cron_bearer;
use crate::{ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use habitgram_service::ReminderReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ScanResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: ReminderReport,
}

/// Runs one reminder scan cycle. Bearer-token authenticated; intended to
/// be hit by an external scheduler every 10 minutes (the in-process cron
/// job calls the same dispatcher).
pub(crate) async fn scan(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ScanResponse>, ApiError> {
    check_cron_bearer(&headers, &state.cron_secret)?;
    let report = state.dispatcher.dispatch(Utc::now()).await?;
    Ok(Json(ScanResponse {
        success: true,
        report,
    }))
}
