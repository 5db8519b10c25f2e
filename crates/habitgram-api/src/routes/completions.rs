//! The completion toggle endpoint.

use crate::auth::caller;
use crate::{ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use habitgram_core::{Badge, HabitId};
use habitgram_service::ToggleRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleCompletionRequest {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub is_completed: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToggleCompletionResponse {
    pub success: bool,
    pub coins_earned: i64,
    pub new_badge: Option<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_id: Option<i64>,
}

/// Toggles a completion for a date. Idempotent in both directions; any
/// valid calendar date is accepted so retroactive logging works.
pub(crate) async fn toggle_completion(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ToggleCompletionRequest>,
) -> Result<Json<ToggleCompletionResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let outcome = state
        .toggle
        .toggle(ToggleRequest {
            habit_id: HabitId(request.habit_id),
            user_id,
            date: request.date,
            want_completed: request.is_completed,
            note: request.note,
        })
        .await?;

    Ok(Json(ToggleCompletionResponse {
        success: true,
        coins_earned: outcome.coins_earned,
        new_badge: outcome.new_badge,
        new_id: outcome.completion_id.map(|c| c.0),
    }))
}
