//! Registration and user profile endpoints.

use crate::auth::caller;
use crate::{ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use habitgram_core::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct EnsureUserRequest {
    #[serde(default)]
    pub referred_by: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserPayload {
    pub telegram_id: i64,
    pub xp: i64,
    pub level: i64,
    pub total_coins: i64,
    pub current_streak: i64,
    pub notifications_enabled: bool,
    pub timezone: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnsureUserResponse {
    pub success: bool,
    pub user: UserPayload,
}

impl From<habitgram_store::UserRow> for UserPayload {
    fn from(row: habitgram_store::UserRow) -> Self {
        Self {
            telegram_id: row.telegram_id,
            xp: row.xp,
            level: row.level,
            total_coins: row.total_coins,
            current_streak: row.current_streak,
            notifications_enabled: row.notifications_enabled,
            timezone: row.timezone,
        }
    }
}

/// Idempotent registration, safe to call on every app open.
pub(crate) async fn ensure_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EnsureUserRequest>,
) -> Result<Json<EnsureUserResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let row = state
        .views
        .ensure_user(user_id, request.referred_by.map(UserId), request.timezone)
        .await?;
    Ok(Json(EnsureUserResponse {
        success: true,
        user: row.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationsRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AckResponse {
    pub success: bool,
}

/// Opts a user in or out of reminder notifications.
pub(crate) async fn set_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NotificationsRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let user_id = caller(&headers)?;
    state
        .store
        .set_notifications_enabled(user_id, request.enabled)
        .await?;
    Ok(Json(AckResponse { success: true }))
}
