//! Telegram webhook: the "done" button entry point.

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use habitgram_core::UserId;
use habitgram_telegram::{CallbackAction, TelegramUpdate};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
pub(crate) struct WebhookResponse {
    pub success: bool,
}

/// Receives a Telegram update. Only `callback_query` presses of the inline
/// "done" button are acted on; they run the exact toggle-to-completed
/// semantics of the in-app toggle. Always answers 200 so Telegram does not
/// redeliver the update.
pub(crate) async fn receive_update(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Some(query) = update.callback_query else {
        debug!(update_id = update.update_id, "ignoring non-callback update");
        return Ok(Json(WebhookResponse { success: true }));
    };

    let Some(data) = query.data.as_deref() else {
        return Ok(Json(WebhookResponse { success: true }));
    };

    let toast = match CallbackAction::decode(data) {
        Ok(CallbackAction::Done { habit_id }) => {
            match state
                .toggle
                .toggle_done_today(habit_id, UserId(query.from.id))
                .await
            {
                Ok(outcome) if outcome.coins_earned > 0 => {
                    format!("Done! +{} coins 🎉", outcome.coins_earned)
                }
                Ok(_) => "Already done today ✅".to_string(),
                Err(e) => {
                    warn!(habit = %habit_id, user = query.from.id, error = %e, "callback toggle failed");
                    "Something went wrong, try again in the app".to_string()
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "unparseable callback payload");
            return Ok(Json(WebhookResponse { success: true }));
        }
    };

    if let Err(e) = state.gateway.answer_callback(&query.id, &toast).await {
        warn!(error = %e, "failed to answer callback query");
    }

    Ok(Json(WebhookResponse { success: true }))
}
