//! Inline-button callback payloads.
//!
//! Telegram limits `callback_data` to 64 bytes, so the payload is a compact
//! `action:argument` string rather than JSON.

use crate::error::TelegramError;
use habitgram_core::HabitId;

/// An action encoded in an inline button's callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Mark the habit done for today; same semantics as the in-app toggle.
    Done { habit_id: HabitId },
}

impl CallbackAction {
    /// Encodes the action for use as `callback_data`.
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Done { habit_id } => format!("done:{habit_id}"),
        }
    }

    /// Decodes a payload received in a callback query.
    pub fn decode(payload: &str) -> Result<Self, TelegramError> {
        match payload.split_once(':') {
            Some(("done", id)) => {
                let habit_id = id
                    .parse::<i64>()
                    .map_err(|_| TelegramError::MalformedCallback(payload.to_string()))?;
                Ok(CallbackAction::Done {
                    habit_id: HabitId(habit_id),
                })
            }
            _ => Err(TelegramError::MalformedCallback(payload.to_string())),
        }
    }
}
