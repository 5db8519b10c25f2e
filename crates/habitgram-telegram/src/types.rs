//! Wire types for the subset of the Bot API this backend consumes.

use serde::Deserialize;

/// A Telegram update delivered to the webhook. Only `callback_query` is
/// acted on; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// An inline-button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    #[serde(default)]
    pub data: Option<String>,
}

/// The pressing user.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_callback_update() {
        let raw = r#"{
            "update_id": 12345,
            "callback_query": {
                "id": "cbq-1",
                "from": {"id": 777, "first_name": "Ada", "is_bot": false},
                "data": "done:42"
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(raw).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.from.id, 777);
        assert_eq!(query.data.as_deref(), Some("done:42"));
    }

    #[test]
    fn ignores_non_callback_updates() {
        let raw = r#"{"update_id": 1, "message": {"text": "hi"}}"#;
        let update: TelegramUpdate = serde_json::from_str(raw).unwrap();
        assert!(update.callback_query.is_none());
    }
}
