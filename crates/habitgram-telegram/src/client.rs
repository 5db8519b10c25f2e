//! Bot API client over reqwest.

use crate::error::TelegramError;
use crate::gateway::{MessagingGateway, ReminderMessage};
use crate::CallbackAction;
use async_trait::async_trait;
use habitgram_core::UserId;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Minimal Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Creates a new client against the given Bot API base URL.
    pub fn new(api_base: String, token: String, timeout_seconds: u64) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_base,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<(), TelegramError> {
        let response: ApiResponse = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(TelegramError::Api {
                description: response
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for TelegramClient {
    async fn send_reminder(
        &self,
        chat_id: UserId,
        reminder: &ReminderMessage,
    ) -> Result<(), TelegramError> {
        debug!(chat = %chat_id, habit = %reminder.habit_id, "sending reminder");

        let callback_data = CallbackAction::Done {
            habit_id: reminder.habit_id,
        }
        .encode();

        self.call(
            "sendMessage",
            json!({
                "chat_id": chat_id.0,
                "text": format!("⏰ Time for: {}", reminder.habit_title),
                "reply_markup": {
                    "inline_keyboard": [[{
                        "text": "Done ✅",
                        "callback_data": callback_data,
                    }]]
                }
            }),
        )
        .await
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), TelegramError> {
        self.call(
            "answerCallbackQuery",
            json!({
                "callback_query_id": callback_id,
                "text": text,
            }),
        )
        .await
    }
}
