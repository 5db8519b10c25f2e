//! The outbound messaging seam.

use crate::error::TelegramError;
use async_trait::async_trait;
use habitgram_core::{HabitId, UserId};

/// A reminder to deliver for one habit.
#[derive(Debug, Clone)]
pub struct ReminderMessage {
    pub habit_id: HabitId,
    pub habit_title: String,
}

/// Outbound messaging operations the service layer depends on.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends one reminder with an inline "done" button to the user's chat.
    async fn send_reminder(
        &self,
        chat_id: UserId,
        reminder: &ReminderMessage,
    ) -> Result<(), TelegramError>;

    /// Acknowledges a callback query, optionally with a toast text.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), TelegramError>;
}
