//! Telegram Bot API gateway.
//!
//! The Bot API is plain HTTPS + JSON, so this crate is a thin `reqwest`
//! client behind the [`MessagingGateway`] trait. The trait seam exists so
//! the reminder dispatcher can be tested against a stub without network
//! access.

mod callback;
mod client;
mod error;
mod gateway;
mod types;

pub use callback::CallbackAction;
pub use client::TelegramClient;
pub use error::TelegramError;
pub use gateway::{MessagingGateway, ReminderMessage};
pub use types::{CallbackQuery, TelegramUpdate, TelegramUser};
