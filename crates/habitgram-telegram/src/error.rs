//! Gateway error types using thiserror.

/// Errors from the Telegram gateway.
#[derive(thiserror::Error, Debug)]
pub enum TelegramError {
    /// Transport-level failure reaching the Bot API.
    #[error("telegram transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Bot API answered with `ok: false`.
    #[error("telegram api error: {description}")]
    Api { description: String },

    /// A callback payload that does not match any known action.
    #[error("malformed callback payload: {0}")]
    MalformedCallback(String),
}
