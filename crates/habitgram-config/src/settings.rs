//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Telegram bot configuration
    #[validate(nested)]
    pub telegram: TelegramConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Reminder dispatch configuration
    #[validate(nested)]
    pub reminders: RemindersConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TelegramConfig {
    /// Telegram bot token from BotFather
    #[validate(length(min = 1, message = "Telegram token cannot be empty"))]
    pub token: String,

    /// Base URL of the Bot API (overridable for a local bot API server)
    #[validate(url(message = "API base must be a valid URL"))]
    pub api_base: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: "https://api.telegram.org".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[validate(length(min = 1, message = "Database path cannot be empty"))]
    pub path: String,

    /// Maximum number of pooled connections
    #[validate(range(min = 1, max = 64, message = "Pool size must be between 1 and 64"))]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "habitgram.db".to_string(),
            max_connections: 5,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8080"
    #[validate(length(min = 1, message = "Bind address cannot be empty"))]
    pub bind_addr: String,

    /// Bearer token expected on the reminder-scan endpoint
    #[validate(length(min = 16, message = "Cron secret must be at least 16 characters"))]
    pub cron_secret: String,

    /// Allowed CORS origins for the mini-app frontend; empty allows any
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            cron_secret: String::new(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Reminder dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemindersConfig {
    /// Whether the in-process reminder scheduler runs
    pub enabled: bool,

    /// Primary IANA timezone for reminder slot matching; UTC is always
    /// checked as the second candidate
    #[validate(length(min = 1, message = "Timezone cannot be empty"))]
    pub timezone: String,

    /// Cron expression driving the scan (six-field, tokio-cron-scheduler)
    #[validate(length(min = 1, message = "Cron expression cannot be empty"))]
    pub cron: String,

    /// Default timezone assigned to users at registration
    #[validate(length(min = 1, message = "Default user timezone cannot be empty"))]
    pub default_user_timezone: String,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: "Europe/Moscow".to_string(),
            cron: "0 */10 * * * *".to_string(),
            default_user_timezone: "UTC".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "habitgram_service=trace")
    pub level: String,

    /// Whether to emit JSON-formatted log lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            reminders: RemindersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
