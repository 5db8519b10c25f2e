//! Configuration for the habitgram backend.
//!
//! Settings come from a YAML file with `HABITGRAM_*` environment variable
//! overrides, validated as a whole before use.

pub mod loader;
pub mod settings;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    Config, DatabaseConfig, LoggingConfig, RemindersConfig, ServerConfig, TelegramConfig,
};
