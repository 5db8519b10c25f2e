//! Configuration loading utilities

use crate::settings::Config;
use std::env;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse { var: String, message: String },
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable
    /// overrides, validating the result.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables only, on top of
    /// defaults. Used when no config file is given.
    pub fn load_from_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HABITGRAM_*` environment variable overrides
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(token) = env::var("HABITGRAM_TELEGRAM_TOKEN") {
            config.telegram.token = token;
        }
        if let Ok(api_base) = env::var("HABITGRAM_TELEGRAM_API_BASE") {
            config.telegram.api_base = api_base;
        }
        if let Ok(path) = env::var("HABITGRAM_DATABASE_PATH") {
            config.database.path = path;
        }
        if let Ok(addr) = env::var("HABITGRAM_BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Ok(secret) = env::var("HABITGRAM_CRON_SECRET") {
            config.server.cron_secret = secret;
        }
        if let Ok(tz) = env::var("HABITGRAM_REMINDER_TIMEZONE") {
            config.reminders.timezone = tz;
        }
        if let Ok(enabled) = env::var("HABITGRAM_REMINDERS_ENABLED") {
            config.reminders.enabled =
                enabled
                    .parse::<bool>()
                    .map_err(|e| ConfigError::EnvParse {
                        var: "HABITGRAM_REMINDERS_ENABLED".to_string(),
                        message: e.to_string(),
                    })?;
        }
        if let Ok(level) = env::var("HABITGRAM_LOG_LEVEL") {
            config.logging.level = level;
        }
        Ok(())
    }
}
