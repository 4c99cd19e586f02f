//! Application Configuration Module
//!
//! Loads the terminal runtime's settings from environment variables (and a
//! `.env` file when present) into a single struct handed to the session.

use interview_core::SessionSettings;
use std::env;
use std::path::PathBuf;
use tracing::Level;

// --- Application Constants ---

/// Where the profile and history live when `INTERVIEW_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./.interview-data";
/// Countdown resolution in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub catalog_dir: Option<PathBuf>,
    pub question_count: usize,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
    #[error("INTERVIEW_QUESTION_COUNT must be a positive integer, got '{0}'")]
    InvalidQuestionCount(String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `INTERVIEW_DATA_DIR`: (Optional) Directory for the profile and history files. Defaults to "./.interview-data".
    // *   `INTERVIEW_CATALOG_DIR`: (Optional) Directory of `<mode>.json` question files replacing the built-in catalog.
    // *   `INTERVIEW_QUESTION_COUNT`: (Optional) Questions per session. Defaults to 5.
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = get("INTERVIEW_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
            .into();

        let catalog_dir = get("INTERVIEW_CATALOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let question_count = match get("INTERVIEW_QUESTION_COUNT") {
            None => SessionSettings::default().question_count,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => return Err(ConfigError::InvalidQuestionCount(raw)),
            },
        };

        let log_level_str = get("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        Ok(Self {
            data_dir,
            catalog_dir,
            question_count,
            log_level,
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::default().with_question_count(self.question_count)
    }
}
