//! Process configuration
//!
//! Settings are read from environment variables with defaults; the CLI can
//! override individual values afterwards.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Model directory '{}' does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Model file name must not be empty")]
    EmptyModelName,

    #[error("Invalid log level '{0}', expected one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Where the model artifact lives
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Directory holding the model file (`MODEL_PATH`)
    pub model_path: PathBuf,
    /// File name inside `model_path` (`MODEL_NAME`)
    pub model_name: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models")),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| "model.json".to_string()),
        }
    }
}

impl ModelSettings {
    pub fn new(model_path: impl AsRef<Path>, model_name: impl Into<String>) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
            model_name: model_name.into(),
        }
    }

    /// Check that the model directory exists and a file name is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.model_path.is_dir() {
            return Err(ConfigError::NotADirectory(self.model_path.clone()));
        }
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }
        Ok(())
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone)]
pub struct LoggerSettings {
    /// `LOG_LEVEL`
    pub log_level: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl LoggerSettings {
    pub fn new(log_level: impl Into<String>) -> Self {
        Self {
            log_level: log_level.into(),
        }
    }

    /// Normalized log level, rejecting anything tracing does not know
    pub fn level(&self) -> Result<String, ConfigError> {
        let level = self.log_level.trim().to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(level)
        } else {
            Err(ConfigError::InvalidLogLevel(self.log_level.clone()))
        }
    }

    /// Filter directives used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> Result<String, ConfigError> {
        let level = self.level()?;
        Ok(format!("apartment_price={level},tower_http={level}"))
    }

    /// Install the global tracing subscriber. `RUST_LOG` takes precedence.
    pub fn init(&self) -> Result<(), ConfigError> {
        let directives = self.default_directives()?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| directives.into()),
            )
            .try_init()
            .map_err(|e| ConfigError::Logging(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_settings_validate() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModelSettings::new(dir.path(), "model.json").validate().is_ok());
        assert!(matches!(
            ModelSettings::new(dir.path(), "  ").validate(),
            Err(ConfigError::EmptyModelName)
        ));
        assert!(matches!(
            ModelSettings::new(dir.path().join("nope"), "model.json").validate(),
            Err(ConfigError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_model_path_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(ModelSettings::new(&file, "model.json").validate().is_err());
    }

    #[test]
    fn test_log_level_normalized() {
        assert_eq!(LoggerSettings::new(" DEBUG ").level().unwrap(), "debug");
        assert_eq!(
            LoggerSettings::new("warn").default_directives().unwrap(),
            "apartment_price=warn,tower_http=warn"
        );
        assert!(matches!(
            LoggerSettings::new("verbose").level(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
