//! Editor configuration.

use crate::shapes::{ShapeColor, TextStyle};
use crate::tools::EditorMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Initial ambient state of an editor session.
///
/// Every field is optional in the JSON form; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Stroke color for new shapes.
    pub default_color: ShapeColor,
    /// Font for new text shapes.
    pub default_font: TextStyle,
    /// Maximum number of commands kept in history (None = unbounded).
    pub history_limit: Option<usize>,
    /// Mode the session starts in.
    pub initial_mode: EditorMode,
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        let size = self.default_font.size;
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_font.size must be positive, got {size}"
            )));
        }
        Ok(())
    }
}
