// crates/rollcall-core/src/config.rs - Configuration schema and loading
//
// Configuration sources, highest to lowest priority:
// 1. Command-line arguments (--data-file, handled by the CLI crate)
// 2. Environment variables (ROLLCALL_DATA_FILE, ROLLCALL_COLOR)
// 3. Config file (rollcall.toml, path supplied by the CLI crate)
// 4. Built-in defaults
//
// Missing config files are not errors; invalid TOML and invalid values are.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid TOML syntax in {file}: {error}")]
    ParseError { file: String, error: String },

    #[error("invalid configuration value: {0}")]
    ValidationError(String),

    #[error("I/O error reading config: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete configuration schema for rollcall
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollcallConfig {
    /// Roster storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Shell output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the roster data file lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON roster file. Relative paths resolve against the
    /// current directory. Defaults to "roster.json" when unset.
    pub data_file: Option<String>,
}

/// How the interactive shell presents itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Color output: "auto", "always", "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Prompt string shown before each command
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_color() -> String {
    "auto".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            prompt: default_prompt(),
        }
    }
}

impl RollcallConfig {
    /// Load configuration: defaults, then the config file if it exists,
    /// then environment-variable overrides, then validation.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = RollcallConfig::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    file: path.display().to_string(),
                    error: e.to_string(),
                })?;
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(data_file) = std::env::var("ROLLCALL_DATA_FILE") {
            self.storage.data_file = Some(data_file);
        }
        if let Ok(color) = std::env::var("ROLLCALL_COLOR") {
            self.output.color = color;
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        match self.output.color.as_str() {
            "auto" | "always" | "never" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "invalid color '{other}'; must be one of: auto, always, never"
                )));
            }
        }
        if self.output.prompt.is_empty() {
            return Err(ConfigError::ValidationError(
                "prompt cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RollcallConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.color, "auto");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = RollcallConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: RollcallConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(config.output.prompt, parsed.output.prompt);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let parsed: RollcallConfig =
            toml::from_str("[storage]\ndata_file = \"students.json\"\n").unwrap();
        assert_eq!(parsed.storage.data_file.as_deref(), Some("students.json"));
        assert_eq!(parsed.output.prompt, "> ");
    }

    #[test]
    fn invalid_color_is_rejected() {
        let mut config = RollcallConfig::default();
        config.output.color = "sometimes".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
