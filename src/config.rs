//! Run configuration
//!
//! Settings come from an optional TOML file and can be overridden through
//! `LS8_TRACE` and `LS8_MAX_INSTRUCTIONS`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Print a trace line before every instruction
    pub trace: bool,
    /// Stop with an error after this many instructions
    pub max_instructions: Option<u64>,
    /// Default env_logger filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trace: false,
            max_instructions: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::new(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var("LS8_TRACE").ok().as_deref(),
            std::env::var("LS8_MAX_INSTRUCTIONS").ok().as_deref(),
        )
    }

    fn apply_overrides(
        &mut self,
        trace: Option<&str>,
        max_instructions: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = trace {
            self.trace = matches!(value, "1" | "true" | "yes" | "on");
        }
        if let Some(value) = max_instructions {
            let limit = value.trim().parse::<u64>().map_err(|_| {
                ConfigError::new(format!("LS8_MAX_INSTRUCTIONS is not a number: {}", value))
            })?;
            self.max_instructions = Some(limit);
        }
        Ok(())
    }
}
