//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `--config <path>` if given
//! 2. `$STAGESHELL_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/stageshell/config.toml`
//! 4. `~/.stageshell/config.toml`
//!
//! # Project Config
//!
//! Located at `.stageshell/config.toml` in the working directory.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the prompt cannot be
//! empty).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// prompt = "openfpga> "
/// continue_on_error = false
/// quiet = false
/// echo_commands = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Interactive prompt
    pub prompt: Option<String>,

    /// Keep running a script after a failed command
    pub continue_on_error: Option<bool>,

    /// Minimal output by default
    pub quiet: Option<bool>,

    /// Echo each script line before running it
    pub echo_commands: Option<bool>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prompt(self.prompt.as_deref())
    }
}

/// Project configuration (working-directory scope).
///
/// # Example
///
/// ```toml
/// prompt = "fabric> "
/// continue_on_error = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Interactive prompt
    pub prompt: Option<String>,

    /// Keep running a script after a failed command
    pub continue_on_error: Option<bool>,

    /// Echo each script line before running it
    pub echo_commands: Option<bool>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prompt(self.prompt.as_deref())
    }
}

fn validate_prompt(prompt: Option<&str>) -> Result<(), ConfigError> {
    match prompt {
        Some(p) if p.trim().is_empty() => Err(ConfigError::InvalidValue(
            "prompt cannot be empty".to_string(),
        )),
        Some(p) if p.contains('\n') => Err(ConfigError::InvalidValue(
            "prompt cannot contain a newline".to_string(),
        )),
        _ => Ok(()),
    }
}
