//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The shell has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Working-directory overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Project Config Locations
//!
//! Searched in order:
//! 1. `.stageshell/config.toml` (canonical)
//! 2. `.stageshell.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use stageshell::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new(".")), None).unwrap();
//! let config = result.config;
//! println!("Prompt: {}", config.prompt());
//! println!("Continue on error: {}", config.continue_on_error());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, ProjectConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "stageshell> ";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules: project config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if present)
    pub project: Option<ProjectConfig>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// `explicit` (from `--config`) replaces the global search and must
    /// exist. If `project_dir` is provided, project config is loaded from it.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if its values are invalid. Missing files are not an error.
    pub fn load(project_dir: Option<&Path>, explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_global(),
        };
        Self::from_files(global_path.as_deref(), project_dir)
    }

    /// Load configuration from a known global file and project directory.
    pub fn from_files(global_path: Option<&Path>, project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global = match global_path {
            Some(path) => read_toml::<GlobalConfig>(path)?,
            None => GlobalConfig::default(),
        };

        let (project, project_path) = match project_dir {
            Some(dir) => Self::load_project(dir, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path: global_path.map(Path::to_path_buf),
                project_path,
            },
            warnings,
        })
    }

    /// Locate the global config file.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $STAGESHELL_CONFIG
        if let Ok(path) = std::env::var("STAGESHELL_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/stageshell/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("stageshell/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.stageshell/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".stageshell/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Load project configuration from standard locations.
    fn load_project(
        dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<ProjectConfig>, Option<PathBuf>), ConfigError> {
        // 1. Check .stageshell/config.toml (canonical)
        let canonical = Self::project_config_path(dir);
        if canonical.exists() {
            let config = read_toml(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        // 2. Check .stageshell.toml (compatibility)
        let compat = dir.join(".stageshell.toml");
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            let config = read_toml(&compat)?;
            return Ok((Some(config), Some(compat)));
        }

        Ok((None, None))
    }

    /// Get the canonical path for project config.
    pub fn project_config_path(dir: &Path) -> PathBuf {
        dir.join(".stageshell/config.toml")
    }

    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the interactive prompt.
    ///
    /// Defaults to [`DEFAULT_PROMPT`].
    pub fn prompt(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.prompt.as_deref())
            .or(self.global.prompt.as_deref())
            .unwrap_or(DEFAULT_PROMPT)
    }

    /// Check if scripts keep running after a failure.
    ///
    /// Defaults to `false`.
    pub fn continue_on_error(&self) -> bool {
        self.project
            .as_ref()
            .and_then(|p| p.continue_on_error)
            .or(self.global.continue_on_error)
            .unwrap_or(false)
    }

    /// Check if output is quiet by default.
    ///
    /// Defaults to `false`.
    pub fn quiet(&self) -> bool {
        self.global.quiet.unwrap_or(false)
    }

    /// Check if script lines are echoed.
    ///
    /// Defaults to `false`.
    pub fn echo_commands(&self) -> bool {
        self.project
            .as_ref()
            .and_then(|p| p.echo_commands)
            .or(self.global.echo_commands)
            .unwrap_or(false)
    }

    /// Render the effective configuration as TOML.
    pub fn effective_toml(&self) -> Result<String, ConfigError> {
        let effective = GlobalConfig {
            prompt: Some(self.prompt().to_string()),
            continue_on_error: Some(self.continue_on_error()),
            quiet: Some(self.quiet()),
            echo_commands: Some(self.echo_commands()),
        };
        toml::to_string_pretty(&effective).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Read and parse a TOML config file.
fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
