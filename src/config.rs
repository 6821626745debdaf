//! TOML-backed configuration file for run defaults.
//!
//! Every key is optional; command-line flags take precedence over the file,
//! and the file over built-in defaults.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const CONFIG_DIR_NAME: &str = "pdf-harvest";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading or validating the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its accepted range.
    #[error("Invalid config value for `{field}`: {value}. Expected range: {expected}")]
    OutOfRange {
        /// Offending key.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Accepted range.
        expected: &'static str,
    },
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Default tracing filter directive for this verbosity.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// File configuration for run defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory downloaded documents are stored in.
    pub output_dir: Option<PathBuf>,
    /// Pause after each page load before reading the location.
    pub settle_secs: Option<u64>,
    /// Budget for one browser navigation step.
    pub navigation_timeout_secs: Option<u64>,
    /// Ceiling for a whole redirect chain.
    pub chain_timeout_secs: Option<u64>,
    /// Whole-request timeout for document downloads.
    pub request_timeout_secs: Option<u64>,
    /// User-Agent header for document downloads.
    pub user_agent: Option<String>,
    /// Browser executable; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Extra browser command-line flags.
    pub browser_args: Option<Vec<String>>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(settle) = self.settle_secs
            && settle > 60
        {
            return Err(ConfigError::OutOfRange {
                field: "settle_secs",
                value: settle.to_string(),
                expected: "0..=60",
            });
        }
        validate_timeout_secs("navigation_timeout_secs", self.navigation_timeout_secs)?;
        validate_timeout_secs("chain_timeout_secs", self.chain_timeout_secs)?;
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        if let (Some(settle), Some(navigation)) = (self.settle_secs, self.navigation_timeout_secs)
            && settle >= navigation
        {
            return Err(ConfigError::OutOfRange {
                field: "settle_secs",
                value: settle.to_string(),
                expected: "less than navigation_timeout_secs",
            });
        }
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            return Err(ConfigError::OutOfRange {
                field: "user_agent",
                value: format!("{user_agent:?}"),
                expected: "non-empty string",
            });
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            expected: "1..=3600",
        });
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/pdf-harvest/config.toml`
/// 2. `$HOME/.config/pdf-harvest/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// Returns `None` when no base directory is known or no file exists there.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but is unreadable or invalid.
pub fn load_default_file_config() -> Result<Option<FileConfig>, ConfigError> {
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };

    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }

    let config = load_file_config(&path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(config))
}

/// Reads, parses and validates the config file at `path`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable or invalid.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&raw)
}

/// Parses and validates config text.
///
/// # Errors
///
/// Returns a [`ConfigError`] on syntax errors, unknown keys, or out-of-range values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
