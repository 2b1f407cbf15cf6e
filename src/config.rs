//! Configuration loading and merging.

use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Output settings.
    pub output: OutputConfig,

    /// Chain walking settings.
    pub split: SplitConfig,

    /// Diagnostic logging settings.
    pub log: LogConfig,

    /// Audit logging settings.
    pub audit: AuditConfig,
}

/// How records are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Chain walking configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SplitConfig {
    /// Keep splitting after a record with no control operator while text
    /// remains (surfaces fragments left after a redirection target).
    pub resume_after_end: Option<bool>,
}

impl SplitConfig {
    pub fn resume_after_end(&self) -> bool {
        self.resume_after_end.unwrap_or(false)
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// One of off, error, warn, info, debug, trace. Defaults to warn.
    pub level: Option<String>,
}

impl LogConfig {
    /// Resolve the configured level.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.level.as_deref() {
            None => Ok(LevelFilter::Warn),
            Some(level) => level
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(level.to_string())),
        }
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: Option<bool>,
    /// Path to audit log file.
    pub path: Option<String>,
}

impl AuditConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // ~/.config/cmd-split/config.toml
        if let Some(user_config) = Self::load_user_config()? {
            config = user_config;
        }

        // .cmd-split.toml in cwd
        if let Some(cwd) = cwd {
            if let Some(project_config) = Self::load_project_config(cwd)? {
                config.merge(project_config);
            }
        }

        // Fail on a bad level here rather than when logging starts.
        config.log.level_filter()?;
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_user_config() -> Result<Option<Self>, ConfigError> {
        let path = Self::user_config_path();
        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                return Ok(Some(Self::from_toml(&content)?));
            }
        }
        Ok(None)
    }

    fn load_project_config(cwd: &Path) -> Result<Option<Self>, ConfigError> {
        let path = cwd.join(".cmd-split.toml");
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return Ok(Some(Self::from_toml(&content)?));
        }
        Ok(None)
    }

    /// Get user config path.
    /// Respects CMD_SPLIT_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CMD_SPLIT_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("cmd-split/config.toml"))
    }

    /// Merge another config into this one (other takes precedence for scalars).
    fn merge(&mut self, other: Config) {
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.split.resume_after_end.is_some() {
            self.split.resume_after_end = other.split.resume_after_end;
        }
        if other.log.level.is_some() {
            self.log.level = other.log.level;
        }
        if other.audit.enabled.is_some() {
            self.audit.enabled = other.audit.enabled;
        }
        if other.audit.path.is_some() {
            self.audit.path = other.audit.path;
        }
    }
}
