//! Tracker settings
//!
//! Settings come from an optional `config.toml`, then `SYMPTOM_TRACKER_*`
//! environment variables on top. Every section and key may be omitted.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::tracker::{ChartWindow, DuplicatePolicy, TrackerOptions, WeekStart};

/// All settings, one field per TOML section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracker behaviour configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// Chart window selected at startup
    #[serde(default)]
    pub default_window: ChartWindow,

    /// What a second submission for the same date does
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// First column of the calendar grid
    #[serde(default)]
    pub week_start: WeekStart,
}

impl TrackerConfig {
    pub fn options(&self) -> TrackerOptions {
        TrackerOptions {
            default_window: self.default_window,
            duplicate_policy: self.duplicate_policy,
            week_start: self.week_start,
        }
    }
}

/// `[logging]` section: subscriber level and output format
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Read and parse a TOML settings file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Defaults plus environment overrides, no file
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// A settings file plus environment overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load(path).map(|mut config| {
            config.apply_env_overrides();
            config
        })
    }

    /// Candidate settings files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("symptom-tracker").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/symptom-tracker/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// First readable file from [`Config::search_paths`], else defaults
    ///
    /// A file that exists but fails to load is skipped with a warning.
    pub fn load_default() -> Self {
        for path in Self::search_paths().into_iter().filter(|p| p.exists()) {
            match Self::load_with_env(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "settings file loaded");
                    return config;
                }
                Err(e) => tracing::warn!(error = %e, "skipping settings file"),
            }
        }

        tracing::info!("no settings file found, using defaults");
        Self::from_env()
    }

    /// Layer `SYMPTOM_TRACKER_*` variables over the current values
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(window) = lookup("SYMPTOM_TRACKER_WINDOW") {
            match window.parse() {
                Ok(w) => self.tracker.default_window = w,
                Err(e) => tracing::warn!("Ignoring SYMPTOM_TRACKER_WINDOW: {}", e),
            }
        }
        if let Some(policy) = lookup("SYMPTOM_TRACKER_DUPLICATES") {
            match policy.parse() {
                Ok(p) => self.tracker.duplicate_policy = p,
                Err(e) => tracing::warn!("Ignoring SYMPTOM_TRACKER_DUPLICATES: {}", e),
            }
        }
        if let Some(week_start) = lookup("SYMPTOM_TRACKER_WEEK_START") {
            match week_start.parse() {
                Ok(w) => self.tracker.week_start = w,
                Err(e) => tracing::warn!("Ignoring SYMPTOM_TRACKER_WEEK_START: {}", e),
            }
        }

        if let Some(level) = lookup("SYMPTOM_TRACKER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SYMPTOM_TRACKER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Settings file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("invalid settings file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Commented settings file with every default spelled out
pub fn generate_default_config() -> String {
    r#"# Symptom Tracker Configuration
#
# Environment variables override these settings:
# - SYMPTOM_TRACKER_WINDOW
# - SYMPTOM_TRACKER_DUPLICATES
# - SYMPTOM_TRACKER_WEEK_START
# - SYMPTOM_TRACKER_LOG_LEVEL
# - SYMPTOM_TRACKER_LOG_FORMAT

[tracker]
# Chart window at startup: 1week, 2weeks, 1month, 1year
default_window = "2weeks"

# Second submission for a date: append (keep both) or replace
duplicate_policy = "append"

# First calendar column: sunday or monday
week_start = "sunday"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}
