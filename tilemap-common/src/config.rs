//! Configuration loading
//!
//! Bootstrap configuration is a small TOML file. Resolution priority:
//! 1. Explicit path (command-line argument)
//! 2. `TILEMAP_CONFIG` environment variable
//! 3. `<user config dir>/tilemap/config.toml`
//! 4. Compiled defaults
//!
//! A missing or malformed file never aborts startup: a warning is logged and
//! the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TILEMAP_CONFIG";

/// Environment variable overriding the configured log level
pub const LOG_LEVEL_ENV_VAR: &str = "TILEMAP_LOG_LEVEL";

/// Default depth bound for the first-tile search
pub const DEFAULT_MAX_SEARCH_DEPTH: usize = 5;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Import tuning (optional)
    #[serde(default)]
    pub import: ImportSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Importer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// How many directory levels below the input directory the first-tile
    /// search may descend (the input directory itself is depth 0)
    #[serde(default = "default_max_search_depth")]
    pub max_search_depth: usize,

    /// EventBus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_search_depth: default_max_search_depth(),
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_search_depth() -> usize {
    DEFAULT_MAX_SEARCH_DEPTH
}

fn default_event_capacity() -> usize {
    100
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load configuration with graceful degradation
    ///
    /// Never fails: unreadable or invalid files fall back to defaults. The
    /// outcome is logged immediately, so call this only once a tracing
    /// subscriber is installed; otherwise use [`resolve`](Self::resolve).
    pub fn load(cli_path: Option<&Path>) -> Self {
        let loaded = Self::resolve(cli_path);
        loaded.log_source();
        loaded.config
    }

    /// Resolve and load configuration without logging
    ///
    /// The returned [`ConfigSource`] records where the values came from so
    /// the caller can report it after logging is set up.
    pub fn resolve(cli_path: Option<&Path>) -> LoadedConfig {
        let (mut config, source) = match resolve_config_path(cli_path) {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => (config, ConfigSource::File(path)),
                Err(e) => (
                    Self::default(),
                    ConfigSource::Fallback {
                        path,
                        reason: e.to_string(),
                    },
                ),
            },
            None => (Self::default(), ConfigSource::Defaults),
        };

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV_VAR) {
            if !level.trim().is_empty() {
                config.logging.level = level.trim().to_string();
            }
        }

        LoadedConfig { config, source }
    }

    fn validate(&self) -> Result<()> {
        if self.import.event_capacity == 0 {
            return Err(Error::Config(
                "import.event_capacity must be at least 1".to_string(),
            ));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(Error::Config(format!("Unknown log level: {}", other))),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No config file found
    Defaults,
    /// A file was found but could not be used; defaults apply
    Fallback { path: PathBuf, reason: String },
}

/// Configuration together with its [`ConfigSource`]
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    /// Report the configuration source through tracing
    pub fn log_source(&self) {
        match &self.source {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Defaults => {
                info!("No configuration file found, using defaults");
            }
            ConfigSource::Fallback { path, reason } => {
                warn!(
                    "Failed to load configuration from {}: {}. Using defaults.",
                    path.display(),
                    reason
                );
            }
        }
    }
}

/// Locate the config file following the priority order
///
/// Returns `None` when no candidate exists; an explicit CLI or environment
/// path is returned even if missing so the caller can warn about it.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location, e.g. `~/.config/tilemap/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tilemap").join("config.toml"))
}
