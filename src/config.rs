//! Configuration System
//!
//! Handles loading configuration from TOML files and environment variables.
//! The browser build parses an embedded TOML document instead of a file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paging::PageStrategy;

/// Longest day range the player view offers (about a century)
pub const MAX_DAY_RANGE: u32 = 36_500;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub player: PlayerViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Economy API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Prefix for every `/api/...` request. Empty means same origin.
    #[serde(default)]
    pub base_url: String,

    /// Only honored by the native transport.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// List pagination settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Strategy used by the players view.
    #[serde(default)]
    pub players: PageStrategy,
}

fn default_page_size() -> usize {
    50
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            players: PageStrategy::default(),
        }
    }
}

/// Player detail view settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerViewConfig {
    /// Day ranges offered by the range selector. Empty disables the selector.
    #[serde(default = "default_day_ranges")]
    pub day_ranges: Vec<u32>,
}

fn default_day_ranges() -> Vec<u32> {
    vec![1, 7, 30]
}

impl Default for PlayerViewConfig {
    fn default() -> Self {
        Self {
            day_ranges: default_day_ranges(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
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
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("econ-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Reject values the views cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination.page_size must be at least 1".to_string(),
            ));
        }
        if self.player.day_ranges.iter().any(|d| *d == 0 || *d > MAX_DAY_RANGE) {
            return Err(ConfigError::Invalid(format!(
                "player.day_ranges entries must be between 1 and {}",
                MAX_DAY_RANGE
            )));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ECON_DASHBOARD_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(size) = std::env::var("ECON_DASHBOARD_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                self.pagination.page_size = s;
            }
        }
        if let Ok(strategy) = std::env::var("ECON_DASHBOARD_PLAYERS_PAGING") {
            match strategy.parse() {
                Ok(s) => self.pagination.players = s,
                Err(e) => tracing::warn!("Ignoring ECON_DASHBOARD_PLAYERS_PAGING: {}", e),
            }
        }

        if let Ok(level) = std::env::var("ECON_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ECON_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Economy Dashboard Configuration
#
# Environment variables override these settings:
# - ECON_DASHBOARD_API_URL
# - ECON_DASHBOARD_PAGE_SIZE
# - ECON_DASHBOARD_PLAYERS_PAGING
# - ECON_DASHBOARD_LOG_LEVEL
# - ECON_DASHBOARD_LOG_FORMAT

[api]
# Prefix for /api requests; empty uses the page's own origin
base_url = ""

# Request timeout in seconds (CLI only)
request_timeout_secs = 30

[pagination]
# Items per page for player and transaction lists
page_size = 50

# Players list strategy: "server-paged" re-queries /api/players?page=N,
# "client-paged" loads /api/players once and pages locally
players = "server-paged"

[player]
# Day ranges offered on the player page, empty to hide the selector
day_ranges = [1, 7, 30]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (CLI only)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.pagination.page_size, 50);
        assert_eq!(config.pagination.players, PageStrategy::ServerPaged);
        assert_eq!(config.player.day_ranges, vec![1, 7, 30]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::from_toml_str(&generate_default_config()).unwrap();
        assert_eq!(config.pagination.page_size, 50);
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [pagination]
            players = "client-paged"
            "#,
        )
        .unwrap();

        assert_eq!(config.pagination.players, PageStrategy::ClientPaged);
        assert_eq!(config.pagination.page_size, 50);
        assert_eq!(config.player.day_ranges, vec![1, 7, 30]);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::from_toml_str("[pagination]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_day_range_bounds() {
        for ranges in ["[0]", "[7, 40000]"] {
            let toml = format!("[player]\nday_ranges = {}\n", ranges);
            let err = Config::from_toml_str(&toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {}", ranges);
        }
        let config = Config::from_toml_str("[player]\nday_ranges = [36500]\n").unwrap();
        assert_eq!(config.player.day_ranges, vec![MAX_DAY_RANGE]);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = Config::from_toml_str("[pagination]\nplayers = \"infinite\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://127.0.0.1:8080\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
