//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/minimath/config.toml)
//! 3. Environment variables (MINIMATH_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "MINIMATH";

/// Default backend URL used by the sync client
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default listen port for the backend
pub const DEFAULT_PORT: u16 = 5000;

/// Quiet period before a score change is pushed
pub const DEFAULT_PUSH_DEBOUNCE_MS: u64 = 300;

/// Default per-request timeout for the HTTP transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Application configuration shared by the server and the sync client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db, saved player name)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the progress backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Port the backend listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Trailing-edge debounce for score pushes, in milliseconds
    #[serde(default = "default_push_debounce_ms")]
    pub push_debounce_ms: u64,

    /// Timeout for a single backend request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_url: default_api_url(),
            port: default_port(),
            push_debounce_ms: default_push_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (MINIMATH_DATA_DIR, MINIMATH_API_URL, ...)
    /// 2. Config file (~/.config/minimath/config.toml or MINIMATH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable numeric values are ignored and the current value kept.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        if let Some(port) = env_parse(&format!("{}_PORT", ENV_PREFIX)) {
            self.port = port;
        }

        if let Some(ms) = env_parse(&format!("{}_PUSH_DEBOUNCE_MS", ENV_PREFIX)) {
            self.push_debounce_ms = ms;
        }

        if let Some(secs) = env_parse(&format!("{}_REQUEST_TIMEOUT_SECS", ENV_PREFIX)) {
            self.request_timeout_secs = secs;
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with MINIMATH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minimath")
            .join("config.toml")
    }

    /// Get the path to the SQLite progress database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("progress.db")
    }

    /// Get the path to the saved player name file
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("player_name")
    }

    pub fn push_debounce(&self) -> Duration {
        Duration::from_millis(self.push_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("minimath")
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_push_debounce_ms() -> u64 {
    DEFAULT_PUSH_DEBOUNCE_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
