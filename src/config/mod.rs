//! Configuration management.
//!
//! Settings are layered, lowest precedence first: built-in defaults, a TOML
//! file, `FACT_SEARCH_*` environment variables, command-line flags.
//!
//! ```toml
//! host = "http://fact.example.org:5000"
//! destination = "./downloads"
//! timeout_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::DEFAULT_USER_AGENT;

/// Host used when nothing else is configured
pub const DEFAULT_HOST: &str = "http://localhost:5000";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "FACT_SEARCH";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the FACT service
    #[serde(default = "default_host")]
    pub host: String,

    /// Directory downloads are written to
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    /// Limit for a whole request in seconds; unset means no limit
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            destination: default_destination(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_destination() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub destination: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(destination) = overrides.destination {
            self.destination = destination;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        self
    }

    /// Check that the host is a usable http(s) base URL.
    ///
    /// A trailing slash is dropped so paths can be appended directly.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let parsed = url::Url::parse(&self.host)
            .map_err(|e| ConfigError::InvalidHost(format!("{}: {}", self.host, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidHost(format!(
                "{}: unsupported scheme {}",
                self.host,
                parsed.scheme()
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        self.host = self.host.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid host {0}")]
    InvalidHost(String),

    #[error("timeout must be at least one second")]
    InvalidTimeout,
}

/// Location of the per-user configuration file, if a config dir exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fact-search").join("config.toml"))
}

/// Find the configuration file to use when none was given explicitly
pub fn find_config_file() -> Option<PathBuf> {
    default_config_path().filter(|path| path.is_file())
}

/// Load configuration from an optional file plus the process environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with_env(path, None)
}

/// Load configuration, reading environment overrides from `env` instead of
/// the process environment when given
pub fn load_config_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env),
    );

    Ok(builder.build()?.try_deserialize()?)
}
