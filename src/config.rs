use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_TRACKER_BASE_URL: &str = "https://api.tracker.gg/api/v2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub tracker_base_url: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            tracker_base_url: DEFAULT_TRACKER_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Loads `.env` (parent directory first, then the working directory) and
    /// reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file(Path::new("../.env"));
        load_env_file(Path::new(".env"));

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?,
            None => defaults.port,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue { key: "REQUEST_TIMEOUT_SECS", value })?,
            None => defaults.request_timeout,
        };

        let tracker_base_url = lookup("TRACKER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.tracker_base_url);

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            tracker_base_url,
            request_timeout,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key: "HOST", value: self.host.clone() })
    }
}

fn load_env_file(path: &Path) -> bool {
    match dotenv::from_path(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Loaded environment file");
            true
        }
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "No environment file loaded");
            false
        }
    }
}
