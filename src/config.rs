use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{AppError, Result};

pub const NPS_BASE_URL: &str = "https://www.nps.gov";
pub const MAPQUEST_RADIUS_URL: &str = "http://www.mapquestapi.com/search/v2/radius";

const DEFAULT_CACHE_PATH: &str = "cache.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub mapquest_api_key: String,
    pub cache_path: PathBuf,
    pub http_timeout: Duration,
}

// The API key must never reach a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mapquest_api_key", &"<redacted>")
            .field("cache_path", &self.cache_path)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(cli, |name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Command-line
    /// flags take precedence over the environment.
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mapquest_api_key = lookup("MAPQUEST_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("MAPQUEST_API_KEY is not set".to_string()))?;

        let cache_path = match &cli.cache {
            Some(path) => path.clone(),
            None => lookup("NPS_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
        };

        let timeout_secs = match cli.timeout {
            Some(secs) => secs,
            None => match lookup("NPS_HTTP_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .map_err(|e| AppError::ConfigError(format!("Invalid timeout: {}", e)))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(AppError::ConfigError("Timeout must be at least one second".to_string()));
        }

        Ok(Config {
            mapquest_api_key,
            cache_path,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
