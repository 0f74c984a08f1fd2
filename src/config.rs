//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API
    pub api_url: String,
    /// Bearer token forwarded to the backend, if any
    pub api_token: Option<String>,
    /// Default TTL in seconds for cached responses without an explicit TTL
    pub default_ttl: u64,
    /// Expired-entry sweep interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Backend request timeout in seconds
    pub request_timeout: u64,
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LMS_API_URL` - Backend base URL (default: http://localhost:8000/api/v1)
    /// - `LMS_API_TOKEN` - Bearer token for the backend (default: none)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REQUEST_TIMEOUT` - Backend timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("LMS_API_URL").unwrap_or(defaults.api_url),
            api_token: env::var("LMS_API_TOKEN").ok().filter(|t| !t.is_empty()),
            default_ttl: parsed_var("DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: parsed_var("SWEEP_INTERVAL", defaults.sweep_interval),
            server_port: parsed_var("SERVER_PORT", defaults.server_port),
            request_timeout: parsed_var("REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        // A zero period would make the sweep task spin
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            default_ttl: DEFAULT_TTL_SECS,
            sweep_interval: 60,
            server_port: 3000,
            request_timeout: 30,
        }
    }
}
