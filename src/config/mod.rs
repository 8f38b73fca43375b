//! Client configuration (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::auth::SessionSlotConfig;
use crate::error::{LumoError, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Layered configuration for a [`crate::client::LumoClient`].
///
/// Resolution order for every field:
/// 1. Explicit `with_*` calls
/// 2. Environment (`LUMO_API_URL`, `LUMO_SESSION_DIR`, `LUMO_TIMEOUT_SECS`), `.env` included
/// 3. Built-in defaults
#[derive(Debug, Clone)]
pub struct LumoConfig {
    api_url: String,
    session_dir: PathBuf,
    timeout: Duration,
}

impl Default for LumoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LumoConfig {
    /// Built-in defaults only.
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: SessionSlotConfig::default_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from environment variables, on top of the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        if let Ok(url) = std::env::var("LUMO_API_URL") {
            config = config.with_api_url(url);
        }
        if let Ok(dir) = std::env::var("LUMO_SESSION_DIR") {
            config = config.with_session_dir(dir);
        }
        if let Ok(raw) = std::env::var("LUMO_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_timeout(Duration::from_secs(secs)),
                Err(_) => warn!(value = %raw, "ignoring unparsable LUMO_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn session_dir(&self) -> &PathBuf {
        &self.session_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a backend path such as `/api/photos`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Reject configurations that cannot produce a working client.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(LumoError::Configuration(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(LumoError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = LumoConfig::new().with_api_url("https://api.example.com/");
        assert_eq!(
            config.endpoint("/api/photos"),
            "https://api.example.com/api/photos"
        );
        assert_eq!(
            config.endpoint("api/photos"),
            "https://api.example.com/api/photos"
        );
    }

    #[test]
    fn defaults_are_valid() {
        let config = LumoConfig::new();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        config.validate().unwrap();
    }
}
