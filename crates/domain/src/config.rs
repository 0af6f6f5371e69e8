//! Configuration structures
//!
//! Loading (environment, files, fallbacks) lives in `portal-infra`; this
//! module only defines the shape and the safe defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_WS_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::errors::PortalError;

/// Deployment environment the client runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Production,
    Test,
}

impl RuntimeEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeEnvironment {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(PortalError::Config(format!("Unknown runtime environment: {other}"))),
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Absolute base URL of the backend API (e.g. `https://api.example.com`)
    pub api_base_url: String,
    /// WebSocket base URL; derived from the API URL when not configured
    #[serde(default)]
    pub ws_base_url: Option<String>,
    /// Serve fixtures instead of calling the backend
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub environment: RuntimeEnvironment,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for PortalConfig {
    /// Safe fallback: local backend, demo mode on.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: Some(DEFAULT_WS_BASE_URL.to_string()),
            demo_mode: true,
            environment: RuntimeEnvironment::Development,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PortalConfig {
    /// Live-mode configuration against `api_base_url` with default timeout.
    pub fn live(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ws_base_url: None,
            demo_mode: false,
            environment: RuntimeEnvironment::Development,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }

    /// Demo-mode configuration with the default base URLs.
    pub fn demo() -> Self {
        Self::default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// WebSocket base URL, derived from the API URL (`http` → `ws`) when unset.
    pub fn effective_ws_base_url(&self) -> String {
        match &self.ws_base_url {
            Some(url) => url.clone(),
            None => derive_ws_url(&self.api_base_url),
        }
    }
}

/// Replace a leading `http` scheme prefix with `ws` (`https` → `wss`).
pub fn derive_ws_url(api_base_url: &str) -> String {
    match api_base_url.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => api_base_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_safe() {
        let config = PortalConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3001");
        assert_eq!(config.effective_ws_base_url(), "ws://localhost:3001");
        assert!(config.demo_mode);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_ws_url_derivation() {
        assert_eq!(derive_ws_url("http://localhost:3001"), "ws://localhost:3001");
        assert_eq!(derive_ws_url("https://api.example.com"), "wss://api.example.com");

        let mut config = PortalConfig::live("https://api.example.com");
        assert_eq!(config.effective_ws_base_url(), "wss://api.example.com");
        config.ws_base_url = Some("ws://localhost:3002".to_string());
        assert_eq!(config.effective_ws_base_url(), "ws://localhost:3002");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<RuntimeEnvironment>().ok(), Some(RuntimeEnvironment::Production));
        assert_eq!(" Dev ".parse::<RuntimeEnvironment>().ok(), Some(RuntimeEnvironment::Development));
        assert!("staging".parse::<RuntimeEnvironment>().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: PortalConfig =
            serde_json::from_str(r#"{"api_base_url":"https://api.example.com"}"#).unwrap();
        assert!(!config.demo_mode);
        assert_eq!(config.environment, RuntimeEnvironment::Development);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.ws_base_url.is_none());
    }
}
