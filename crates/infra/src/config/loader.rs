//! Configuration loader
//!
//! Loads the portal client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PORTAL_API_BASE_URL`: Backend base URL (required)
//! - `PORTAL_WS_BASE_URL`: WebSocket base URL (optional, derived from the API URL)
//! - `PORTAL_DEMO_MODE`: Serve fixtures instead of calling the backend
//! - `PORTAL_ENV`: `development`, `production` or `test`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./portal.json` or `./portal.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../portal.json` or `../portal.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use portal_domain::constants::REQUEST_TIMEOUT_SECS;
use portal_domain::{PortalConfig, PortalError, Result, RuntimeEnvironment};
use tracing::{debug, info, warn};
use url::Url;

pub const API_BASE_URL_VAR: &str = "PORTAL_API_BASE_URL";
pub const WS_BASE_URL_VAR: &str = "PORTAL_WS_BASE_URL";
pub const DEMO_MODE_VAR: &str = "PORTAL_DEMO_MODE";
pub const ENVIRONMENT_VAR: &str = "PORTAL_ENV";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `PortalError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A URL is malformed
pub fn load() -> Result<PortalConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration, falling back to safe defaults on any error.
///
/// The defaults point at a local backend with demo mode on, so a
/// misconfigured client never talks to an unintended server.
pub fn load_or_default() -> PortalConfig {
    load().unwrap_or_else(|err| {
        warn!(error = %err, "Invalid portal configuration; using safe defaults (demo mode)");
        PortalConfig::default()
    })
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `PortalError::Config` if `PORTAL_API_BASE_URL` is missing or either
/// URL is malformed. An unknown `PORTAL_ENV` is treated as development.
pub fn load_from_env() -> Result<PortalConfig> {
    let api_base_url = env_var(API_BASE_URL_VAR)?;
    validate_api_url(&api_base_url)?;

    let ws_base_url = match std::env::var(WS_BASE_URL_VAR).ok().filter(|s| !s.is_empty()) {
        Some(ws) => {
            validate_ws_url(&ws)?;
            ws
        }
        None => portal_domain::derive_ws_url(&api_base_url),
    };

    let environment = match std::env::var(ENVIRONMENT_VAR) {
        Ok(value) => value.parse::<RuntimeEnvironment>().unwrap_or_else(|_| {
            warn!(value = %value, "Unknown PORTAL_ENV value; assuming development");
            RuntimeEnvironment::Development
        }),
        Err(_) => RuntimeEnvironment::default(),
    };

    Ok(PortalConfig {
        api_base_url,
        ws_base_url: Some(ws_base_url),
        demo_mode: std::env::var(DEMO_MODE_VAR).is_ok_and(|value| parse_demo_flag(&value)),
        environment,
        request_timeout_secs: REQUEST_TIMEOUT_SECS,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PortalError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded URLs fail [`validate`]
pub fn load_from_file(path: Option<PathBuf>) -> Result<PortalConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PortalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PortalError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PortalError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Apply the URL rules to an already-built configuration
///
/// # Errors
/// Returns `PortalError::Config` if the API URL does not parse or a
/// configured WebSocket URL is not `ws://`/`wss://`.
pub fn validate(config: &PortalConfig) -> Result<()> {
    validate_api_url(&config.api_base_url)?;
    if let Some(ws) = &config.ws_base_url {
        validate_ws_url(ws)?;
    }
    Ok(())
}

/// Log the effective configuration.
///
/// Warns when demo mode is enabled in production.
pub fn log_summary(config: &PortalConfig) {
    info!(
        api_base_url = %config.api_base_url,
        ws_base_url = %config.effective_ws_base_url(),
        demo_mode = config.demo_mode,
        environment = %config.environment,
        "Portal configuration"
    );

    if config.demo_mode {
        info!("Demo mode is enabled; using fixture data and never calling the backend API");
    } else {
        info!(api_base_url = %config.api_base_url, "Live mode; connecting to backend API");
    }

    if config.environment == RuntimeEnvironment::Production && config.demo_mode {
        warn!("Demo mode is enabled in production; this should only be used for development");
    }
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `PortalError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<PortalConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PortalError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PortalError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PortalError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("portal.json"),
        dir.join("portal.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("../portal.json"),
        dir.join("../portal.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `PortalError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty()).ok_or_else(|| {
        PortalError::Config(format!(
            "{key} is required. Example: {key}=http://localhost:3001"
        ))
    })
}

/// Demo mode is enabled only by `true`, `1`, `True` or `TRUE`.
fn parse_demo_flag(value: &str) -> bool {
    matches!(value, "true" | "1" | "True" | "TRUE")
}

fn validate_api_url(value: &str) -> Result<()> {
    Url::parse(value).map(|_| ()).map_err(|_| {
        PortalError::Config(format!(
            "Invalid {API_BASE_URL_VAR} format: \"{value}\". Must be a valid URL. \
             Example: http://localhost:3001 or https://api.example.com"
        ))
    })
}

fn validate_ws_url(value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|_| {
        PortalError::Config(format!(
            "Invalid {WS_BASE_URL_VAR} format: \"{value}\". Must be a valid WebSocket URL. \
             Example: ws://localhost:3001 or wss://api.example.com"
        ))
    })?;

    if !url.scheme().starts_with("ws") {
        return Err(PortalError::Config(
            "WebSocket URL must use ws:// or wss:// protocol".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_portal_env() {
        for key in [API_BASE_URL_VAR, WS_BASE_URL_VAR, DEMO_MODE_VAR, ENVIRONMENT_VAR] {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_demo_flag_parsing() {
        for value in ["true", "1", "True", "TRUE"] {
            assert!(parse_demo_flag(value), "{value} should enable demo mode");
        }
        for value in ["yes", "on", "tRuE", "false", "0", ""] {
            assert!(!parse_demo_flag(value), "{value} should not enable demo mode");
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        std::env::set_var(API_BASE_URL_VAR, "https://api.example.com");
        std::env::set_var(WS_BASE_URL_VAR, "wss://ws.example.com");
        std::env::set_var(DEMO_MODE_VAR, "TRUE");
        std::env::set_var(ENVIRONMENT_VAR, "production");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.ws_base_url.as_deref(), Some("wss://ws.example.com"));
        assert!(config.demo_mode);
        assert_eq!(config.environment, RuntimeEnvironment::Production);
        assert_eq!(config.request_timeout_secs, 30);

        clear_portal_env();
    }

    #[test]
    fn test_ws_url_is_derived_when_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        std::env::set_var(API_BASE_URL_VAR, "https://api.example.com");

        let config = load_from_env().unwrap();
        assert_eq!(config.ws_base_url.as_deref(), Some("wss://api.example.com"));
        assert!(!config.demo_mode);
        assert_eq!(config.environment, RuntimeEnvironment::Development);

        clear_portal_env();
    }

    #[test]
    fn test_unknown_environment_keeps_live_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        std::env::set_var(API_BASE_URL_VAR, "https://api.example.com");
        std::env::set_var(ENVIRONMENT_VAR, "staging");

        let config = load_from_env().unwrap();
        assert_eq!(config.environment, RuntimeEnvironment::Development);

        let config = load_or_default();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert!(!config.demo_mode);

        clear_portal_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, PortalError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_urls() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        std::env::set_var(API_BASE_URL_VAR, "not a url");
        assert!(matches!(load_from_env(), Err(PortalError::Config(_))));

        std::env::set_var(API_BASE_URL_VAR, "http://localhost:3001");
        std::env::set_var(WS_BASE_URL_VAR, "http://localhost:3002");
        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("ws:// or wss://"));

        clear_portal_env();
    }

    #[test]
    fn test_load_or_default_falls_back_to_demo() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_portal_env();

        std::env::set_var(API_BASE_URL_VAR, "not a url");
        let config = load_or_default();

        // a probed config file may exist in a dev checkout; only the invalid
        // env value is guaranteed to be rejected
        assert_ne!(config.api_base_url, "not a url");

        clear_portal_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{
                "api_base_url": "https://api.example.com",
                "demo_mode": false,
                "environment": "test"
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.environment, RuntimeEnvironment::Test);
        assert_eq!(config.effective_ws_base_url(), "wss://api.example.com");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
api_base_url = "http://localhost:4000"
ws_base_url = "ws://localhost:4001"
demo_mode = true
request_timeout_secs = 10
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.ws_base_url.as_deref(), Some("ws://localhost:4001"));
        assert!(config.demo_mode);
        assert_eq!(config.request_timeout_secs, 10);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_rejects_bad_ws_scheme() {
        let path = write_temp(
            r#"{"api_base_url": "http://localhost:4000", "ws_base_url": "https://x.test"}"#,
            "json",
        );

        let err = load_from_file(Some(path.clone())).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/portal.json")));
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api_base_url: x", &PathBuf::from("portal.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
