//! Backend connectivity probe
//!
//! Used at startup to tell the user early that the configured backend is
//! unreachable. Never fails; the outcome is reported in [`ConnectionStatus`].

use portal_domain::constants::{HEALTH_PATH, JSON_CONTENT_TYPE, PROBE_TIMEOUT};
use portal_domain::PortalConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::http::HttpClient;

/// Result of [`probe_backend`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub api_url: String,
    pub demo_mode: bool,
}

impl ConnectionStatus {
    fn connected(config: &PortalConfig) -> Self {
        Self {
            connected: true,
            error: None,
            api_url: config.api_base_url.clone(),
            demo_mode: config.demo_mode,
        }
    }

    fn failed(config: &PortalConfig, error: impl Into<String>) -> Self {
        Self {
            connected: false,
            error: Some(error.into()),
            api_url: config.api_base_url.clone(),
            demo_mode: config.demo_mode,
        }
    }
}

/// Check that the backend answers.
///
/// Tries `/health` first and the base URL when that request fails outright.
/// Any success status or a 404 counts as reachable. Demo mode reports
/// connected without touching the network.
#[instrument(skip_all, fields(api_url = %config.api_base_url, demo_mode = config.demo_mode))]
pub async fn probe_backend(config: &PortalConfig) -> ConnectionStatus {
    if config.demo_mode {
        return ConnectionStatus::connected(config);
    }

    let client = match HttpClient::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => return ConnectionStatus::failed(config, err.to_string()),
    };

    let base = config.api_base_url.trim_end_matches('/');
    let health_url = format!("{base}{HEALTH_PATH}");

    let response = match get(&client, &health_url).await {
        Ok(response) => response,
        Err(health_err) => {
            warn!(error = %health_err, "health endpoint unreachable; trying base URL");
            match get(&client, &config.api_base_url).await {
                Ok(response) => response,
                Err(_) => return ConnectionStatus::failed(config, "Unable to reach backend API"),
            }
        }
    };

    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_FOUND {
        ConnectionStatus::connected(config)
    } else {
        ConnectionStatus::failed(
            config,
            format!("Backend responded with status {}", status.as_u16()),
        )
    }
}

/// Run [`probe_backend`] and log the outcome.
pub async fn check_backend_connection(config: &PortalConfig) -> ConnectionStatus {
    let status = probe_backend(config).await;

    if status.demo_mode {
        info!("demo mode enabled; backend connection not checked");
    } else if status.connected {
        info!(api_url = %status.api_url, "backend API connection successful");
    } else {
        warn!(
            api_url = %status.api_url,
            error = status.error.as_deref().unwrap_or("Unable to connect to backend API"),
            "backend API connection failed; check that the backend is running and the URL is \
             correct, or enable demo mode with PORTAL_DEMO_MODE=true"
        );
    }

    status
}

async fn get(client: &HttpClient, url: &str) -> Result<Response, reqwest::Error> {
    client.send(client.request(Method::GET, url).header(CONTENT_TYPE, JSON_CONTENT_TYPE)).await
}
