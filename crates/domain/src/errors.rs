//! Error types used throughout the portal client

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::error_codes;

/// Main error type for non-request failures (configuration, client setup)
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Where an [`ApiError`] was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorOrigin {
    /// The backend answered with a non-success status
    Response,
    /// A success response whose declared JSON body could not be parsed
    InvalidBody,
    /// Connection or DNS failure before any response
    Network,
    /// The fixed request timeout elapsed
    Timeout,
    /// Any other transport failure, propagated with its own message
    Transport,
    /// Demo mode blocked an endpoint that has no fixture
    DemoUnavailable,
}

/// Categories of API errors for presentation and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCategory {
    /// 401 - token rejected, caller must log in again
    Authentication,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// Other 4xx
    Client,
    /// 5xx
    Server,
    /// Connection/DNS failures and other transport errors
    Network,
    /// Request exceeded the fixed timeout
    Timeout,
    /// Backend replied 2xx with an unparseable JSON body
    InvalidResponse,
    /// Endpoint not available while serving demo fixtures
    DemoUnavailable,
}

/// Normalized failure of a single backend call.
///
/// Carries the `{message, status, code}` shape every caller branches on.
/// `status` is `0` for failures that happened before a response existed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub code: Option<String>,
    origin: ApiErrorOrigin,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ApiError {
    /// Build an error with an explicit message, status and code.
    pub fn new(message: impl Into<String>, status: u16, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code,
            origin: ApiErrorOrigin::Response,
            source: None,
        }
    }

    /// Connection or DNS failure before any response was received.
    pub fn network() -> Self {
        Self {
            message: "Unable to connect to the server. Please check your internet connection."
                .to_string(),
            status: 0,
            code: Some(error_codes::NETWORK_ERROR.to_string()),
            origin: ApiErrorOrigin::Network,
            source: None,
        }
    }

    /// The fixed request timeout elapsed.
    pub fn timeout() -> Self {
        Self {
            message: "Request timed out. Please try again.".to_string(),
            status: 0,
            code: Some(error_codes::TIMEOUT.to_string()),
            origin: ApiErrorOrigin::Timeout,
            source: None,
        }
    }

    /// Endpoint blocked while demo mode serves fixtures.
    pub fn demo_unavailable() -> Self {
        Self {
            message: "Demo mode is enabled. This endpoint is not available.".to_string(),
            status: 0,
            code: None,
            origin: ApiErrorOrigin::DemoUnavailable,
            source: None,
        }
    }

    /// Any other transport failure. The message is the underlying error's own.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            status: 0,
            code: None,
            origin: ApiErrorOrigin::Transport,
            source: Some(Arc::new(err)),
        }
    }

    /// A 2xx response declared JSON but the body did not parse.
    pub fn invalid_body(status: u16, err: serde_json::Error) -> Self {
        Self {
            message: format!("Failed to parse response: {err}"),
            status,
            code: Some(error_codes::INVALID_RESPONSE.to_string()),
            origin: ApiErrorOrigin::InvalidBody,
            source: Some(Arc::new(err)),
        }
    }

    /// Normalize a non-success response.
    ///
    /// The message falls back to `HTTP <status>: <reason>` unless the body is
    /// a JSON object carrying a `message` or `error` string. A string `code`
    /// field is passed through.
    pub fn from_response(status: u16, reason: &str, body: &[u8]) -> Self {
        let mut message = format!("HTTP {status}: {reason}");
        let mut code = None;

        let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
        if let Some(fields) = parsed.as_ref().and_then(serde_json::Value::as_object) {
            if let Some(text) =
                non_empty_str(fields.get("message")).or_else(|| non_empty_str(fields.get("error")))
            {
                message = text.to_string();
            }
            code = fields.get("code").and_then(serde_json::Value::as_str).map(str::to_string);
        }

        Self { message, status, code, origin: ApiErrorOrigin::Response, source: None }
    }

    pub fn origin(&self) -> ApiErrorOrigin {
        self.origin
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self.origin {
            ApiErrorOrigin::Network | ApiErrorOrigin::Transport => ApiErrorCategory::Network,
            ApiErrorOrigin::Timeout => ApiErrorCategory::Timeout,
            ApiErrorOrigin::DemoUnavailable => ApiErrorCategory::DemoUnavailable,
            ApiErrorOrigin::InvalidBody => ApiErrorCategory::InvalidResponse,
            ApiErrorOrigin::Response => match self.status {
                401 => ApiErrorCategory::Authentication,
                403 => ApiErrorCategory::Forbidden,
                404 => ApiErrorCategory::NotFound,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
        }
    }

    /// True when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.origin == ApiErrorOrigin::Response && self.status == 401
    }

    /// Whether a caller may offer a retry (server errors and status 0).
    pub fn is_retryable(&self) -> bool {
        self.status >= 500 || self.status == 0
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.status == other.status
            && self.code == other.code
            && self.origin == other.origin
    }
}

fn non_empty_str(value: Option<&serde_json::Value>) -> Option<&str> {
    value.and_then(serde_json::Value::as_str).filter(|s| !s.is_empty())
}
