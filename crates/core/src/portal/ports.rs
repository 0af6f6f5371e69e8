//! Port interfaces for backend access
//!
//! These traits define the boundaries between the portal façade and the
//! infrastructure that actually talks to the backend.

use std::fmt;

use async_trait::async_trait;
use portal_domain::{
    ApiError, Appointment, LabResult, LoginRequest, LoginResponse, Medication, VisitSummary,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP method of an [`ApiRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical backend call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, e.g. `/api/patient/labs`
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Header overrides; a `Content-Type` here replaces the JSON default
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: Vec::new() }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// POST with a JSON body.
    ///
    /// # Errors
    /// Returns an [`ApiError`] (status 0) if `body` cannot be serialized.
    pub fn post<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(ApiError::transport)?;
        Ok(Self::new(HttpMethod::Post, path).with_body(value))
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether the caller supplied its own header `name` (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

/// Successful backend reply
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, or an empty object for non-JSON replies
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn empty(status: u16) -> Self {
        Self { status, body: serde_json::Value::Object(serde_json::Map::new()) }
    }

    /// Deserialize the body into `T`.
    ///
    /// # Errors
    /// Returns an `INVALID_RESPONSE` [`ApiError`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let status = self.status;
        serde_json::from_value(self.body).map_err(|err| ApiError::invalid_body(status, err))
    }
}

/// Performs one HTTP call with the cross-cutting behavior every endpoint
/// shares (auth header, timeout, error normalization, 401 token clearing).
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Which strategy backs a [`PatientDataSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceMode {
    Live,
    Demo,
}

/// Trait for the endpoints the façade is allowed to reach
#[async_trait]
pub trait PatientDataSource: Send + Sync {
    fn mode(&self) -> DataSourceMode;

    /// Exchange credentials for a token; must not touch the token store
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn labs(&self) -> Result<Vec<LabResult>, ApiError>;

    async fn medications(&self) -> Result<Vec<Medication>, ApiError>;

    async fn appointments(&self) -> Result<Vec<Appointment>, ApiError>;

    async fn summaries(&self) -> Result<Vec<VisitSummary>, ApiError>;

    /// Raw call for endpoints without a typed operation
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
