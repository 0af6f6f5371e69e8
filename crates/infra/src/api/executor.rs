//! HTTP request executor
//!
//! Implements [`RequestExecutor`] on top of [`HttpClient`]. Every backend call
//! of the live data source goes through here, so this is where the shared
//! behavior lives: bearer header, fixed timeout, error normalization and the
//! 401 token clear.

use std::time::Duration;

use async_trait::async_trait;
use portal_core::{ApiRequest, ApiResponse, AuthTokenStore, HttpMethod, RequestExecutor};
use portal_domain::constants::JSON_CONTENT_TYPE;
use portal_domain::{ApiError, PortalConfig, PortalError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;

/// Live executor bound to one backend base URL and one token store
pub struct HttpRequestExecutor {
    http: HttpClient,
    base_url: String,
    tokens: AuthTokenStore,
}

impl HttpRequestExecutor {
    /// Create an executor with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Http` if the underlying client cannot be built
    pub fn new(base_url: impl Into<String>, tokens: AuthTokenStore) -> Result<Self, PortalError> {
        Ok(Self::with_client(HttpClient::new()?, base_url, tokens))
    }

    pub fn with_client(http: HttpClient, base_url: impl Into<String>, tokens: AuthTokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, tokens }
    }

    /// # Errors
    ///
    /// Returns `PortalError::Http` if the underlying client cannot be built
    pub fn from_config(config: &PortalConfig, tokens: AuthTokenStore) -> Result<Self, PortalError> {
        let http = HttpClient::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(http, config.api_base_url.clone(), tokens))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn timeout(&self) -> Duration {
        self.http.timeout()
    }

    fn headers(&self, request: &ApiRequest) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if !request.has_header(CONTENT_TYPE.as_str()) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(ApiError::transport)?;
            let value = HeaderValue::from_str(value).map_err(ApiError::transport)?;
            headers.insert(name, value);
        }

        if let Some(token) = self.tokens.get().filter(|token| !token.is_empty()) {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(ApiError::transport)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path);
        let mut builder =
            self.http.request(to_reqwest_method(request.method), &url).headers(self.headers(&request)?);

        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::transport)?;
            builder = builder.body(bytes);
        }

        let response = self.http.send(builder).await.map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.reject(response).await);
        }

        if !declares_json(&response) {
            debug!(status = status.as_u16(), "non-JSON success response; returning empty body");
            return Ok(ApiResponse::empty(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::invalid_body(status.as_u16(), err))?;

        Ok(ApiResponse { status: status.as_u16(), body })
    }

    async fn reject(&self, response: Response) -> ApiError {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default();
        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), reason, &body);

        if err.is_unauthorized() {
            warn!("backend rejected bearer token; clearing stored token");
            self.tokens.clear();
        }

        warn!(status = err.status, code = ?err.code, "API request failed");
        err
    }
}

#[async_trait]
impl RequestExecutor for HttpRequestExecutor {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!("sending API request");
        match tokio::time::timeout(self.timeout(), self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.timeout().as_millis() as u64, "API request timed out");
                Err(ApiError::timeout())
            }
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn declares_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(JSON_CONTENT_TYPE))
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout()
    } else if err.is_connect() {
        ApiError::network()
    } else {
        ApiError::transport(err)
    }
}
