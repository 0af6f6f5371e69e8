//! Application constants
//!
//! Centralized location for endpoint paths, timeouts and demo identities used
//! throughout the portal client.

use std::time::Duration;

// Backend endpoints (relative to the configured API base URL)
pub const LOGIN_PATH: &str = "/auth/patient/login";
pub const LABS_PATH: &str = "/api/patient/labs";
pub const MEDICATIONS_PATH: &str = "/api/patient/medications";
pub const APPOINTMENTS_PATH: &str = "/api/patient/appointments";
pub const SUMMARIES_PATH: &str = "/api/patient/summaries";
pub const HEALTH_PATH: &str = "/health";

// Timeouts
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(REQUEST_TIMEOUT_SECS);
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// Caller-side retry backoff (never applied by the executor itself)
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

// Fallback configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_WS_BASE_URL: &str = "ws://localhost:3001";

// Demo identity
pub const DEMO_TOKEN: &str = "demo-token";
pub const DEMO_PATIENT_ID: &str = "demo-patient";
pub const DEMO_PATIENT_NAME: &str = "Demo Patient";

// Headers
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Machine-readable codes attached to [`crate::ApiError`] by the client
/// itself. Server-declared codes are passed through verbatim.
pub mod error_codes {
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
}
