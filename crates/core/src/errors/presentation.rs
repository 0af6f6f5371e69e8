//! User-facing error text, message redaction and backoff helpers

use std::time::Duration;

use once_cell::sync::Lazy;
use portal_domain::constants::{DEFAULT_RETRY_BASE_DELAY, MAX_RETRY_DELAY};
use portal_domain::{ApiError, ApiErrorCategory};
use regex::Regex;
use tracing::warn;

const GENERIC_API_MESSAGE: &str = "An error occurred. Please try again.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

static PATIENT_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)patient\s+id:?\s*\w+").expect("PATIENT_ID_REGEX should compile - this is a bug")
});

static EMAIL_FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)email:?\s*[\w.@-]+").expect("EMAIL_FIELD_REGEX should compile - this is a bug")
});

static NAME_FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)name:?\s*[\w\s]+").expect("NAME_FIELD_REGEX should compile - this is a bug")
});

static SSN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("SSN_REGEX should compile - this is a bug")
});

/// Redact patient identifiers from an error message.
///
/// Replacements run in order: patient ids, email fields, name fields, SSNs.
pub fn sanitize_message(message: &str) -> String {
    let step = PATIENT_ID_REGEX.replace_all(message, "[Patient ID]");
    let step = EMAIL_FIELD_REGEX.replace_all(&step, "[Email]");
    let step = NAME_FIELD_REGEX.replace_all(&step, "[Name]");
    SSN_REGEX.replace_all(&step, "[SSN]").into_owned()
}

/// Presentation-ready view of a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Sanitized technical message
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub user_friendly: String,
    pub retryable: bool,
}

impl ErrorInfo {
    pub fn from_api_error(err: &ApiError) -> Self {
        Self {
            message: sanitize_message(&err.message),
            status: Some(err.status),
            code: err.code.clone(),
            user_friendly: user_friendly_message(err.status).to_string(),
            retryable: err.is_retryable(),
        }
    }

    /// Any non-API failure; always offered a retry
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            message: sanitize_message(&err.to_string()),
            status: None,
            code: None,
            user_friendly: UNEXPECTED_MESSAGE.to_string(),
            retryable: true,
        }
    }
}

impl From<&ApiError> for ErrorInfo {
    fn from(err: &ApiError) -> Self {
        Self::from_api_error(err)
    }
}

fn user_friendly_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your input and try again.",
        401 => "Authentication failed. Please check your credentials and try again.",
        403 => "You don't have permission to access this resource.",
        404 => "The requested resource was not found.",
        500 => "A server error occurred. Please try again later.",
        502 | 503 => "Service temporarily unavailable. Please try again later.",
        _ => GENERIC_API_MESSAGE,
    }
}

/// Exponential backoff delay: `base * 2^attempt`, capped at 30 seconds.
///
/// Callers decide whether to retry; nothing in the client retries on its own.
pub fn retry_delay(attempt: u32, base: Option<Duration>) -> Duration {
    let base = base.unwrap_or(DEFAULT_RETRY_BASE_DELAY);
    2u32.checked_pow(attempt)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

/// Log a failed call without its message body.
pub fn log_api_error(err: &ApiError, context: Option<&str>) {
    let category: ApiErrorCategory = err.category();
    warn!(
        context = context.unwrap_or("api"),
        status = err.status,
        code = err.code.as_deref().unwrap_or("-"),
        category = ?category,
        "api request failed"
    );
}
