//! Error presentation for UI callers
//!
//! Turns [`portal_domain::ApiError`] values into text that is safe to show
//! and safe to log.

pub mod presentation;

pub use presentation::{log_api_error, retry_delay, sanitize_message, ErrorInfo};
