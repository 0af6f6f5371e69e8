//! # Portal Core
//!
//! Client logic of the patient portal - no HTTP stack dependencies.
//!
//! This crate contains:
//! - The in-memory auth token store and patient session
//! - Port interfaces (request executor, patient data source)
//! - The live and demo data sources and the `PortalApi` façade
//! - Error presentation helpers and client-side record views
//!
//! ## Architecture Principles
//! - Only depends on `portal-domain`
//! - No reqwest or platform code; the HTTP executor lives in `portal-infra`
//! - All network access goes through the [`RequestExecutor`] port

pub mod auth;
pub mod errors;
pub mod portal;
pub mod views;

// Re-export specific items to avoid ambiguity
pub use auth::{AuthState, AuthTokenStore, PatientSession, TokenSubscription};
pub use errors::{log_api_error, retry_delay, sanitize_message, ErrorInfo};
pub use portal::demo::{DemoDataSource, DemoExecutor, DemoFixtures};
pub use portal::live::LiveDataSource;
pub use portal::ports::{
    ApiRequest, ApiResponse, DataSourceMode, HttpMethod, PatientDataSource, RequestExecutor,
};
pub use portal::service::{PortalApi, PortalOverview};
