//! # Portal Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed request executor and HTTP client
//! - The backend connectivity probe
//! - Configuration loading (environment, `.env`, JSON/TOML files)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `portal-core`
//! - Depends on `portal-domain` and `portal-core`
//! - Contains all "impure" code (network, environment, files)

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{check_backend_connection, probe_backend, ConnectionStatus, HttpRequestExecutor};
pub use bootstrap::build_portal_api;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
