//! Backend API access for the patient portal
//!
//! - **[`executor`]**: the live [`portal_core::RequestExecutor`] over reqwest
//! - **[`probe`]**: startup connectivity check against `/health`

pub mod executor;
pub mod probe;

pub use executor::HttpRequestExecutor;
pub use probe::{check_backend_connection, probe_backend, ConnectionStatus};
