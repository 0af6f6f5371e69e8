//! Observability infrastructure
//!
//! Structured logging through `tracing`. Events never carry tokens, access
//! codes or response bodies; see [`logging`] for subscriber setup.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
