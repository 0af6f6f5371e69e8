//! # Portal Domain
//!
//! Domain types and models for the patient portal client.
//!
//! This crate contains:
//! - Patient record types (labs, medications, appointments, visit summaries)
//! - Login request/response contracts
//! - The API error shape and the crate-wide error enum
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other portal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
