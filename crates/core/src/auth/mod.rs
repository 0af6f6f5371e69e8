//! In-memory authentication state
//!
//! The bearer token lives only in process memory: it is never written to
//! disk, keychain or any other durable store.
//!
//! - **[`token_store`]**: single source of truth for the token, with
//!   synchronous change notifications
//! - **[`session`]**: patient identity tracked alongside the token

pub mod session;
pub mod token_store;

pub use session::PatientSession;
pub use token_store::{AuthState, AuthTokenStore, TokenSubscription};
