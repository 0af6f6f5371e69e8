//! Login contracts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Credentials posted to the login endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub access_code: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self { email: email.into(), access_code: access_code.into() }
    }
}

// Access codes must never reach logs.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("access_code", &"[REDACTED]")
            .finish()
    }
}

/// Token plus patient identity
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub patient: Patient,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("patient", &self.patient)
            .finish()
    }
}
