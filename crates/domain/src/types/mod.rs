//! Domain types and models
//!
//! Wire contracts of the patient API. Field names follow the backend's
//! camelCase JSON; timestamps are RFC 3339 strings parsed into UTC.

pub mod auth;
pub mod records;

pub use auth::{LoginRequest, LoginResponse, Patient};
pub use records::{
    Appointment, AppointmentStatus, LabFlag, LabResult, Medication, MedicationStatus,
    VisitSummary,
};
