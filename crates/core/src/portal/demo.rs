//! Demo-mode data source
//!
//! Serves non-identifying sample records so the portal is usable without a
//! backend. Any endpoint without a fixture is rejected by [`DemoExecutor`]
//! before a network call could happen.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use portal_domain::constants::{DEMO_PATIENT_ID, DEMO_PATIENT_NAME, DEMO_TOKEN};
use portal_domain::{
    ApiError, Appointment, AppointmentStatus, LabFlag, LabResult, LoginRequest, LoginResponse,
    Medication, MedicationStatus, Patient, VisitSummary,
};
use tracing::debug;

use super::ports::{ApiRequest, ApiResponse, DataSourceMode, PatientDataSource, RequestExecutor};

/// Executor that refuses every request with the demo-unavailable error
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoExecutor;

#[async_trait]
impl RequestExecutor for DemoExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "demo mode blocked request");
        Err(ApiError::demo_unavailable())
    }
}

/// Static sample collections, dated relative to a reference instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoFixtures {
    pub labs: Vec<LabResult>,
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
    pub summaries: Vec<VisitSummary>,
}

impl DemoFixtures {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let days = |n: i64| now + Duration::days(n);

        let labs = vec![
            LabResult {
                id: "lab-1".to_string(),
                test_name: "Hemoglobin A1c".to_string(),
                date: days(-14),
                value: "5.6".to_string(),
                unit: "%".to_string(),
                reference_range: "4.0–5.6".to_string(),
                flag: None,
            },
            LabResult {
                id: "lab-2".to_string(),
                test_name: "LDL Cholesterol".to_string(),
                date: days(-30),
                value: "132".to_string(),
                unit: "mg/dL".to_string(),
                reference_range: "< 100".to_string(),
                flag: Some(LabFlag::High),
            },
            LabResult {
                id: "lab-3".to_string(),
                test_name: "TSH".to_string(),
                date: days(-45),
                value: "2.1".to_string(),
                unit: "mIU/L".to_string(),
                reference_range: "0.4–4.0".to_string(),
                flag: None,
            },
        ];

        let medications = vec![
            Medication {
                id: "med-1".to_string(),
                name: "Atorvastatin".to_string(),
                dose: "20 mg".to_string(),
                frequency: "Once daily".to_string(),
                status: MedicationStatus::Active,
                prescriber: Some("Dr. Smith".to_string()),
                start_date: Some(days(-120)),
                end_date: None,
            },
            Medication {
                id: "med-2".to_string(),
                name: "Metformin".to_string(),
                dose: "500 mg".to_string(),
                frequency: "Twice daily".to_string(),
                status: MedicationStatus::Inactive,
                prescriber: Some("Dr. Patel".to_string()),
                start_date: Some(days(-500)),
                end_date: Some(days(-200)),
            },
        ];

        let appointments = vec![
            Appointment {
                id: "appt-1".to_string(),
                kind: "Primary care follow-up".to_string(),
                start: days(7),
                location: "Clinic A".to_string(),
                provider: Some("Dr. Smith".to_string()),
                status: AppointmentStatus::Scheduled,
                notes: None,
            },
            Appointment {
                id: "appt-2".to_string(),
                kind: "Lab draw".to_string(),
                start: days(-20),
                location: "Lab B".to_string(),
                provider: None,
                status: AppointmentStatus::Completed,
                notes: None,
            },
        ];

        let summaries = vec![
            VisitSummary {
                id: "sum-1".to_string(),
                title: "Annual physical".to_string(),
                date: days(-60),
                summary: "Reviewed preventive screenings and discussed lifestyle. Continued \
                          current medications. Plan for repeat labs in 3 months."
                    .to_string(),
                follow_ups: Some(vec![
                    "Repeat lipid panel in 3 months".to_string(),
                    "Schedule annual flu shot".to_string(),
                ]),
            },
            VisitSummary {
                id: "sum-2".to_string(),
                title: "Follow-up visit".to_string(),
                date: days(-20),
                summary: "Discussed blood pressure readings at home and adjusted diet plan. No \
                          medication changes at this time."
                    .to_string(),
                follow_ups: None,
            },
        ];

        Self { labs, medications, appointments, summaries }
    }
}

/// Fixture-backed [`PatientDataSource`]
#[derive(Debug, Clone)]
pub struct DemoDataSource {
    fixtures: DemoFixtures,
    executor: DemoExecutor,
}

impl Default for DemoDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDataSource {
    /// Fixtures dated relative to the current time
    pub fn new() -> Self {
        Self::with_reference_time(Utc::now())
    }

    pub fn with_reference_time(now: DateTime<Utc>) -> Self {
        Self { fixtures: DemoFixtures::generate(now), executor: DemoExecutor }
    }

    pub fn fixtures(&self) -> &DemoFixtures {
        &self.fixtures
    }
}

#[async_trait]
impl PatientDataSource for DemoDataSource {
    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Demo
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        Ok(LoginResponse {
            token: DEMO_TOKEN.to_string(),
            patient: Patient {
                id: DEMO_PATIENT_ID.to_string(),
                name: DEMO_PATIENT_NAME.to_string(),
                email: credentials.email.clone(),
            },
        })
    }

    async fn labs(&self) -> Result<Vec<LabResult>, ApiError> {
        Ok(self.fixtures.labs.clone())
    }

    async fn medications(&self) -> Result<Vec<Medication>, ApiError> {
        Ok(self.fixtures.medications.clone())
    }

    async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        Ok(self.fixtures.appointments.clone())
    }

    async fn summaries(&self) -> Result<Vec<VisitSummary>, ApiError> {
        Ok(self.fixtures.summaries.clone())
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.executor.execute(request).await
    }
}
