//! Patient portal façade
//!
//! The single entry point UI code calls. Owns the data source chosen at
//! construction and writes login results into the shared token store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use portal_domain::{
    ApiError, Appointment, LabResult, LoginRequest, LoginResponse, Medication, VisitSummary,
};
use tracing::{info, instrument, warn};

use super::demo::DemoDataSource;
use super::live::LiveDataSource;
use super::ports::{ApiRequest, ApiResponse, DataSourceMode, PatientDataSource, RequestExecutor};
use crate::auth::AuthTokenStore;
use crate::views::{self, SortOrder};

const OVERVIEW_RECENT_LABS: usize = 3;
const OVERVIEW_ACTIVE_MEDICATIONS: usize = 4;
const OVERVIEW_UPCOMING_APPOINTMENTS: usize = 3;
const OVERVIEW_RECENT_SUMMARIES: usize = 2;

/// Dashboard snapshot assembled from all four collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalOverview {
    pub lab_count: usize,
    pub medication_count: usize,
    pub appointment_count: usize,
    pub summary_count: usize,
    /// Most recent first
    pub recent_labs: Vec<LabResult>,
    pub active_medications: Vec<Medication>,
    /// Soonest first
    pub upcoming_appointments: Vec<Appointment>,
    /// Most recent first
    pub recent_summaries: Vec<VisitSummary>,
}

/// Patient portal API
pub struct PortalApi {
    source: Arc<dyn PatientDataSource>,
    tokens: AuthTokenStore,
}

impl PortalApi {
    pub fn new(source: Arc<dyn PatientDataSource>, tokens: AuthTokenStore) -> Self {
        Self { source, tokens }
    }

    /// Façade over the network, sharing `tokens` with the executor
    pub fn live(executor: Arc<dyn RequestExecutor>, tokens: AuthTokenStore) -> Self {
        Self::new(Arc::new(LiveDataSource::new(executor)), tokens)
    }

    /// Façade over the demo fixtures; no request ever leaves the process
    pub fn demo(tokens: AuthTokenStore) -> Self {
        Self::new(Arc::new(DemoDataSource::new()), tokens)
    }

    pub fn tokens(&self) -> &AuthTokenStore {
        &self.tokens
    }

    pub fn mode(&self) -> DataSourceMode {
        self.source.mode()
    }

    /// Exchange credentials for a token and store it.
    ///
    /// On failure the store is left as the executor left it.
    #[instrument(skip_all, fields(mode = ?self.source.mode()))]
    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        match self.source.login(&credentials).await {
            Ok(response) => {
                self.tokens.set(Some(response.token.clone()));
                info!(patient_id = %response.patient.id, "patient logged in");
                Ok(response)
            }
            Err(err) => {
                warn!(status = err.status, code = ?err.code, "login failed");
                Err(err)
            }
        }
    }

    /// Forget the token locally. The backend is not contacted.
    pub fn logout(&self) {
        self.tokens.clear();
        info!("patient logged out");
    }

    #[instrument(skip(self))]
    pub async fn get_labs(&self) -> Result<Vec<LabResult>, ApiError> {
        self.source.labs().await
    }

    #[instrument(skip(self))]
    pub async fn get_medications(&self) -> Result<Vec<Medication>, ApiError> {
        self.source.medications().await
    }

    #[instrument(skip(self))]
    pub async fn get_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.source.appointments().await
    }

    #[instrument(skip(self))]
    pub async fn get_summaries(&self) -> Result<Vec<VisitSummary>, ApiError> {
        self.source.summaries().await
    }

    /// Raw call for endpoints without a typed operation
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.source.execute(request).await
    }

    /// Fetch all collections concurrently; the first failure wins.
    #[instrument(skip(self))]
    pub async fn load_overview(&self, now: DateTime<Utc>) -> Result<PortalOverview, ApiError> {
        let (mut labs, medications, appointments, mut summaries) = tokio::try_join!(
            self.source.labs(),
            self.source.medications(),
            self.source.appointments(),
            self.source.summaries(),
        )?;

        let lab_count = labs.len();
        let medication_count = medications.len();
        let appointment_count = appointments.len();
        let summary_count = summaries.len();

        views::sort_by_date(&mut labs, SortOrder::NewestFirst);
        labs.truncate(OVERVIEW_RECENT_LABS);

        let mut active_medications =
            views::filter_medications(&medications, views::MedicationView::Active);
        active_medications.truncate(OVERVIEW_ACTIVE_MEDICATIONS);

        let mut upcoming = views::upcoming_appointments(&appointments, now);
        upcoming.truncate(OVERVIEW_UPCOMING_APPOINTMENTS);

        views::sort_by_date(&mut summaries, SortOrder::NewestFirst);
        summaries.truncate(OVERVIEW_RECENT_SUMMARIES);

        Ok(PortalOverview {
            lab_count,
            medication_count,
            appointment_count,
            summary_count,
            recent_labs: labs,
            active_medications,
            upcoming_appointments: upcoming,
            recent_summaries: summaries,
        })
    }
}
