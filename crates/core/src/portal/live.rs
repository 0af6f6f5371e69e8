//! Network-backed data source
//!
//! Maps each typed operation onto its fixed endpoint and hands the call to a
//! [`RequestExecutor`]. Collections are returned exactly as the backend
//! shaped them.

use std::sync::Arc;

use async_trait::async_trait;
use portal_domain::constants::{
    APPOINTMENTS_PATH, LABS_PATH, LOGIN_PATH, MEDICATIONS_PATH, SUMMARIES_PATH,
};
use portal_domain::{
    ApiError, Appointment, LabResult, LoginRequest, LoginResponse, Medication, VisitSummary,
};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::ports::{ApiRequest, ApiResponse, DataSourceMode, PatientDataSource, RequestExecutor};

pub struct LiveDataSource {
    executor: Arc<dyn RequestExecutor>,
}

impl LiveDataSource {
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self { executor }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.executor.execute(ApiRequest::get(path)).await?.json()
    }
}

#[async_trait]
impl PatientDataSource for LiveDataSource {
    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Live
    }

    #[instrument(skip_all)]
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH, credentials)?;
        self.executor.execute(request).await?.json()
    }

    async fn labs(&self) -> Result<Vec<LabResult>, ApiError> {
        self.fetch(LABS_PATH).await
    }

    async fn medications(&self) -> Result<Vec<Medication>, ApiError> {
        self.fetch(MEDICATIONS_PATH).await
    }

    async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.fetch(APPOINTMENTS_PATH).await
    }

    async fn summaries(&self) -> Result<Vec<VisitSummary>, ApiError> {
        self.fetch(SUMMARIES_PATH).await
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.executor.execute(request).await
    }
}
