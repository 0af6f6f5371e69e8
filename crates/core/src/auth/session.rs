//! Patient session tracked on top of the token store
//!
//! The token store only knows the bearer string. The session adds the
//! patient identity returned by login and forgets it whenever the token
//! disappears, whether through `logout` or a 401 clear by the executor.

use std::sync::Arc;

use parking_lot::RwLock;
use portal_domain::{ApiError, LoginRequest, LoginResponse, Patient};
use tracing::debug;

use super::token_store::TokenSubscription;
use crate::portal::service::PortalApi;

pub struct PatientSession {
    api: Arc<PortalApi>,
    patient: Arc<RwLock<Option<Patient>>>,
    subscription: TokenSubscription,
}

impl PatientSession {
    pub fn new(api: Arc<PortalApi>) -> Self {
        let patient = Arc::new(RwLock::new(None));
        let slot = Arc::clone(&patient);
        let subscription = api.tokens().subscribe(move |token| {
            if token.is_none() && slot.write().take().is_some() {
                debug!("token cleared; patient session reset");
            }
        });

        Self { api, patient, subscription }
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self.api.login(credentials).await?;
        *self.patient.write() = Some(response.patient.clone());
        Ok(response)
    }

    pub fn logout(&self) {
        // the token listener resets the patient
        self.api.logout();
    }

    pub fn patient(&self) -> Option<Patient> {
        self.patient.read().clone()
    }

    /// True when both a token and a patient identity are present
    pub fn is_authenticated(&self) -> bool {
        self.api.tokens().is_authenticated() && self.patient.read().is_some()
    }

    pub fn api(&self) -> &Arc<PortalApi> {
        &self.api
    }
}

impl Drop for PatientSession {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
