//! Wiring of the portal façade from configuration
//!
//! The data source is selected here, once. Nothing downstream checks the
//! demo flag again.

use std::sync::Arc;

use portal_core::{AuthTokenStore, PortalApi, RequestExecutor};
use portal_domain::{PortalConfig, PortalError};
use tracing::info;

use crate::api::HttpRequestExecutor;

/// Build the façade for `config`, sharing `tokens` with the executor.
///
/// # Errors
///
/// Returns `PortalError::Http` if the live HTTP client cannot be built.
pub fn build_portal_api(config: &PortalConfig, tokens: AuthTokenStore) -> Result<PortalApi, PortalError> {
    if config.demo_mode {
        info!("portal API using demo fixtures");
        return Ok(PortalApi::demo(tokens));
    }

    let executor = HttpRequestExecutor::from_config(config, tokens.clone())?;
    info!(api_base_url = %executor.base_url(), "portal API using live backend");
    Ok(PortalApi::live(Arc::new(executor) as Arc<dyn RequestExecutor>, tokens))
}
