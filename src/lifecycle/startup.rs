//! Startup wiring: configuration in, shared application state out.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::auth::{CredentialManager, HttpTokenEndpoint};
use crate::catalog::{CatalogStore, PgCatalogStore};
use crate::config::{validate_config, RelayConfig};
use crate::http::AppState;
use crate::relay::{RelayDispatcher, ReqwestUpstream};
use crate::resilience::TimeoutPolicy;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build every shared component from `config`.
///
/// Configuration findings are logged as warnings; only a failure to build
/// the outbound HTTP client stops startup.
pub fn build_state(config: RelayConfig) -> Result<AppState, StartupError> {
    for warning in validate_config(&config) {
        tracing::warn!(field = warning.field, "Configuration: {}", warning.message);
    }

    let timeouts = TimeoutPolicy::from_config(&config.timeouts);
    let client = reqwest::Client::builder()
        .connect_timeout(timeouts.connect)
        .build()?;

    let endpoint = HttpTokenEndpoint::new(client.clone(), config.flight.clone(), timeouts.auth);
    let credentials = Arc::new(CredentialManager::new(
        Arc::new(endpoint),
        Duration::from_secs(config.timeouts.token_margin_secs),
    ));

    let dispatcher = RelayDispatcher::new(
        Arc::new(ReqwestUpstream::new(client)),
        credentials,
        config.hotel.clone(),
        config.flight.base_url.clone(),
        timeouts,
    );

    let catalog = build_catalog(&config);

    tracing::info!(
        hotel_url = %config.hotel.base_url,
        flight_url = %config.flight.base_url,
        catalog_enabled = catalog.is_some(),
        "Relay state initialized"
    );

    Ok(AppState::new(config, Arc::new(dispatcher), catalog))
}

fn build_catalog(config: &RelayConfig) -> Option<Arc<dyn CatalogStore>> {
    if config.catalog.database_url.is_empty() {
        return None;
    }
    match PgCatalogStore::connect_lazy(&config.catalog) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!(error = %e, "Catalog disabled: invalid database configuration");
            None
        }
    }
}
