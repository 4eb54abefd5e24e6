//! Service identity, liveness and status views.
//!
//! None of these handlers touch a partner; they only read configuration
//! and the cached credential state.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::CredentialSnapshot;
use crate::http::server::AppState;

pub const SERVICE_NAME: &str = "Cleartrip Relay";

#[derive(Debug, Serialize)]
pub struct RootView {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub cleartrip_url: String,
    pub api_key_configured: bool,
    pub flight_url: String,
    pub flight_credentials_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct HotelView {
    pub base_url: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct FlightView {
    pub base_url: String,
    pub credentials_configured: bool,
    pub token: CredentialSnapshot,
}

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub service: &'static str,
    pub version: &'static str,
    pub hotel: HotelView,
    pub flight: FlightView,
    pub catalog: CatalogView,
}

pub async fn root() -> Json<RootView> {
    Json(RootView {
        service: SERVICE_NAME,
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthView> {
    let config = &state.config;
    Json(HealthView {
        status: "healthy",
        cleartrip_url: config.hotel.base_url.clone(),
        api_key_configured: config.hotel.api_key_configured(),
        flight_url: config.flight.base_url.clone(),
        flight_credentials_configured: config.flight.credentials_configured(),
    })
}

pub async fn status(State(state): State<AppState>) -> Json<StatusView> {
    let config = &state.config;
    let token = state.dispatcher.credentials().snapshot().await;
    Json(StatusView {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        hotel: HotelView {
            base_url: config.hotel.base_url.clone(),
            api_key_configured: config.hotel.api_key_configured(),
        },
        flight: FlightView {
            base_url: config.flight.base_url.clone(),
            credentials_configured: config.flight.credentials_configured(),
            token,
        },
        catalog: CatalogView {
            configured: state.catalog.is_some(),
        },
    })
}
