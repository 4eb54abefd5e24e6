//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Hotel partner (Cleartrip) settings.
    pub hotel: HotelPartnerConfig,

    /// Flight partner settings.
    pub flight: FlightPartnerConfig,

    /// Location/hotel catalog store.
    pub catalog: CatalogConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Hotel partner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HotelPartnerConfig {
    /// Base URL every `/api/cleartrip/{path}` call is appended to.
    pub base_url: String,

    /// Partner API key sent as `x-ct-api-key`. Empty means not configured.
    pub api_key: String,
}

impl Default for HotelPartnerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cleartrip.com".to_string(),
            api_key: String::new(),
        }
    }
}

impl HotelPartnerConfig {
    pub fn api_key_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Flight partner configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FlightPartnerConfig {
    /// Base URL of the flight partner API.
    pub base_url: String,

    /// Login account identifier.
    pub username: String,

    /// Login secret.
    pub password: String,

    /// Tenant identifier sent with every login.
    pub tenant_id: String,
}

impl FlightPartnerConfig {
    /// True when every login field is present.
    pub fn credentials_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.tenant_id.is_empty()
    }
}

/// Catalog database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// PostgreSQL connection string. Empty disables the catalog routes.
    pub database_url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 5,
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Search/booking call timeout in seconds.
    pub request_secs: u64,

    /// Hotel content and location call timeout in seconds.
    pub content_secs: u64,

    /// Flight login/refresh call timeout in seconds.
    pub auth_secs: u64,

    /// Seconds subtracted from a token's reported expiry.
    pub token_margin_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 60,
            content_secs: 60,
            auth_secs: 30,
            token_margin_secs: 300,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
