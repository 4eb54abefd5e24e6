//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, then environment overrides)
//!     → validation.rs (semantic checks, reported as warnings)
//!     → RelayConfig (immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; no hot reload
//! - All fields have defaults so an empty environment still boots
//! - Missing partner keys and credentials are warnings, not errors

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CatalogConfig, FlightPartnerConfig, HotelPartnerConfig, LimitsConfig, ListenerConfig,
    ObservabilityConfig, RelayConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationWarning};
