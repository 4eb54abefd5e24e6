//! Cleartrip partner relay library.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;

pub use auth::CredentialManager;
pub use config::schema::RelayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use relay::{RelayDispatcher, RelayOutcome};
