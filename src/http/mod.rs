//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, CORS, limits)
//!     → handlers.rs (extract method/path/query/body/headers)
//!     → relay::RelayDispatcher
//!     → RelayOutcome rendered as JSON
//!
//! status.rs answers /, /health and /api/status from configuration
//! without touching the network.
//! ```

pub mod handlers;
pub mod server;
pub mod status;

pub use server::{AppState, HttpServer};
