//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, path, query, body, headers)
//!     → request.rs (body parse, URL build)
//!     → headers::derive_headers (hotel) | auth::CredentialManager (flight)
//!     → client.rs (one outbound call with a deadline)
//!     → response.rs (JSON passthrough or diagnostic envelope)
//!     → RelayOutcome
//! ```
//!
//! # Design Decisions
//! - The dispatcher never fails: every error becomes a JSON outcome
//! - Malformed inbound bodies are dropped, not rejected
//! - No retries; one attempt per inbound call

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod flight;
pub mod request;
pub mod response;

pub use client::{ReqwestUpstream, TransportError, UpstreamClient, UpstreamResponse};
pub use dispatcher::RelayDispatcher;
pub use error::RelayError;
pub use flight::FlightOperation;
pub use request::{InboundRequest, OutboundRequestSpec};
pub use response::{ContentKind, RelayOutcome};

/// Which partner API a call is relayed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partner {
    Hotel,
    Flight,
}

impl Partner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partner::Hotel => "hotel",
            Partner::Flight => "flight",
        }
    }
}

impl std::fmt::Display for Partner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
