//! Flight partner credential lifecycle.
//!
//! # Data Flow
//! ```text
//! flight relay call
//!     → credential.rs (cached token valid? return it)
//!     → otherwise one serialized login/refresh
//!     → endpoint.rs (partner auth API)
//!     → token cached and shared with every waiter
//! ```

pub mod credential;
pub mod endpoint;

pub use credential::{CachedCredential, CredentialManager, CredentialSnapshot, DEFAULT_MARGIN};
pub use endpoint::{AuthError, HttpTokenEndpoint, TokenEndpoint, TokenGrant};
