//! Partner header derivation.
//!
//! # Data Flow
//! ```text
//! hotel relay path + method
//!     → HeaderRuleContext (lower-cased, query stripped)
//!     → rules.rs (ordered predicate/effect table)
//!     → HeaderMap attached to the outbound request
//! ```
//!
//! # Design Decisions
//! - Pure function: no I/O, no failure mode
//! - Partner policy lives in one table so new requirements are additive
//! - Matching is substring-based on the normalized path

pub mod rules;

pub use rules::{derive_headers, HeaderEffect, HeaderRule, HeaderRuleContext, RULES};

/// Header carrying the per-request correlation identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header carrying the per-call lineage identifier on inventory calls.
pub const X_LINEAGE_ID: &str = "x-lineage-id";

/// Header carrying the location versioning payload.
pub const X_META_DATA: &str = "x-meta-data";

/// Hotel partner API key header.
pub const X_CT_API_KEY: &str = "x-ct-api-key";

/// Caller-supplied session header forwarded to the flight partner.
pub const X_SESSION_ID: &str = "x-session-id";

/// Versioning payload the hotel partner expects on location hotel lists.
pub const LOCATION_METADATA: &str = r#"{"locationVersion":"V2"}"#;
