//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to partner:
//!     → timeouts.rs (pick the deadline for this partner and path)
//!     → on expiry the relay answers 504
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - A single attempt per call: failures are reported, never retried

pub mod timeouts;

pub use timeouts::TimeoutPolicy;
