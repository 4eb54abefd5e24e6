//! Location/hotel catalog lookups.
//!
//! # Data Flow
//! ```text
//! GET /api/catalog/locations?name=&type=&parent_id=&limit=&offset=
//!     → types.rs (CatalogQuery, normalized limits)
//!     → store.rs (CatalogStore; PostgreSQL implementation)
//!     → Vec<CatalogRow> as JSON
//! ```
//!
//! # Design Decisions
//! - Read-only: the catalog is owned and populated elsewhere
//! - The pool connects lazily so the relay boots without a database

pub mod store;
pub mod types;

pub use store::{CatalogError, CatalogStore, PgCatalogStore};
pub use types::{CatalogQuery, CatalogRow};
