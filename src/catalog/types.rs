//! Catalog query and row types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 500;

/// Filters for a catalog lookup. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
    /// Type tag, e.g. `city` or `hotel`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent_id: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CatalogQuery {
    /// Page size clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Non-empty name prefix, if any.
    pub fn name_prefix(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "location_type")]
    pub kind: String,
    pub parent_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub search_enabled: bool,
}
