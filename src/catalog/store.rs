//! Catalog store seam and its PostgreSQL implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::catalog::types::{CatalogQuery, CatalogRow};
use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to the location/hotel catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>, CatalogError>;
}

/// Catalog backed by the `locations` table.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Build a lazily connecting pool; no connection is opened until the first query.
    pub fn connect_lazy(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(&config.database_url)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>, CatalogError> {
        let rows = build_query(query)
            .build_query_as::<CatalogRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Parameterized SELECT for `query`; user input only ever appears as binds.
pub fn build_query(query: &CatalogQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, name, location_type, parent_id, latitude, longitude, search_enabled \
         FROM locations WHERE TRUE",
    );

    if let Some(prefix) = query.name_prefix() {
        builder
            .push(" AND name ILIKE ")
            .push_bind(format!("{}%", escape_like(prefix)));
    }
    if let Some(kind) = &query.kind {
        builder.push(" AND location_type = ").push_bind(kind.clone());
    }
    if let Some(parent_id) = query.parent_id {
        builder.push(" AND parent_id = ").push_bind(parent_id);
    }

    builder
        .push(" ORDER BY name, id LIMIT ")
        .push_bind(i64::from(query.limit()))
        .push(" OFFSET ")
        .push_bind(i64::from(query.offset()));
    builder
}

/// Escape `ILIKE` wildcards so a prefix matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
