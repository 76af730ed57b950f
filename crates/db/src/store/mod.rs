//! The record store seam between handlers and persistence.
//!
//! Handlers hold an `Arc<dyn RadioStore>` so the PostgreSQL store can be
//! swapped for the in-memory one in tests and database-less local runs.

use std::sync::Arc;

use async_trait::async_trait;
use radios_core::types::DbId;

use crate::models::radio::{CreateRadio, Radio, RadioFilter, RadioLookup, RadioQuery, UpdateRadio};

mod memory;
mod postgres;

pub use memory::MemoryRadioStore;
pub use postgres::PgRadioStore;

/// Constraint name carried by stream URL collisions.
pub const STREAM_URL_CONSTRAINT: &str = "uq_radios_stream_url";

/// Shared, cheaply cloneable store handle.
pub type SharedStore = Arc<dyn RadioStore>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write hit a unique index.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation { constraint };
            }
        }
        StoreError::Database(err)
    }
}

/// Durable collection of radio records.
#[async_trait]
pub trait RadioStore: Send + Sync {
    /// Filtered, sorted, paginated listing.
    async fn find(&self, query: &RadioQuery) -> Result<Vec<Radio>, StoreError>;

    /// Number of records matching `filter`, ignoring pagination.
    async fn count(&self, filter: &RadioFilter) -> Result<i64, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Radio>, StoreError>;

    /// First record matching `lookup` whose id is not `exclude_id`.
    async fn find_one(
        &self,
        lookup: RadioLookup<'_>,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Radio>, StoreError>;

    /// Insert a record, assigning its id and timestamps.
    async fn insert(&self, input: &CreateRadio) -> Result<Radio, StoreError>;

    /// Replace all fields. `None` if `id` does not exist.
    async fn update(&self, id: DbId, input: &CreateRadio) -> Result<Option<Radio>, StoreError>;

    /// Apply the supplied fields only. `None` if `id` does not exist.
    async fn patch(&self, id: DbId, input: &UpdateRadio) -> Result<Option<Radio>, StoreError>;

    /// Remove a record, returning it. `None` if `id` does not exist.
    async fn delete(&self, id: DbId) -> Result<Option<Radio>, StoreError>;

    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
