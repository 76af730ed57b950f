use async_trait::async_trait;
use radios_core::types::DbId;

use super::{RadioStore, StoreError};
use crate::models::radio::{CreateRadio, Radio, RadioFilter, RadioLookup, RadioQuery, UpdateRadio};
use crate::repositories::RadioRepo;
use crate::DbPool;

/// [`RadioStore`] backed by the `radios` table.
#[derive(Clone)]
pub struct PgRadioStore {
    pool: DbPool,
}

impl PgRadioStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RadioStore for PgRadioStore {
    async fn find(&self, query: &RadioQuery) -> Result<Vec<Radio>, StoreError> {
        Ok(RadioRepo::list(&self.pool, query).await?)
    }

    async fn count(&self, filter: &RadioFilter) -> Result<i64, StoreError> {
        Ok(RadioRepo::count(&self.pool, filter).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Radio>, StoreError> {
        Ok(RadioRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_one(
        &self,
        lookup: RadioLookup<'_>,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Radio>, StoreError> {
        Ok(RadioRepo::find_one(&self.pool, lookup, exclude_id).await?)
    }

    async fn insert(&self, input: &CreateRadio) -> Result<Radio, StoreError> {
        Ok(RadioRepo::create(&self.pool, input).await?)
    }

    async fn update(&self, id: DbId, input: &CreateRadio) -> Result<Option<Radio>, StoreError> {
        Ok(RadioRepo::update(&self.pool, id, input).await?)
    }

    async fn patch(&self, id: DbId, input: &UpdateRadio) -> Result<Option<Radio>, StoreError> {
        Ok(RadioRepo::patch(&self.pool, id, input).await?)
    }

    async fn delete(&self, id: DbId) -> Result<Option<Radio>, StoreError> {
        Ok(RadioRepo::delete(&self.pool, id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
