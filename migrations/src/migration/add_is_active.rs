use async_trait::async_trait;

use super::{FieldDefaultMigration, Migration};
use crate::error::MigrationResult;
use crate::store::{DocumentStore, UpdateResult};

pub const SONGS_COLLECTION: &str = "songs";

pub const IS_ACTIVE_FIELD: &str = "is_active";

const MIGRATION_ID: &str = "20250329083212-add_is_active_field";

/// Marks every song as active unless it already states otherwise.
#[derive(Debug, Clone)]
pub struct AddIsActiveField {
    inner: FieldDefaultMigration,
}

impl AddIsActiveField {
    pub fn new() -> MigrationResult<Self> {
        Ok(Self { inner: FieldDefaultMigration::new(MIGRATION_ID, SONGS_COLLECTION, IS_ACTIVE_FIELD, true)? })
    }
}

#[async_trait]
impl Migration for AddIsActiveField {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn apply(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult> {
        self.inner.apply(store).await
    }

    async fn revert(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult> {
        self.inner.revert(store).await
    }
}
