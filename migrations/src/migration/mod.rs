mod add_is_active;
mod field_default;

use async_trait::async_trait;

use crate::error::MigrationResult;
use crate::store::{DocumentStore, UpdateResult};

pub use add_is_active::{AddIsActiveField, IS_ACTIVE_FIELD, SONGS_COLLECTION};
pub use field_default::FieldDefaultMigration;

/// A forward/backward pair invoked by a migration framework.
///
/// Both directions must be safe to run more than once: the framework may retry
/// after a partially applied bulk update.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Stable identifier the framework records once the migration is applied.
    fn id(&self) -> &str;

    async fn apply(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult>;

    async fn revert(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult>;
}
