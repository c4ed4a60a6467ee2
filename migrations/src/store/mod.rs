pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::Bson;

use crate::error::{StoreError, StoreResult};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Counts reported by a bulk update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<mongodb::results::UpdateResult> for UpdateResult {
    fn from(result: mongodb::results::UpdateResult) -> Self {
        Self { matched_count: result.matched_count, modified_count: result.modified_count }
    }
}

/// Collection names MongoDB refuses: empty, or containing `$` or NUL.
pub(crate) fn validate_collection_name(name: &str) -> StoreResult<()> {
    if name.is_empty() || name.contains('$') || name.contains('\0') {
        return Err(StoreError::InvalidCollectionName(name.to_string()));
    }
    Ok(())
}

/// Bulk field operations a migration needs from the underlying document store.
///
/// Each call is a single bulk request covering every matching document of the
/// collection. Atomicity is per document only: a failed call may leave some
/// documents updated and others not, so callers must keep their operations
/// idempotent. A collection that does not exist behaves like an empty one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Set `field` to `value` on every document of `collection` where the field is absent.
    ///
    /// Presence is an existence check: documents holding `false` or `null` are not touched.
    async fn bulk_set_if_field_absent(&self, collection: &str, field: &str, value: Bson) -> StoreResult<UpdateResult>;

    /// Remove `field` from every document of `collection`, whatever its value.
    async fn bulk_unset_field(&self, collection: &str, field: &str) -> StoreResult<UpdateResult>;
}
