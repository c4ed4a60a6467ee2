use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use super::{validate_collection_name, DocumentStore, UpdateResult};
use crate::error::{StoreError, StoreResult};

/// Process-local [`DocumentStore`] following the same selection rules as MongoDB.
///
/// Meant for tests and dry runs. [`InMemoryStore::set_unavailable`] makes every
/// subsequent bulk call fail, which is how callers exercise their error paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `documents` to `collection`, creating it if needed.
    pub fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = Document>) -> StoreResult<()> {
        validate_collection_name(collection)?;
        self.write()?.entry(collection.to_string()).or_default().extend(documents);
        Ok(())
    }

    /// Snapshot of the documents in `collection`, in insertion order. Empty if the collection is missing.
    pub fn documents(&self, collection: &str) -> StoreResult<Vec<Document>> {
        Ok(self.read()?.get(collection).cloned().unwrap_or_default())
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is switched off".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections.read().map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections.write().map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn bulk_set_if_field_absent(&self, collection: &str, field: &str, value: Bson) -> StoreResult<UpdateResult> {
        self.ensure_available()?;
        validate_collection_name(collection)?;
        let mut collections = self.write()?;
        let mut result = UpdateResult::default();
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(result);
        };

        for document in documents.iter_mut().filter(|document| !document.contains_key(field)) {
            document.insert(field, value.clone());
            result.matched_count += 1;
            result.modified_count += 1;
        }
        Ok(result)
    }

    async fn bulk_unset_field(&self, collection: &str, field: &str) -> StoreResult<UpdateResult> {
        self.ensure_available()?;
        validate_collection_name(collection)?;
        let mut collections = self.write()?;
        let mut result = UpdateResult::default();
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(result);
        };

        // The empty filter matches everything; only documents that held the field change.
        for document in documents.iter_mut() {
            result.matched_count += 1;
            if document.remove(field).is_some() {
                result.modified_count += 1;
            }
        }
        Ok(result)
    }
}
