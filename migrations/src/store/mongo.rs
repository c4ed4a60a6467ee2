use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::debug;

use super::{validate_collection_name, DocumentStore, UpdateResult};
use crate::config::MongoConfig;
use crate::error::StoreResult;

/// [`DocumentStore`] backed by a MongoDB database.
#[derive(Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Wrap an already configured database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Build a client from `config`, check the server answers a ping and select the database.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.connection_url).await?;
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout = Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        client.database("admin").run_command(doc! { "ping": 1 }, None).await?;
        debug!(database = %config.database_name, "Connected to MongoDB");

        Ok(Self::new(client.database(&config.database_name)))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> StoreResult<Collection<Document>> {
        validate_collection_name(name)?;
        Ok(self.database.collection(name))
    }
}

/// Filter selecting documents that do not carry `field` at all.
pub(crate) fn field_absent_filter(field: &str) -> Document {
    doc! { field: { "$exists": false } }
}

pub(crate) fn set_field_update(field: &str, value: Bson) -> Document {
    doc! { "$set": { field: value } }
}

pub(crate) fn unset_field_update(field: &str) -> Document {
    doc! { "$unset": { field: "" } }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn bulk_set_if_field_absent(&self, collection: &str, field: &str, value: Bson) -> StoreResult<UpdateResult> {
        let result: UpdateResult = self
            .collection(collection)?
            .update_many(field_absent_filter(field), set_field_update(field, value), None)
            .await?
            .into();
        debug!(
            collection,
            field,
            matched = result.matched_count,
            modified = result.modified_count,
            "Set field where absent"
        );
        Ok(result)
    }

    async fn bulk_unset_field(&self, collection: &str, field: &str) -> StoreResult<UpdateResult> {
        let result: UpdateResult =
            self.collection(collection)?.update_many(doc! {}, unset_field_update(field), None).await?.into();
        debug!(collection, field, matched = result.matched_count, modified = result.modified_count, "Unset field");
        Ok(result)
    }
}
