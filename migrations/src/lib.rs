//! Reversible field-default migrations for MongoDB collections.
//!
//! A [`FieldDefaultMigration`] adds a field with a default value to every
//! document of a collection that does not have it yet, and removes the field
//! from every document when reverted. Both directions are single bulk updates
//! and both are idempotent, so a framework may safely re-run them after a
//! partial failure.
//!
//! The store is reached through the [`DocumentStore`] trait. [`MongoStore`]
//! talks to a real database, [`InMemoryStore`] mirrors its selection rules in
//! process for tests.

pub mod config;
pub mod error;
pub mod migration;
pub mod store;

pub use config::MongoConfig;
pub use error::{MigrationError, MigrationResult, StoreError, StoreResult};
pub use migration::{AddIsActiveField, FieldDefaultMigration, Migration};
pub use store::{DocumentStore, InMemoryStore, MongoStore, UpdateResult};
