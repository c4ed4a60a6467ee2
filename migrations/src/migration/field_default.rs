use async_trait::async_trait;
use mongodb::bson::Bson;
use tracing::info;

use super::Migration;
use crate::error::{MigrationError, MigrationResult};
use crate::store::{DocumentStore, UpdateResult};

/// Adds a field with a default value to every document of a collection that lacks it.
///
/// `apply` only touches documents where the field is absent, so existing values
/// (including `false` and `null`) survive. `revert` strips the field from every
/// document, including those that held it before `apply` ran: the round trip is
/// lossy and `revert(apply(s))` is not `s` in general.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaultMigration {
    id: String,
    collection: String,
    field: String,
    default_value: Bson,
}

impl FieldDefaultMigration {
    pub fn new(
        id: impl Into<String>,
        collection: impl Into<String>,
        field: impl Into<String>,
        default_value: impl Into<Bson>,
    ) -> MigrationResult<Self> {
        let field = field.into();
        validate_field_name(&field)?;
        Ok(Self { id: id.into(), collection: collection.into(), field, default_value: default_value.into() })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn default_value(&self) -> &Bson {
        &self.default_value
    }
}

/// Only top-level fields are supported, so dotted paths are refused along with operator-like names.
fn validate_field_name(field: &str) -> MigrationResult<()> {
    if field.is_empty() || field.starts_with('$') || field.contains('.') || field.contains('\0') {
        return Err(MigrationError::InvalidFieldName(field.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Migration for FieldDefaultMigration {
    fn id(&self) -> &str {
        &self.id
    }

    #[tracing::instrument(
        skip(self, store),
        fields(migration = %self.id, collection = %self.collection, field = %self.field),
        err
    )]
    async fn apply(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult> {
        let result =
            store.bulk_set_if_field_absent(&self.collection, &self.field, self.default_value.clone()).await?;
        info!(matched = result.matched_count, modified = result.modified_count, "Applied field default");
        Ok(result)
    }

    #[tracing::instrument(
        skip(self, store),
        fields(migration = %self.id, collection = %self.collection, field = %self.field),
        err
    )]
    async fn revert(&self, store: &dyn DocumentStore) -> MigrationResult<UpdateResult> {
        let result = store.bulk_unset_field(&self.collection, &self.field).await?;
        info!(matched = result.matched_count, modified = result.modified_count, "Reverted field default");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MockDocumentStore;
    use assert_matches::assert_matches;
    use rstest::{fixture, rstest};
    use tracing_test::traced_test;

    #[fixture]
    fn migration() -> FieldDefaultMigration {
        FieldDefaultMigration::new("add-is-active", "songs", "is_active", true).unwrap()
    }

    #[rstest]
    #[case("")]
    #[case("$set")]
    #[case("meta.is_active")]
    #[case("is\0active")]
    fn invalid_field_names_are_rejected(#[case] field: &str) {
        assert_matches!(
            FieldDefaultMigration::new("m", "songs", field, true),
            Err(MigrationError::InvalidFieldName(f)) if f == field
        );
    }

    #[rstest]
    fn accessors_expose_construction_values(migration: FieldDefaultMigration) {
        assert_eq!(migration.id(), "add-is-active");
        assert_eq!(migration.collection(), "songs");
        assert_eq!(migration.field(), "is_active");
        assert_eq!(migration.default_value(), &Bson::Boolean(true));
    }

    #[rstest]
    #[traced_test]
    #[tokio::test]
    async fn apply_issues_a_single_conditional_set(migration: FieldDefaultMigration) {
        let mut store = MockDocumentStore::new();
        store
            .expect_bulk_set_if_field_absent()
            .withf(|collection, field, value| {
                collection == "songs" && field == "is_active" && *value == Bson::Boolean(true)
            })
            .times(1)
            .returning(|_, _, _| Ok(UpdateResult { matched_count: 4, modified_count: 4 }));
        store.expect_bulk_unset_field().never();

        let result = migration.apply(&store).await.unwrap();

        assert_eq!(result, UpdateResult { matched_count: 4, modified_count: 4 });
        assert!(logs_contain("Applied field default"));
    }

    #[rstest]
    #[traced_test]
    #[tokio::test]
    async fn revert_issues_a_single_unconditional_unset(migration: FieldDefaultMigration) {
        let mut store = MockDocumentStore::new();
        store
            .expect_bulk_unset_field()
            .withf(|collection, field| collection == "songs" && field == "is_active")
            .times(1)
            .returning(|_, _| Ok(UpdateResult { matched_count: 7, modified_count: 3 }));
        store.expect_bulk_set_if_field_absent().never();

        let result = migration.revert(&store).await.unwrap();

        assert_eq!(result, UpdateResult { matched_count: 7, modified_count: 3 });
        assert!(logs_contain("Reverted field default"));
    }

    #[rstest]
    #[tokio::test]
    async fn store_errors_propagate_unchanged(migration: FieldDefaultMigration) {
        let mut store = MockDocumentStore::new();
        store
            .expect_bulk_set_if_field_absent()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Unavailable("connection reset".to_string())));
        store
            .expect_bulk_unset_field()
            .times(1)
            .returning(|collection, _| Err(StoreError::InvalidCollectionName(collection.to_string())));

        assert_matches!(
            migration.apply(&store).await,
            Err(MigrationError::Store(StoreError::Unavailable(reason))) if reason == "connection reset"
        );
        assert_matches!(
            migration.revert(&store).await,
            Err(MigrationError::Store(StoreError::InvalidCollectionName(name))) if name == "songs"
        );
    }
}
