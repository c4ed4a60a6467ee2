use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

pub type MigrationResult<T> = Result<T, MigrationError>;

/// Failure of a bulk operation against the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Invalid collection name: {0:?}")]
    InvalidCollectionName(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum MigrationError {
    /// The store error is carried as-is; callers decide whether to mark the migration as failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),
}
