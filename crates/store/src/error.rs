use common::ParseEnumError;
use thiserror::Error;

/// Errors that can occur when reading or writing records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record to update does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A donation with this transaction id is already stored.
    #[error("Duplicate transaction id: {0}")]
    DuplicateTransactionId(String),

    /// A user with this email is already stored.
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    /// Adding to a campaign total would overflow.
    #[error("Amount overflow on campaign {0}")]
    AmountOverflow(String),

    /// A stored column holds a value the record type cannot represent.
    #[error("Invalid stored value: {0}")]
    Decode(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ParseEnumError> for StoreError {
    fn from(err: ParseEnumError) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
