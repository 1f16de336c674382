//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced record does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// The input is malformed or refers to something that cannot be used.
    #[error("{0}")]
    Validation(String),

    /// The caller's role or ownership does not permit the operation.
    #[error("{0}")]
    AccessDenied(String),

    /// The record is not in a state that allows the requested change.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: &'static str,
        action: &'static str,
    },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn access_denied() -> Self {
        DomainError::AccessDenied("Access denied".to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            StoreError::DuplicateTransactionId(txn) => {
                DomainError::Validation(format!("Duplicate transaction id: {txn}"))
            }
            StoreError::DuplicateEmail(email) => {
                DomainError::Validation(format!("User already exists with email {email}"))
            }
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
