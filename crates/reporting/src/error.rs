//! Reporting error types.

use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur while building reports, documents or summaries.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An access check or lookup failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The summary e-mail could not be handed to the sender.
    #[error("Report delivery failed: {0}")]
    Delivery(String),
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        ReportError::Domain(err.into())
    }
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;
