//! Workflow error types.

use common::{CampaignId, Donation};
use domain::DomainError;
use thiserror::Error;

use crate::state::DonationFlowState;

/// Errors that can occur while running the donation workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request is malformed; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The target campaign does not exist; nothing was written.
    #[error("Campaign not found")]
    CampaignNotFound(CampaignId),

    /// Payment was declined or could not be verified. The failed attempt
    /// has been persisted and is carried here.
    #[error("{reason}")]
    PaymentDeclined {
        donation: Box<Donation>,
        reason: String,
    },

    /// The payment gateway could not be reached.
    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    /// An email or SMS could not be delivered.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The flow attempted a step out of order.
    #[error("Invalid donation flow transition: {from} -> {to}")]
    InvalidTransition {
        from: DonationFlowState,
        to: DonationFlowState,
    },

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<store::StoreError> for WorkflowError {
    fn from(err: store::StoreError) -> Self {
        WorkflowError::Domain(err.into())
    }
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, WorkflowError>;
