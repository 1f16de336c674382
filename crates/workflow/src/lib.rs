//! Donation workflow for the charity platform.
//!
//! This crate sequences one donation request end to end:
//! 1. Validate the request (amount, campaign, donor)
//! 2. Initiate and verify the payment through a [`PaymentGateway`]
//! 3. Persist the donation, completed or failed
//! 4. Increment the campaign total for completed donations
//! 5. Hand receipts and notifications to the [`NotificationDispatcher`]
//!
//! Nothing is compensated: a failed payment leaves a failed donation record
//! and no other trace.

pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod services;
pub mod state;

pub use coordinator::{DonationCoordinator, DonationRequest};
pub use dispatcher::{DEFAULT_QUEUE_CAPACITY, DispatchJob, NotificationDispatcher};
pub use error::{Result, WorkflowError};
pub use services::{
    DEFAULT_DECLINE_RATE, EmailMessage, EmailSender, LoggingEmailSender, LoggingSmsSender,
    PaymentGateway, PaymentInitiation, PaymentRequest, SimulatedPaymentGateway, SmsMessage,
    SmsSender, VerificationStatus,
};
pub use state::DonationFlowState;
