//! External service traits and simulated implementations used by the workflow.

pub mod email;
pub mod payment;
pub mod sms;

pub use email::{EmailMessage, EmailSender, LoggingEmailSender};
pub use payment::{
    DEFAULT_DECLINE_RATE, PaymentGateway, PaymentInitiation, PaymentRequest,
    SimulatedPaymentGateway, VerificationStatus,
};
pub use sms::{LoggingSmsSender, SmsMessage, SmsSender};
