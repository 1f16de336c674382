//! Email sender trait and logging implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::WorkflowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for sending email. One attempt per call; no retries.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), WorkflowError>;
}

#[derive(Debug, Default)]
struct OutboxState {
    sent: Vec<EmailMessage>,
    fail: bool,
}

/// Writes emails to the log instead of delivering them, keeping a copy of
/// each for inspection.
#[derive(Debug, Clone, Default)]
pub struct LoggingEmailSender {
    state: Arc<RwLock<OutboxState>>,
}

impl LoggingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sender to fail every following send.
    pub fn set_fail(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail = fail;
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .len()
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), WorkflowError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(WorkflowError::Delivery(format!(
                "email to {} rejected",
                message.to
            )));
        }
        tracing::info!(to = %message.to, subject = %message.subject, "email sent");
        state.sent.push(message);
        Ok(())
    }
}
