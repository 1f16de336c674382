//! SMS sender trait and logging implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::WorkflowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

/// Trait for sending text messages. One attempt per call; no retries.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: SmsMessage) -> Result<(), WorkflowError>;
}

#[derive(Debug, Default)]
struct SmsState {
    sent: Vec<SmsMessage>,
    fail: bool,
}

/// Logs text messages instead of delivering them.
///
/// An optional sender signature is appended to every body.
#[derive(Debug, Clone, Default)]
pub struct LoggingSmsSender {
    state: Arc<RwLock<SmsState>>,
    signature: Option<Arc<str>>,
}

impl LoggingSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signature(signature: impl Into<Arc<str>>) -> Self {
        Self {
            signature: Some(signature.into()),
            ..Self::default()
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail = fail;
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
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
impl SmsSender for LoggingSmsSender {
    async fn send(&self, mut message: SmsMessage) -> Result<(), WorkflowError> {
        if let Some(signature) = &self.signature {
            message.body = format!("{} {signature}", message.body);
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(WorkflowError::Delivery(format!(
                "sms to {} rejected",
                message.to
            )));
        }
        tracing::info!(to = %message.to, "sms sent");
        state.sent.push(message);
        Ok(())
    }
}
