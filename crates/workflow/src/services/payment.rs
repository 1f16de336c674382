//! Payment gateway trait and simulated implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::{CampaignId, Money, PaymentMethod, UserId};
use uuid::Uuid;

use crate::error::WorkflowError;

/// Probability that the simulator declines a payment.
pub const DEFAULT_DECLINE_RATE: f64 = 0.05;

const DECLINE_MESSAGE: &str = "Payment failed. Please try again.";

/// What the donor asked the gateway to charge.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: Money,
    pub method: PaymentMethod,
    pub donor: UserId,
    pub campaign: CampaignId,
}

/// Outcome of starting a payment. A decline is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInitiation {
    Accepted { transaction_id: String },
    Declined { reason: String },
}

/// Status a gateway reports for a transaction it issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Completed,
    Pending,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Completed => "completed",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for payment gateway operations.
///
/// An `Err` means the gateway itself could not be reached.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Starts a payment and, when accepted, issues a transaction id.
    async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentInitiation, WorkflowError>;

    /// Reports the final status of a transaction.
    async fn verify(&self, transaction_id: &str) -> Result<VerificationStatus, WorkflowError>;
}

#[derive(Debug, Default)]
struct SimulatorState {
    force_decline: bool,
    forced_verification: Option<VerificationStatus>,
    unreachable: bool,
    initiated: u64,
}

/// Stand-in for a real gateway: accepts most payments, declines a
/// configurable share at random and always verifies as completed unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentGateway {
    decline_rate: f64,
    state: Arc<RwLock<SimulatorState>>,
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(DEFAULT_DECLINE_RATE)
    }
}

impl SimulatedPaymentGateway {
    /// Creates a simulator that declines with probability `decline_rate`
    /// (clamped to `0.0..=1.0`).
    pub fn new(decline_rate: f64) -> Self {
        let decline_rate = if decline_rate.is_nan() {
            DEFAULT_DECLINE_RATE
        } else {
            decline_rate.clamp(0.0, 1.0)
        };
        Self {
            decline_rate,
            state: Arc::default(),
        }
    }

    /// A simulator that accepts every payment.
    pub fn always_accept() -> Self {
        Self::new(0.0)
    }

    pub fn decline_rate(&self) -> f64 {
        self.decline_rate
    }

    /// Forces every following initiation to be declined.
    pub fn set_force_decline(&self, decline: bool) {
        self.write().force_decline = decline;
    }

    /// Overrides the status `verify` reports; `None` restores `Completed`.
    pub fn set_verification_status(&self, status: Option<VerificationStatus>) {
        self.write().forced_verification = status;
    }

    /// Makes every call fail as if the gateway were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.write().unreachable = unreachable;
    }

    /// Number of initiations the simulator has seen.
    pub fn initiated_count(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .initiated
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SimulatorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_transaction_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("TXN-{}-{}", Utc::now().timestamp_millis(), &suffix[..12])
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentInitiation, WorkflowError> {
        let declined = {
            let mut state = self.write();
            if state.unreachable {
                return Err(WorkflowError::PaymentGateway(
                    "gateway unreachable".to_string(),
                ));
            }
            state.initiated += 1;
            state.force_decline || rand::random::<f64>() < self.decline_rate
        };

        tracing::debug!(
            method = %request.method,
            amount = request.amount.poisha(),
            donor = %request.donor,
            "simulated payment initiated"
        );

        if declined {
            return Ok(PaymentInitiation::Declined {
                reason: DECLINE_MESSAGE.to_string(),
            });
        }
        Ok(PaymentInitiation::Accepted {
            transaction_id: Self::new_transaction_id(),
        })
    }

    async fn verify(&self, transaction_id: &str) -> Result<VerificationStatus, WorkflowError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.unreachable {
            return Err(WorkflowError::PaymentGateway(
                "gateway unreachable".to_string(),
            ));
        }
        let status = state
            .forced_verification
            .unwrap_or(VerificationStatus::Completed);
        tracing::debug!(transaction_id, %status, "simulated payment verified");
        Ok(status)
    }
}
