//! Donation flow state machine.

use std::fmt;

/// The state of one donation request as it moves through the workflow.
///
/// State transitions:
/// ```text
/// Initiated ──► PaymentPending ──┬──► PaymentVerified ──► RecordedCompleted ──► NotificationsDispatched
///                                ├──► PaymentFailed ──► RecordedFailed
///                                └──► RecordedFailed   (declined at initiation)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DonationFlowState {
    /// Request accepted, inputs not yet checked against the gateway.
    #[default]
    Initiated,

    /// Waiting on the payment gateway.
    PaymentPending,

    /// The gateway confirmed the payment.
    PaymentVerified,

    /// The gateway could not confirm the payment.
    PaymentFailed,

    /// A completed donation has been persisted.
    RecordedCompleted,

    /// A failed donation has been persisted (terminal state).
    RecordedFailed,

    /// Side effects have been handed to the dispatcher (terminal state).
    NotificationsDispatched,
}

impl DonationFlowState {
    /// Returns true if `next` may follow this state.
    pub fn can_transition_to(&self, next: DonationFlowState) -> bool {
        use DonationFlowState::*;
        matches!(
            (self, next),
            (Initiated, PaymentPending)
                | (PaymentPending, PaymentVerified)
                | (PaymentPending, PaymentFailed)
                | (PaymentPending, RecordedFailed)
                | (PaymentVerified, RecordedCompleted)
                | (PaymentFailed, RecordedFailed)
                | (RecordedCompleted, NotificationsDispatched)
        )
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DonationFlowState::RecordedFailed | DonationFlowState::NotificationsDispatched
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationFlowState::Initiated => "Initiated",
            DonationFlowState::PaymentPending => "PaymentPending",
            DonationFlowState::PaymentVerified => "PaymentVerified",
            DonationFlowState::PaymentFailed => "PaymentFailed",
            DonationFlowState::RecordedCompleted => "Recorded(completed)",
            DonationFlowState::RecordedFailed => "Recorded(failed)",
            DonationFlowState::NotificationsDispatched => "NotificationsDispatched",
        }
    }
}

impl fmt::Display for DonationFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
