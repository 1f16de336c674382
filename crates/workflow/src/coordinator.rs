//! Donation workflow orchestrator.

use std::time::Instant;

use common::{
    CampaignId, Donation, DonationStatus, Money, PaymentDetails, PaymentMethod, UserId,
};
use domain::{CampaignLedger, DonationRecorder, RecordDonation};
use serde::Deserialize;
use store::Store;
use uuid::Uuid;

use crate::dispatcher::{DispatchJob, NotificationDispatcher};
use crate::error::{Result, WorkflowError};
use crate::services::{PaymentGateway, PaymentInitiation, PaymentRequest, VerificationStatus};
use crate::state::DonationFlowState;

/// A donor's request to give to a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    #[serde(rename = "campaignId")]
    pub campaign: CampaignId,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_details: Option<PaymentDetails>,
}

/// Tracks one request through [`DonationFlowState`], refusing out-of-order steps.
struct DonationFlow {
    state: DonationFlowState,
}

impl DonationFlow {
    fn new() -> Self {
        Self {
            state: DonationFlowState::default(),
        }
    }

    fn advance(&mut self, next: DonationFlowState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::info!(from = %self.state, to = %next, "donation flow transition");
        self.state = next;
        Ok(())
    }
}

fn failed_transaction_id() -> String {
    format!("FAILED-{}", Uuid::new_v4().simple())
}

/// Sequences payment, persistence, ledger update and notification for one
/// donation request.
///
/// No step is retried and nothing is compensated. Declined or unverified
/// payments are persisted as failed donations; completed ones increment the
/// campaign total and are handed to the [`NotificationDispatcher`].
pub struct DonationCoordinator<S, P>
where
    S: Store,
    P: PaymentGateway,
{
    store: S,
    recorder: DonationRecorder<S>,
    ledger: CampaignLedger<S>,
    gateway: P,
    dispatcher: NotificationDispatcher,
}

impl<S, P> DonationCoordinator<S, P>
where
    S: Store,
    P: PaymentGateway,
{
    pub fn new(store: S, gateway: P, dispatcher: NotificationDispatcher) -> Self {
        Self {
            recorder: DonationRecorder::new(store.clone()),
            ledger: CampaignLedger::new(store.clone()),
            store,
            gateway,
            dispatcher,
        }
    }

    pub fn gateway(&self) -> &P {
        &self.gateway
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Runs the donation workflow for `donor`.
    ///
    /// Returns the completed donation, or:
    /// - `Validation` when the amount is not positive, exceeds
    ///   [`Money::MAX_AMOUNT`], or the donor is unknown
    /// - `CampaignNotFound` when the campaign does not exist
    /// - `PaymentDeclined` carrying the persisted failed donation
    #[tracing::instrument(
        skip(self, request),
        fields(campaign = %request.campaign, amount = request.amount.poisha(), method = %request.payment_method)
    )]
    pub async fn donate(&self, donor: UserId, request: DonationRequest) -> Result<Donation> {
        let started = Instant::now();
        let result = self.run(donor, request).await;

        let status = match &result {
            Ok(_) => "completed",
            Err(WorkflowError::PaymentDeclined { .. }) => "failed",
            Err(_) => "rejected",
        };
        metrics::counter!("donations_total", "status" => status).increment(1);
        metrics::histogram!("donation_duration_seconds").record(started.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, donor_id: UserId, request: DonationRequest) -> Result<Donation> {
        let mut flow = DonationFlow::new();

        // Initiated: nothing is written until the inputs check out.
        if !request.amount.is_positive() {
            return Err(WorkflowError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }
        if request.amount.exceeds_max() {
            return Err(WorkflowError::Validation(format!(
                "Amount must not exceed {}",
                Money::MAX_AMOUNT
            )));
        }
        let campaign = self
            .store
            .get_campaign(request.campaign)
            .await?
            .ok_or(WorkflowError::CampaignNotFound(request.campaign))?;
        let donor = self
            .store
            .get_user(donor_id)
            .await?
            .ok_or_else(|| WorkflowError::Validation("Donor does not exist".to_string()))?;

        flow.advance(DonationFlowState::PaymentPending)?;
        let payment = PaymentRequest {
            amount: request.amount,
            method: request.payment_method,
            donor: donor.id,
            campaign: campaign.id,
        };
        let initiation = match self.gateway.initiate(&payment).await {
            Ok(initiation) => initiation,
            Err(e) => {
                tracing::warn!(error = %e, "payment initiation failed");
                PaymentInitiation::Declined {
                    reason: "Payment gateway unavailable. Please try again.".to_string(),
                }
            }
        };

        let transaction_id = match initiation {
            PaymentInitiation::Accepted { transaction_id } => transaction_id,
            PaymentInitiation::Declined { reason } => {
                tracing::warn!(%reason, "payment declined");
                flow.advance(DonationFlowState::RecordedFailed)?;
                return Err(self
                    .record_failure(&request, donor_id, failed_transaction_id(), reason)
                    .await);
            }
        };

        let verification = match self.gateway.verify(&transaction_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, %transaction_id, "payment verification failed");
                VerificationStatus::Failed
            }
        };
        if verification != VerificationStatus::Completed {
            tracing::warn!(%transaction_id, %verification, "payment not verified");
            flow.advance(DonationFlowState::PaymentFailed)?;
            flow.advance(DonationFlowState::RecordedFailed)?;
            return Err(self
                .record_failure(
                    &request,
                    donor_id,
                    transaction_id,
                    format!("Payment could not be verified ({verification})"),
                )
                .await);
        }
        flow.advance(DonationFlowState::PaymentVerified)?;

        let donation = self
            .recorder
            .record(RecordDonation {
                donor: donor_id,
                campaign: campaign.id,
                amount: request.amount,
                payment_method: request.payment_method,
                transaction_id,
                status: DonationStatus::Completed,
                payment_details: request.payment_details,
            })
            .await?;
        flow.advance(DonationFlowState::RecordedCompleted)?;

        // The donation stands even if the total cannot be updated; the
        // reconciliation job reports the gap.
        if let Err(e) = self.ledger.increment_raised(campaign.id, donation.amount).await {
            tracing::error!(
                error = %e,
                donation = %donation.id,
                campaign = %campaign.id,
                "ledger increment failed after donation was recorded"
            );
        }

        self.dispatcher.enqueue(DispatchJob {
            donation: donation.clone(),
            donor,
            campaign_title: campaign.title,
        });
        flow.advance(DonationFlowState::NotificationsDispatched)?;

        tracing::info!(
            donation = %donation.id,
            transaction_id = %donation.transaction_id,
            "donation completed"
        );
        Ok(donation)
    }

    /// Persists a failed attempt and builds the error returned to the donor.
    async fn record_failure(
        &self,
        request: &DonationRequest,
        donor: UserId,
        transaction_id: String,
        reason: String,
    ) -> WorkflowError {
        let recorded = self
            .recorder
            .record(RecordDonation {
                donor,
                campaign: request.campaign,
                amount: request.amount,
                payment_method: request.payment_method,
                transaction_id,
                status: DonationStatus::Failed,
                payment_details: request.payment_details.clone(),
            })
            .await;

        match recorded {
            Ok(donation) => WorkflowError::PaymentDeclined {
                donation: Box::new(donation),
                reason,
            },
            Err(e) => e.into(),
        }
    }
}
