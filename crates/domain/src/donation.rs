//! Persistence of donation attempts.

use common::{
    CampaignId, Donation, DonationId, DonationStatus, Money, PaymentDetails, PaymentMethod, Role,
    UserId, timestamp_now,
};
use store::{CampaignStore, DonationQuery, DonationStore, UserStore};

use crate::caller::Caller;
use crate::error::{DomainError, Result};

/// A donation attempt ready to be persisted.
#[derive(Debug, Clone)]
pub struct RecordDonation {
    pub donor: UserId,
    pub campaign: CampaignId,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub status: DonationStatus,
    pub payment_details: Option<PaymentDetails>,
}

/// Records donation attempts, failed ones included, and serves them back
/// under the ownership rules: donors see their own, everyone else sees all.
#[derive(Clone)]
pub struct DonationRecorder<S> {
    store: S,
}

impl<S> DonationRecorder<S>
where
    S: DonationStore + CampaignStore + UserStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a donation attempt.
    ///
    /// Payment details are masked before they reach the store. A duplicate
    /// transaction id or a donor/campaign that does not resolve is a
    /// validation failure.
    #[tracing::instrument(
        skip(self, input),
        fields(donor = %input.donor, campaign = %input.campaign, status = %input.status)
    )]
    pub async fn record(&self, input: RecordDonation) -> Result<Donation> {
        if !input.amount.is_positive() {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }
        if input.amount.exceeds_max() {
            return Err(DomainError::validation(format!(
                "Amount must not exceed {}",
                Money::MAX_AMOUNT
            )));
        }
        if input.transaction_id.trim().is_empty() {
            return Err(DomainError::validation("Transaction id is required"));
        }
        if !input.status.is_terminal() {
            return Err(DomainError::validation(
                "A donation is recorded as completed or failed",
            ));
        }
        if self.store.get_user(input.donor).await?.is_none() {
            return Err(DomainError::validation("Donor does not exist"));
        }
        if self.store.get_campaign(input.campaign).await?.is_none() {
            return Err(DomainError::validation("Campaign does not exist"));
        }

        let now = timestamp_now();
        let donation = Donation {
            id: DonationId::new(),
            donor: input.donor,
            campaign: input.campaign,
            amount: input.amount,
            payment_method: input.payment_method,
            transaction_id: input.transaction_id,
            status: input.status,
            payment_details: input
                .payment_details
                .map(|details| details.masked())
                .filter(|details| !details.is_empty()),
            receipt_generated: false,
            created_at: now,
            updated_at: now,
        };

        let donation = self.store.insert_donation(donation).await?;
        tracing::info!(
            donation = %donation.id,
            transaction_id = %donation.transaction_id,
            "donation recorded"
        );
        Ok(donation)
    }

    /// Loads one donation, enforcing donor ownership.
    #[tracing::instrument(skip(self))]
    pub async fn get_for(&self, caller: &Caller, id: DonationId) -> Result<Donation> {
        let donation = self
            .store
            .get_donation(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Donation", id))?;
        caller.ensure_owner_if(Role::Donor, donation.donor)?;
        Ok(donation)
    }

    /// Lists donations visible to the caller, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_for(&self, caller: &Caller) -> Result<Vec<Donation>> {
        let query = match caller.own_records_if(Role::Donor) {
            Some(donor) => DonationQuery::for_donor(donor),
            None => DonationQuery::new(),
        };
        Ok(self.store.query_donations(query).await?)
    }

    /// Total number of recorded attempts.
    pub async fn count(&self) -> Result<u64> {
        Ok(self.store.count_donations().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_receipt_generated(&self, id: DonationId) -> Result<Donation> {
        Ok(self.store.mark_receipt_generated(id).await?)
    }

    /// Checks that the caller may have a receipt for this donation and
    /// flags it as issued. Only completed donations have receipts.
    #[tracing::instrument(skip(self))]
    pub async fn issue_receipt(&self, caller: &Caller, id: DonationId) -> Result<Donation> {
        let donation = self.get_for(caller, id).await?;
        if !donation.is_completed() {
            return Err(DomainError::validation(
                "Receipts are only available for completed donations",
            ));
        }
        self.mark_receipt_generated(id).await
    }
}
