//! Ledger reconciliation.
//!
//! Compares each campaign's running total with the sum of its completed
//! donations. Discrepancies are reported, never repaired: admins may
//! legitimately correct a total by hand, and a failed ledger increment after
//! a recorded donation also shows up here.

use std::collections::HashMap;

use common::{CampaignId, Money};
use serde::Serialize;
use store::{CampaignStore, DonationQuery, DonationStore};

use crate::error::Result;

/// A campaign whose running total disagrees with its completed donations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub campaign: CampaignId,
    pub title: String,
    pub recorded: Money,
    pub confirmed: Money,
}

impl Discrepancy {
    /// Recorded minus confirmed. Positive when the total is ahead of the donations.
    pub fn difference(&self) -> Money {
        Money::from_poisha(self.recorded.poisha() - self.confirmed.poisha())
    }
}

#[derive(Clone)]
pub struct LedgerReconciler<S> {
    store: S,
}

impl<S> LedgerReconciler<S>
where
    S: CampaignStore + DonationStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Checks every campaign and returns the ones that disagree.
    ///
    /// Sets the `ledger_discrepancies` gauge to the number found.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<Vec<Discrepancy>> {
        let campaigns = self.store.list_campaigns(None).await?;
        let completed = self
            .store
            .query_donations(DonationQuery::new().completed())
            .await?;

        let mut confirmed: HashMap<CampaignId, Money> = HashMap::new();
        for donation in &completed {
            let sum = confirmed.entry(donation.campaign).or_default();
            *sum = *sum + donation.amount;
        }

        let discrepancies: Vec<Discrepancy> = campaigns
            .into_iter()
            .filter_map(|campaign| {
                let confirmed = confirmed.get(&campaign.id).copied().unwrap_or_default();
                (campaign.current_amount != confirmed).then(|| Discrepancy {
                    campaign: campaign.id,
                    title: campaign.title,
                    recorded: campaign.current_amount,
                    confirmed,
                })
            })
            .collect();

        for d in &discrepancies {
            tracing::warn!(
                campaign = %d.campaign,
                recorded = d.recorded.poisha(),
                confirmed = d.confirmed.poisha(),
                difference = d.difference().poisha(),
                "campaign total differs from completed donations"
            );
        }
        metrics::gauge!("ledger_discrepancies").set(discrepancies.len() as f64);
        tracing::info!(discrepancies = discrepancies.len(), "ledger reconciliation complete");

        Ok(discrepancies)
    }
}
