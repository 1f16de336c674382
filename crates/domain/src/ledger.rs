//! Running totals for campaigns.

use common::{Campaign, CampaignId, Money};
use store::CampaignStore;

use crate::error::{DomainError, Result};

/// Adds confirmed contributions to a campaign's raised amount.
///
/// The increment is delegated to the store as a single atomic operation, so
/// concurrent donations against one campaign never lose updates. There is no
/// cap: a campaign may be funded beyond its target.
#[derive(Clone)]
pub struct CampaignLedger<S> {
    store: S,
}

impl<S: CampaignStore> CampaignLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds `amount` to the campaign's current amount and returns the updated campaign.
    #[tracing::instrument(skip(self), fields(campaign = %campaign, amount = amount.poisha()))]
    pub async fn increment_raised(&self, campaign: CampaignId, amount: Money) -> Result<Campaign> {
        if !amount.is_positive() {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }

        match self.store.increment_raised(campaign, amount).await {
            Ok(updated) => {
                metrics::counter!("ledger_increments_total").increment(1);
                tracing::info!(
                    current_amount = updated.current_amount.poisha(),
                    "campaign total incremented"
                );
                Ok(updated)
            }
            Err(e) => {
                metrics::counter!("ledger_increment_failures_total").increment(1);
                Err(e.into())
            }
        }
    }
}
