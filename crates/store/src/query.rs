use chrono::{DateTime, Utc};
use common::{BeneficiaryStatus, CampaignId, DonationStatus, PaymentMethod, UserId};

/// Builder for donation queries.
///
/// Results are always ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct DonationQuery {
    /// Filter by donor.
    pub donor: Option<UserId>,

    /// Filter by campaign.
    pub campaign: Option<CampaignId>,

    /// Filter by status.
    pub status: Option<DonationStatus>,

    /// Filter by payment method.
    pub payment_method: Option<PaymentMethod>,

    /// Only donations created at or after this instant.
    pub since: Option<DateTime<Utc>>,

    /// Maximum number of donations to return.
    pub limit: Option<usize>,
}

impl DonationQuery {
    /// Creates a query matching every donation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for one donor's donations.
    pub fn for_donor(donor: UserId) -> Self {
        Self {
            donor: Some(donor),
            ..Default::default()
        }
    }

    pub fn donor(mut self, donor: UserId) -> Self {
        self.donor = Some(donor);
        self
    }

    pub fn campaign(mut self, campaign: CampaignId) -> Self {
        self.campaign = Some(campaign);
        self
    }

    pub fn status(mut self, status: DonationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Shorthand for `status(DonationStatus::Completed)`.
    pub fn completed(self) -> Self {
        self.status(DonationStatus::Completed)
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Builder for volunteer task queries. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub volunteer: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_volunteer(volunteer: UserId) -> Self {
        Self {
            volunteer: Some(volunteer),
            ..Default::default()
        }
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }
}

/// Builder for beneficiary application queries. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct BeneficiaryQuery {
    pub status: Option<BeneficiaryStatus>,
    pub since: Option<DateTime<Utc>>,
}

impl BeneficiaryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: BeneficiaryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }
}
