use async_trait::async_trait;
use common::{
    Beneficiary, BeneficiaryId, Campaign, CampaignId, CampaignStatus, Donation, DonationId, Money,
    Notification, NotificationId, Role, TaskId, User, UserId, VolunteerTask,
};

use crate::{BeneficiaryQuery, DonationQuery, Result, TaskQuery};

/// Persistence for campaigns and their running totals.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign>;

    async fn get_campaign(&self, id: CampaignId) -> Result<Option<Campaign>>;

    /// Lists campaigns, newest first, optionally filtered by status.
    async fn list_campaigns(&self, status: Option<CampaignStatus>) -> Result<Vec<Campaign>>;

    /// Replaces a stored campaign. Fails with `NotFound` if it does not exist.
    async fn update_campaign(&self, campaign: Campaign) -> Result<Campaign>;

    /// Deletes a campaign, returning whether it existed.
    async fn delete_campaign(&self, id: CampaignId) -> Result<bool>;

    /// Atomically adds `amount` to the campaign's current amount.
    ///
    /// Concurrent increments against the same campaign never lose updates.
    /// Returns the campaign as stored after the increment.
    async fn increment_raised(&self, id: CampaignId, amount: Money) -> Result<Campaign>;
}

/// Persistence for donation attempts.
#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Inserts a donation.
    ///
    /// Fails with `DuplicateTransactionId` if another donation already
    /// carries the same transaction id.
    async fn insert_donation(&self, donation: Donation) -> Result<Donation>;

    async fn get_donation(&self, id: DonationId) -> Result<Option<Donation>>;

    /// Retrieves donations matching a query, newest first.
    async fn query_donations(&self, query: DonationQuery) -> Result<Vec<Donation>>;

    /// Total number of stored donation attempts.
    async fn count_donations(&self) -> Result<u64>;

    /// Sets `receipt_generated` and returns the updated donation.
    async fn mark_receipt_generated(&self, id: DonationId) -> Result<Donation>;
}

/// Persistence for in-app notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: Notification) -> Result<Notification>;

    async fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>>;

    /// Lists a user's notifications, newest first, at most `limit`.
    async fn list_notifications(&self, user: UserId, limit: usize) -> Result<Vec<Notification>>;

    async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification>;

    /// Marks every unread notification of `user` as read, returning how many changed.
    async fn mark_all_notifications_read(&self, user: UserId) -> Result<u64>;
}

/// Persistence for user profiles.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: User) -> Result<User>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Lists users, newest first, optionally filtered by role.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>>;

    async fn update_user(&self, user: User) -> Result<User>;

    async fn delete_user(&self, id: UserId) -> Result<bool>;
}

/// Persistence for volunteer tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: VolunteerTask) -> Result<VolunteerTask>;

    async fn get_task(&self, id: TaskId) -> Result<Option<VolunteerTask>>;

    async fn query_tasks(&self, query: TaskQuery) -> Result<Vec<VolunteerTask>>;

    async fn update_task(&self, task: VolunteerTask) -> Result<VolunteerTask>;
}

/// Persistence for beneficiary applications.
#[async_trait]
pub trait BeneficiaryStore: Send + Sync {
    async fn insert_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary>;

    async fn get_beneficiary(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>>;

    async fn query_beneficiaries(&self, query: BeneficiaryQuery) -> Result<Vec<Beneficiary>>;

    async fn update_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary>;
}

/// Every record store the platform needs, behind one cloneable handle.
pub trait Store:
    CampaignStore
    + DonationStore
    + NotificationStore
    + UserStore
    + TaskStore
    + BeneficiaryStore
    + Clone
    + 'static
{
}

impl<T> Store for T where
    T: CampaignStore
        + DonationStore
        + NotificationStore
        + UserStore
        + TaskStore
        + BeneficiaryStore
        + Clone
        + 'static
{
}
