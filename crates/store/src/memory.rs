use std::sync::Arc;

use async_trait::async_trait;
use common::{
    Beneficiary, BeneficiaryId, Campaign, CampaignId, CampaignStatus, Donation, DonationId, Money,
    Notification, NotificationId, Role, TaskId, User, UserId, VolunteerTask, timestamp_now,
};
use tokio::sync::RwLock;

use crate::{
    BeneficiaryQuery, DonationQuery, Result, StoreError, TaskQuery,
    store::{
        BeneficiaryStore, CampaignStore, DonationStore, NotificationStore, TaskStore, UserStore,
    },
};

/// In-memory store for tests and local runs.
///
/// Records are kept in insertion order, so "newest first" is a reverse scan.
/// Every operation that must be atomic (transaction-id uniqueness, campaign
/// increments) happens under a single write lock.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    campaigns: Arc<RwLock<Vec<Campaign>>>,
    donations: Arc<RwLock<Vec<Donation>>>,
    notifications: Arc<RwLock<Vec<Notification>>>,
    users: Arc<RwLock<Vec<User>>>,
    tasks: Arc<RwLock<Vec<VolunteerTask>>>,
    beneficiaries: Arc<RwLock<Vec<Beneficiary>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored notifications.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    /// Clears every collection.
    pub async fn clear(&self) {
        self.campaigns.write().await.clear();
        self.donations.write().await.clear();
        self.notifications.write().await.clear();
        self.users.write().await.clear();
        self.tasks.write().await.clear();
        self.beneficiaries.write().await.clear();
    }
}

fn replace<T, F>(records: &mut [T], matches: F, record: T) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let slot = records.iter_mut().find(|r| matches(r))?;
    *slot = record.clone();
    Some(record)
}

#[async_trait]
impl CampaignStore for InMemoryStore {
    async fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign> {
        self.campaigns.write().await.push(campaign.clone());
        Ok(campaign)
    }

    async fn get_campaign(&self, id: CampaignId) -> Result<Option<Campaign>> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn list_campaigns(&self, status: Option<CampaignStatus>) -> Result<Vec<Campaign>> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns
            .iter()
            .rev()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect())
    }

    async fn update_campaign(&self, campaign: Campaign) -> Result<Campaign> {
        let id = campaign.id;
        let mut campaigns = self.campaigns.write().await;
        replace(&mut campaigns, |c| c.id == id, campaign)
            .ok_or_else(|| StoreError::not_found("Campaign", id))
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<bool> {
        let mut campaigns = self.campaigns.write().await;
        let before = campaigns.len();
        campaigns.retain(|c| c.id != id);
        Ok(campaigns.len() != before)
    }

    async fn increment_raised(&self, id: CampaignId, amount: Money) -> Result<Campaign> {
        let mut campaigns = self.campaigns.write().await;
        let campaign = campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Campaign", id))?;

        campaign.current_amount = campaign
            .current_amount
            .checked_add(amount)
            .ok_or_else(|| StoreError::AmountOverflow(id.to_string()))?;
        campaign.updated_at = timestamp_now();
        Ok(campaign.clone())
    }
}

#[async_trait]
impl DonationStore for InMemoryStore {
    async fn insert_donation(&self, donation: Donation) -> Result<Donation> {
        let mut donations = self.donations.write().await;

        // Unique constraint simulation
        if donations
            .iter()
            .any(|d| d.transaction_id == donation.transaction_id)
        {
            return Err(StoreError::DuplicateTransactionId(
                donation.transaction_id.clone(),
            ));
        }

        donations.push(donation.clone());
        Ok(donation)
    }

    async fn get_donation(&self, id: DonationId) -> Result<Option<Donation>> {
        let donations = self.donations.read().await;
        Ok(donations.iter().find(|d| d.id == id).cloned())
    }

    async fn query_donations(&self, query: DonationQuery) -> Result<Vec<Donation>> {
        let donations = self.donations.read().await;
        let matching = donations.iter().rev().filter(|d| {
            query.donor.is_none_or(|donor| d.donor == donor)
                && query.campaign.is_none_or(|campaign| d.campaign == campaign)
                && query.status.is_none_or(|status| d.status == status)
                && query
                    .payment_method
                    .is_none_or(|method| d.payment_method == method)
                && query.since.is_none_or(|since| d.created_at >= since)
        });

        Ok(match query.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn count_donations(&self) -> Result<u64> {
        Ok(self.donations.read().await.len() as u64)
    }

    async fn mark_receipt_generated(&self, id: DonationId) -> Result<Donation> {
        let mut donations = self.donations.write().await;
        let donation = donations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("Donation", id))?;
        donation.receipt_generated = true;
        donation.updated_at = timestamp_now();
        Ok(donation.clone())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert_notification(&self, notification: Notification) -> Result<Notification> {
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_notifications(&self, user: UserId, limit: usize) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.user == user)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::not_found("Notification", id))?;
        notification.is_read = true;
        notification.updated_at = timestamp_now();
        Ok(notification.clone())
    }

    async fn mark_all_notifications_read(&self, user: UserId) -> Result<u64> {
        let mut notifications = self.notifications.write().await;
        let now = timestamp_now();
        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user == user && !n.is_read)
        {
            notification.is_read = true;
            notification.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .rev()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let id = user.id;
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        replace(&mut users, |u| u.id == id, user).ok_or_else(|| StoreError::not_found("User", id))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn insert_task(&self, task: VolunteerTask) -> Result<VolunteerTask> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<VolunteerTask>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn query_tasks(&self, query: TaskQuery) -> Result<Vec<VolunteerTask>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .rev()
            .filter(|t| {
                query.volunteer.is_none_or(|v| t.volunteer == v)
                    && query.since.is_none_or(|since| t.created_at >= since)
            })
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: VolunteerTask) -> Result<VolunteerTask> {
        let id = task.id;
        let mut tasks = self.tasks.write().await;
        replace(&mut tasks, |t| t.id == id, task)
            .ok_or_else(|| StoreError::not_found("VolunteerTask", id))
    }
}

#[async_trait]
impl BeneficiaryStore for InMemoryStore {
    async fn insert_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary> {
        self.beneficiaries.write().await.push(beneficiary.clone());
        Ok(beneficiary)
    }

    async fn get_beneficiary(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>> {
        let beneficiaries = self.beneficiaries.read().await;
        Ok(beneficiaries.iter().find(|b| b.id == id).cloned())
    }

    async fn query_beneficiaries(&self, query: BeneficiaryQuery) -> Result<Vec<Beneficiary>> {
        let beneficiaries = self.beneficiaries.read().await;
        Ok(beneficiaries
            .iter()
            .rev()
            .filter(|b| {
                query.status.is_none_or(|s| b.status == s)
                    && query.since.is_none_or(|since| b.created_at >= since)
            })
            .cloned()
            .collect())
    }

    async fn update_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary> {
        let id = beneficiary.id;
        let mut beneficiaries = self.beneficiaries.write().await;
        replace(&mut beneficiaries, |b| b.id == id, beneficiary)
            .ok_or_else(|| StoreError::not_found("Beneficiary", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        CampaignCategory, DonationStatus, NotificationChannel, PaymentMethod, timestamp_now,
    };

    fn campaign(target: i64) -> Campaign {
        let now = timestamp_now();
        Campaign {
            id: CampaignId::new(),
            title: "Winter clothes".to_string(),
            description: "Blankets for the north".to_string(),
            category: CampaignCategory::Sadaqah,
            target_amount: Money::from_taka(target),
            current_amount: Money::zero(),
            start_date: now,
            end_date: now,
            status: CampaignStatus::Active,
            image: None,
            created_by: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn donation(donor: UserId, campaign: CampaignId, txn: &str) -> Donation {
        let now = timestamp_now();
        Donation {
            id: DonationId::new(),
            donor,
            campaign,
            amount: Money::from_taka(100),
            payment_method: PaymentMethod::BKash,
            transaction_id: txn.to_string(),
            status: DonationStatus::Completed,
            payment_details: None,
            receipt_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn notification(user: UserId) -> Notification {
        let now = timestamp_now();
        Notification {
            id: NotificationId::new(),
            user,
            channel: NotificationChannel::System,
            title: "Hello".to_string(),
            message: "World".to_string(),
            is_read: false,
            related_entity: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn increment_raised_adds_amount() {
        let store = InMemoryStore::new();
        let c = store.insert_campaign(campaign(1000)).await.unwrap();

        store
            .increment_raised(c.id, Money::from_taka(600))
            .await
            .unwrap();
        let updated = store
            .increment_raised(c.id, Money::from_taka(500))
            .await
            .unwrap();

        assert_eq!(updated.current_amount, Money::from_taka(1100));
        let stored = store.get_campaign(c.id).await.unwrap().unwrap();
        assert_eq!(stored.current_amount, Money::from_taka(1100));
    }

    #[tokio::test]
    async fn increment_raised_missing_campaign() {
        let store = InMemoryStore::new();
        let result = store
            .increment_raised(CampaignId::new(), Money::from_taka(1))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = InMemoryStore::new();
        let c = store.insert_campaign(campaign(1000)).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .increment_raised(c.id, Money::from_taka(10))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get_campaign(c.id).await.unwrap().unwrap();
        assert_eq!(stored.current_amount, Money::from_taka(500));
    }

    #[tokio::test]
    async fn duplicate_transaction_id_rejected() {
        let store = InMemoryStore::new();
        let donor = UserId::new();
        let campaign = CampaignId::new();

        store
            .insert_donation(donation(donor, campaign, "TXN-1"))
            .await
            .unwrap();
        let result = store
            .insert_donation(donation(donor, campaign, "TXN-1"))
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateTransactionId(id)) if id == "TXN-1"));
        assert_eq!(store.count_donations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn query_donations_filters_newest_first() {
        let store = InMemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let campaign = CampaignId::new();

        let first = store
            .insert_donation(donation(alice, campaign, "TXN-1"))
            .await
            .unwrap();
        store
            .insert_donation(donation(bob, campaign, "TXN-2"))
            .await
            .unwrap();
        let mut failed = donation(alice, campaign, "FAILED-1");
        failed.status = DonationStatus::Failed;
        let third = store.insert_donation(failed).await.unwrap();

        let alices = store
            .query_donations(DonationQuery::for_donor(alice))
            .await
            .unwrap();
        assert_eq!(
            alices.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![third.id, first.id]
        );

        let completed = store
            .query_donations(DonationQuery::new().completed())
            .await
            .unwrap();
        assert_eq!(completed.len(), 2);

        let limited = store
            .query_donations(DonationQuery::new().limit(1))
            .await
            .unwrap();
        assert_eq!(limited[0].id, third.id);
    }

    #[tokio::test]
    async fn mark_receipt_generated_flips_flag() {
        let store = InMemoryStore::new();
        let d = store
            .insert_donation(donation(UserId::new(), CampaignId::new(), "TXN-9"))
            .await
            .unwrap();

        let updated = store.mark_receipt_generated(d.id).await.unwrap();
        assert!(updated.receipt_generated);
        assert_eq!(updated.status, d.status);
    }

    #[tokio::test]
    async fn notifications_per_user() {
        let store = InMemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        for _ in 0..3 {
            store.insert_notification(notification(alice)).await.unwrap();
        }
        store.insert_notification(notification(bob)).await.unwrap();

        assert_eq!(store.list_notifications(alice, 50).await.unwrap().len(), 3);
        assert_eq!(store.list_notifications(alice, 2).await.unwrap().len(), 2);

        let changed = store.mark_all_notifications_read(alice).await.unwrap();
        assert_eq!(changed, 3);
        assert_eq!(store.mark_all_notifications_read(alice).await.unwrap(), 0);

        let bobs = store.list_notifications(bob, 50).await.unwrap();
        assert!(!bobs[0].is_read);
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.update_campaign(campaign(10)).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "Campaign", .. })));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = InMemoryStore::new();
        let now = timestamp_now();
        let user = User {
            id: UserId::new(),
            name: "Amina".to_string(),
            email: "amina@example.org".to_string(),
            phone: None,
            role: Role::Donor,
            is_active: true,
            is_approved: true,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(user.clone()).await.unwrap();

        let mut other = user.clone();
        other.id = UserId::new();
        other.email = "AMINA@example.org".to_string();
        let result = store.insert_user(other).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn delete_campaign_reports_existence() {
        let store = InMemoryStore::new();
        let c = store.insert_campaign(campaign(10)).await.unwrap();
        assert!(store.delete_campaign(c.id).await.unwrap());
        assert!(!store.delete_campaign(c.id).await.unwrap());
        assert!(store.list_campaigns(None).await.unwrap().is_empty());
    }
}
