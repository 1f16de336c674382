use async_trait::async_trait;
use common::{
    Beneficiary, BeneficiaryId, Campaign, CampaignId, CampaignStatus, Donation, DonationId, Money,
    Notification, NotificationId, RelatedEntity, Role, TaskId, User, UserId, VolunteerTask,
    timestamp_now,
};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    BeneficiaryQuery, DonationQuery, Result, StoreError, TaskQuery,
    store::{
        BeneficiaryStore, CampaignStore, DonationStore, NotificationStore, TaskStore, UserStore,
    },
};

const TRANSACTION_ID_CONSTRAINT: &str = "donations_transaction_id_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";
const NUMERIC_OUT_OF_RANGE: &str = "22003";

const CAMPAIGN_COLUMNS: &str = "id, title, description, category, target_amount, current_amount, \
     start_date, end_date, status, image, created_by, created_at, updated_at";

const DONATION_COLUMNS: &str = "id, donor_id, campaign_id, amount, payment_method, transaction_id, \
     status, payment_details, receipt_generated, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, channel, title, message, is_read, entity_type, entity_id, created_at, updated_at";

const USER_COLUMNS: &str =
    "id, name, email, phone, role, is_active, is_approved, created_at, updated_at";

const TASK_COLUMNS: &str = "id, volunteer_id, title, description, status, assigned_by, \
     assigned_date, completed_date, updates, field_photos, certificate_generated, created_at, \
     updated_at";

const BENEFICIARY_COLUMNS: &str = "id, name, email, phone, address, nid, application_date, \
     status, reviewed_by, review_date, review_notes, aid_type, aid_amount, aid_description, \
     distribution_date, distribution_proof, distributed_by, created_at, updated_at";

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn campaign_from_row(row: &PgRow) -> Result<Campaign> {
        Ok(Campaign {
            id: CampaignId::from_uuid(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get::<String, _>("category")?.parse()?,
            target_amount: Money::from_poisha(row.try_get("target_amount")?),
            current_amount: Money::from_poisha(row.try_get("current_amount")?),
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            status: row.try_get::<String, _>("status")?.parse()?,
            image: row.try_get("image")?,
            created_by: UserId::from_uuid(row.try_get("created_by")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn donation_from_row(row: &PgRow) -> Result<Donation> {
        let payment_details = row
            .try_get::<Option<serde_json::Value>, _>("payment_details")?
            .map(serde_json::from_value)
            .transpose()?;

        Ok(Donation {
            id: DonationId::from_uuid(row.try_get("id")?),
            donor: UserId::from_uuid(row.try_get("donor_id")?),
            campaign: CampaignId::from_uuid(row.try_get("campaign_id")?),
            amount: Money::from_poisha(row.try_get("amount")?),
            payment_method: row.try_get::<String, _>("payment_method")?.parse()?,
            transaction_id: row.try_get("transaction_id")?,
            status: row.try_get::<String, _>("status")?.parse()?,
            payment_details,
            receipt_generated: row.try_get("receipt_generated")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn notification_from_row(row: &PgRow) -> Result<Notification> {
        let entity_type: Option<String> = row.try_get("entity_type")?;
        let entity_id: Option<Uuid> = row.try_get("entity_id")?;
        let related_entity = match (entity_type, entity_id) {
            (Some(kind), Some(id)) => Some(RelatedEntity::new(kind.parse()?, id)),
            _ => None,
        };

        Ok(Notification {
            id: NotificationId::from_uuid(row.try_get("id")?),
            user: UserId::from_uuid(row.try_get("user_id")?),
            channel: row.try_get::<String, _>("channel")?.parse()?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            related_entity,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn user_from_row(row: &PgRow) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            role: row.try_get::<String, _>("role")?.parse()?,
            is_active: row.try_get("is_active")?,
            is_approved: row.try_get("is_approved")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn task_from_row(row: &PgRow) -> Result<VolunteerTask> {
        Ok(VolunteerTask {
            id: TaskId::from_uuid(row.try_get("id")?),
            volunteer: UserId::from_uuid(row.try_get("volunteer_id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: row.try_get::<String, _>("status")?.parse()?,
            assigned_by: UserId::from_uuid(row.try_get("assigned_by")?),
            assigned_date: row.try_get("assigned_date")?,
            completed_date: row.try_get("completed_date")?,
            updates: serde_json::from_value(row.try_get("updates")?)?,
            field_photos: serde_json::from_value(row.try_get("field_photos")?)?,
            certificate_generated: row.try_get("certificate_generated")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn beneficiary_from_row(row: &PgRow) -> Result<Beneficiary> {
        Ok(Beneficiary {
            id: BeneficiaryId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            nid: row.try_get("nid")?,
            application_date: row.try_get("application_date")?,
            status: row.try_get::<String, _>("status")?.parse()?,
            reviewed_by: row
                .try_get::<Option<Uuid>, _>("reviewed_by")?
                .map(UserId::from_uuid),
            review_date: row.try_get("review_date")?,
            review_notes: row.try_get("review_notes")?,
            aid_type: row.try_get::<String, _>("aid_type")?.parse()?,
            aid_amount: row
                .try_get::<Option<i64>, _>("aid_amount")?
                .map(Money::from_poisha),
            aid_description: row.try_get("aid_description")?,
            distribution_date: row.try_get("distribution_date")?,
            distribution_proof: row.try_get("distribution_proof")?,
            distributed_by: row
                .try_get::<Option<Uuid>, _>("distributed_by")?
                .map(UserId::from_uuid),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Returns the violated constraint name, if `err` is a constraint violation.
fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

fn is_out_of_range(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE))
}

#[async_trait]
impl CampaignStore for PostgresStore {
    async fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (id, title, description, category, target_amount, current_amount,
                                   start_date, end_date, status, image, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(&campaign.title)
        .bind(&campaign.description)
        .bind(campaign.category.as_str())
        .bind(campaign.target_amount.poisha())
        .bind(campaign.current_amount.poisha())
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.status.as_str())
        .bind(&campaign.image)
        .bind(campaign.created_by.as_uuid())
        .bind(campaign.created_at)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(campaign)
    }

    async fn get_campaign(&self, id: CampaignId) -> Result<Option<Campaign>> {
        let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::campaign_from_row).transpose()
    }

    async fn list_campaigns(&self, status: Option<CampaignStatus>) -> Result<Vec<Campaign>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE TRUE"
        ));
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::campaign_from_row).collect()
    }

    async fn update_campaign(&self, campaign: Campaign) -> Result<Campaign> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET title = $2, description = $3, category = $4, target_amount = $5,
                current_amount = $6, start_date = $7, end_date = $8, status = $9,
                image = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(&campaign.title)
        .bind(&campaign.description)
        .bind(campaign.category.as_str())
        .bind(campaign.target_amount.poisha())
        .bind(campaign.current_amount.poisha())
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.status.as_str())
        .bind(&campaign.image)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Campaign", campaign.id));
        }
        Ok(campaign)
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_raised(&self, id: CampaignId, amount: Money) -> Result<Campaign> {
        // Single-statement increment; Postgres serializes concurrent updates on the row.
        let sql = format!(
            "UPDATE campaigns SET current_amount = current_amount + $2, updated_at = $3 \
             WHERE id = $1 RETURNING {CAMPAIGN_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(amount.poisha())
            .bind(timestamp_now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_out_of_range(&e) {
                    return StoreError::AmountOverflow(id.to_string());
                }
                StoreError::Database(e)
            })?;

        match row {
            Some(row) => Self::campaign_from_row(&row),
            None => Err(StoreError::not_found("Campaign", id)),
        }
    }
}

#[async_trait]
impl DonationStore for PostgresStore {
    async fn insert_donation(&self, donation: Donation) -> Result<Donation> {
        let payment_details = donation
            .payment_details
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO donations (id, donor_id, campaign_id, amount, payment_method, transaction_id,
                                   status, payment_details, receipt_generated, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(donation.id.as_uuid())
        .bind(donation.donor.as_uuid())
        .bind(donation.campaign.as_uuid())
        .bind(donation.amount.poisha())
        .bind(donation.payment_method.as_str())
        .bind(&donation.transaction_id)
        .bind(donation.status.as_str())
        .bind(payment_details)
        .bind(donation.receipt_generated)
        .bind(donation.created_at)
        .bind(donation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e) == Some(TRANSACTION_ID_CONSTRAINT) {
                return StoreError::DuplicateTransactionId(donation.transaction_id.clone());
            }
            StoreError::Database(e)
        })?;

        Ok(donation)
    }

    async fn get_donation(&self, id: DonationId) -> Result<Option<Donation>> {
        let sql = format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::donation_from_row).transpose()
    }

    async fn query_donations(&self, query: DonationQuery) -> Result<Vec<Donation>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE TRUE"
        ));
        if let Some(donor) = query.donor {
            qb.push(" AND donor_id = ").push_bind(donor.as_uuid());
        }
        if let Some(campaign) = query.campaign {
            qb.push(" AND campaign_id = ").push_bind(campaign.as_uuid());
        }
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(method) = query.payment_method {
            qb.push(" AND payment_method = ").push_bind(method.as_str());
        }
        if let Some(since) = query.since {
            qb.push(" AND created_at >= ").push_bind(since);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::donation_from_row).collect()
    }

    async fn count_donations(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn mark_receipt_generated(&self, id: DonationId) -> Result<Donation> {
        let sql = format!(
            "UPDATE donations SET receipt_generated = TRUE, updated_at = $2 \
             WHERE id = $1 RETURNING {DONATION_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(timestamp_now())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::donation_from_row(&row),
            None => Err(StoreError::not_found("Donation", id)),
        }
    }
}

#[async_trait]
impl NotificationStore for PostgresStore {
    async fn insert_notification(&self, notification: Notification) -> Result<Notification> {
        let (entity_type, entity_id) = match notification.related_entity {
            Some(related) => (Some(related.entity_type.as_str()), Some(related.entity_id)),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, channel, title, message, is_read,
                                       entity_type, entity_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user.as_uuid())
        .bind(notification.channel.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(entity_type)
        .bind(entity_id)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::notification_from_row).transpose()
    }

    async fn list_notifications(&self, user: UserId, limit: usize) -> Result<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(user.as_uuid())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::notification_from_row).collect()
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification> {
        let sql = format!(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2 \
             WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(timestamp_now())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::notification_from_row(&row),
            None => Err(StoreError::not_found("Notification", id)),
        }
    }

    async fn mark_all_notifications_read(&self, user: UserId) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2 \
             WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user.as_uuid())
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, role, is_active, is_approved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.is_approved)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e) == Some(EMAIL_CONSTRAINT) {
                return StoreError::DuplicateEmail(user.email.clone());
            }
            StoreError::Database(e)
        })?;

        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        if let Some(role) = role {
            qb.push(" AND role = ").push_bind(role.as_str());
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::user_from_row).collect()
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, phone = $4, role = $5, is_active = $6,
                is_approved = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.is_approved)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e) == Some(EMAIL_CONSTRAINT) {
                return StoreError::DuplicateEmail(user.email.clone());
            }
            StoreError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user.id));
        }
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PostgresStore {
    async fn insert_task(&self, task: VolunteerTask) -> Result<VolunteerTask> {
        sqlx::query(
            r#"
            INSERT INTO volunteer_tasks (id, volunteer_id, title, description, status, assigned_by,
                                         assigned_date, completed_date, updates, field_photos,
                                         certificate_generated, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.volunteer.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.assigned_by.as_uuid())
        .bind(task.assigned_date)
        .bind(task.completed_date)
        .bind(serde_json::to_value(&task.updates)?)
        .bind(serde_json::to_value(&task.field_photos)?)
        .bind(task.certificate_generated)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<VolunteerTask>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM volunteer_tasks WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::task_from_row).transpose()
    }

    async fn query_tasks(&self, query: TaskQuery) -> Result<Vec<VolunteerTask>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {TASK_COLUMNS} FROM volunteer_tasks WHERE TRUE"
        ));
        if let Some(volunteer) = query.volunteer {
            qb.push(" AND volunteer_id = ").push_bind(volunteer.as_uuid());
        }
        if let Some(since) = query.since {
            qb.push(" AND created_at >= ").push_bind(since);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::task_from_row).collect()
    }

    async fn update_task(&self, task: VolunteerTask) -> Result<VolunteerTask> {
        let result = sqlx::query(
            r#"
            UPDATE volunteer_tasks
            SET title = $2, description = $3, status = $4, completed_date = $5, updates = $6,
                field_photos = $7, certificate_generated = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.completed_date)
        .bind(serde_json::to_value(&task.updates)?)
        .bind(serde_json::to_value(&task.field_photos)?)
        .bind(task.certificate_generated)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("VolunteerTask", task.id));
        }
        Ok(task)
    }
}

#[async_trait]
impl BeneficiaryStore for PostgresStore {
    async fn insert_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary> {
        sqlx::query(
            r#"
            INSERT INTO beneficiaries (id, name, email, phone, address, nid, application_date,
                                       status, reviewed_by, review_date, review_notes, aid_type,
                                       aid_amount, aid_description, distribution_date,
                                       distribution_proof, distributed_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(beneficiary.id.as_uuid())
        .bind(&beneficiary.name)
        .bind(&beneficiary.email)
        .bind(&beneficiary.phone)
        .bind(&beneficiary.address)
        .bind(&beneficiary.nid)
        .bind(beneficiary.application_date)
        .bind(beneficiary.status.as_str())
        .bind(beneficiary.reviewed_by.map(|id| id.as_uuid()))
        .bind(beneficiary.review_date)
        .bind(&beneficiary.review_notes)
        .bind(beneficiary.aid_type.as_str())
        .bind(beneficiary.aid_amount.map(|m| m.poisha()))
        .bind(&beneficiary.aid_description)
        .bind(beneficiary.distribution_date)
        .bind(&beneficiary.distribution_proof)
        .bind(beneficiary.distributed_by.map(|id| id.as_uuid()))
        .bind(beneficiary.created_at)
        .bind(beneficiary.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(beneficiary)
    }

    async fn get_beneficiary(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>> {
        let sql = format!("SELECT {BENEFICIARY_COLUMNS} FROM beneficiaries WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::beneficiary_from_row).transpose()
    }

    async fn query_beneficiaries(&self, query: BeneficiaryQuery) -> Result<Vec<Beneficiary>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BENEFICIARY_COLUMNS} FROM beneficiaries WHERE TRUE"
        ));
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(since) = query.since {
            qb.push(" AND created_at >= ").push_bind(since);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::beneficiary_from_row).collect()
    }

    async fn update_beneficiary(&self, beneficiary: Beneficiary) -> Result<Beneficiary> {
        let result = sqlx::query(
            r#"
            UPDATE beneficiaries
            SET name = $2, email = $3, phone = $4, address = $5, nid = $6, status = $7,
                reviewed_by = $8, review_date = $9, review_notes = $10, aid_type = $11,
                aid_amount = $12, aid_description = $13, distribution_date = $14,
                distribution_proof = $15, distributed_by = $16, updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(beneficiary.id.as_uuid())
        .bind(&beneficiary.name)
        .bind(&beneficiary.email)
        .bind(&beneficiary.phone)
        .bind(&beneficiary.address)
        .bind(&beneficiary.nid)
        .bind(beneficiary.status.as_str())
        .bind(beneficiary.reviewed_by.map(|id| id.as_uuid()))
        .bind(beneficiary.review_date)
        .bind(&beneficiary.review_notes)
        .bind(beneficiary.aid_type.as_str())
        .bind(beneficiary.aid_amount.map(|m| m.poisha()))
        .bind(&beneficiary.aid_description)
        .bind(beneficiary.distribution_date)
        .bind(&beneficiary.distribution_proof)
        .bind(beneficiary.distributed_by.map(|id| id.as_uuid()))
        .bind(beneficiary.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Beneficiary", beneficiary.id));
        }
        Ok(beneficiary)
    }
}
