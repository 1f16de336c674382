//! Campaign management.

use chrono::{DateTime, Utc};
use common::{Campaign, CampaignCategory, CampaignId, CampaignStatus, Money, Role, timestamp_now};
use serde::Deserialize;
use store::CampaignStore;

use crate::caller::Caller;
use crate::error::{DomainError, Result};

/// Input for creating a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: CampaignCategory,
    pub target_amount: Money,
    /// Defaults to now.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial update of a campaign; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CampaignCategory>,
    pub target_amount: Option<Money>,
    /// Manual correction of the raised amount.
    pub current_amount: Option<Money>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<CampaignStatus>,
    pub image: Option<String>,
}

fn validate(campaign: &Campaign) -> Result<()> {
    if campaign.title.trim().is_empty() {
        return Err(DomainError::validation("Please provide a campaign title"));
    }
    if campaign.description.trim().is_empty() {
        return Err(DomainError::validation(
            "Please provide a campaign description",
        ));
    }
    if campaign.target_amount.is_negative() {
        return Err(DomainError::validation("Target amount cannot be negative"));
    }
    if campaign.current_amount.is_negative() {
        return Err(DomainError::validation("Current amount cannot be negative"));
    }
    if campaign.target_amount.exceeds_max() || campaign.current_amount.exceeds_max() {
        return Err(DomainError::validation(format!(
            "Campaign amounts must not exceed {}",
            Money::MAX_AMOUNT
        )));
    }
    if campaign.end_date < campaign.start_date {
        return Err(DomainError::validation(
            "End date must not be before start date",
        ));
    }
    Ok(())
}

/// Service for managing campaigns. Reads are public; writes are admin-only.
#[derive(Clone)]
pub struct CampaignService<S> {
    store: S,
}

impl<S: CampaignStore> CampaignService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, status: Option<CampaignStatus>) -> Result<Vec<Campaign>> {
        Ok(self.store.list_campaigns(status).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: CampaignId) -> Result<Campaign> {
        self.store
            .get_campaign(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Campaign", id))
    }

    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, caller: &Caller, input: NewCampaign) -> Result<Campaign> {
        caller.require_any(&[Role::Admin])?;

        let now = timestamp_now();
        let campaign = Campaign {
            id: CampaignId::new(),
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            target_amount: input.target_amount,
            current_amount: Money::zero(),
            start_date: input.start_date.unwrap_or(now),
            end_date: input.end_date,
            status: CampaignStatus::Active,
            image: input.image.filter(|url| !url.trim().is_empty()),
            created_by: caller.user_id,
            created_at: now,
            updated_at: now,
        };
        validate(&campaign)?;

        let campaign = self.store.insert_campaign(campaign).await?;
        tracing::info!(campaign = %campaign.id, "campaign created");
        Ok(campaign)
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: CampaignId,
        update: CampaignUpdate,
    ) -> Result<Campaign> {
        caller.require_any(&[Role::Admin])?;

        let mut campaign = self.get(id).await?;
        if let Some(title) = update.title {
            campaign.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            campaign.description = description;
        }
        if let Some(category) = update.category {
            campaign.category = category;
        }
        if let Some(target) = update.target_amount {
            campaign.target_amount = target;
        }
        if let Some(current) = update.current_amount {
            tracing::warn!(
                campaign = %id,
                from = campaign.current_amount.poisha(),
                to = current.poisha(),
                "manual correction of raised amount"
            );
            campaign.current_amount = current;
        }
        if let Some(start) = update.start_date {
            campaign.start_date = start;
        }
        if let Some(end) = update.end_date {
            campaign.end_date = end;
        }
        if let Some(status) = update.status {
            campaign.status = status;
        }
        if let Some(image) = update.image {
            campaign.image = Some(image).filter(|url| !url.trim().is_empty());
        }
        campaign.updated_at = timestamp_now();
        validate(&campaign)?;

        Ok(self.store.update_campaign(campaign).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn close(&self, caller: &Caller, id: CampaignId) -> Result<Campaign> {
        caller.require_any(&[Role::Admin])?;

        let mut campaign = self.get(id).await?;
        campaign.status = CampaignStatus::Closed;
        campaign.updated_at = timestamp_now();
        Ok(self.store.update_campaign(campaign).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, caller: &Caller, id: CampaignId) -> Result<()> {
        caller.require_any(&[Role::Admin])?;

        if !self.store.delete_campaign(id).await? {
            return Err(DomainError::not_found("Campaign", id));
        }
        tracing::info!(campaign = %id, "campaign deleted");
        Ok(())
    }
}
