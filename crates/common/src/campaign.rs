//! Campaign record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CampaignId, Money, UserId};

text_enum! {
    /// What kind of giving a campaign collects.
    #[derive(Default)]
    pub enum CampaignCategory {
        #[default]
        General => "general",
        Zakat => "zakat",
        Sadaqah => "sadaqah",
        DisasterRelief => "disaster_relief",
        OrphanSponsorship => "orphan_sponsorship",
    }
}

text_enum! {
    /// Lifecycle status of a campaign.
    #[derive(Default)]
    pub enum CampaignStatus {
        #[default]
        Active => "active",
        Closed => "closed",
        Completed => "completed",
    }
}

/// A fundraising effort with a target and a running total of confirmed
/// contributions.
///
/// `current_amount` only grows through completed donations (or a manual admin
/// correction); it may exceed `target_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub target_amount: Money,
    pub current_amount: Money,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: CampaignStatus,
    pub image: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Returns true once the raised amount has reached the target.
    pub fn is_funded(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Percentage of the target raised so far, capped at 100.
    pub fn progress_percent(&self) -> u8 {
        if self.target_amount.is_zero() {
            return 100;
        }
        let ratio = self.current_amount.poisha().max(0) as i128 * 100
            / self.target_amount.poisha() as i128;
        ratio.min(100) as u8
    }
}
