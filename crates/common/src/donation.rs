//! Donation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CampaignId, DonationId, Money, UserId};

text_enum! {
    /// Supported payment channels.
    pub enum PaymentMethod {
        BKash => "bKash",
        Nagad => "Nagad",
        Bank => "Bank",
        Card => "Card",
    }
}

text_enum! {
    /// Status of a donation attempt.
    ///
    /// ```text
    /// Pending ──┬──► Completed
    ///           └──► Failed
    /// ```
    #[derive(Default)]
    pub enum DonationStatus {
        #[default]
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

impl DonationStatus {
    /// Completed and failed donations never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Completed | DonationStatus::Failed)
    }
}

/// Optional payment detail fragments supplied by the donor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last_four: Option<String>,
}

impl PaymentDetails {
    /// Returns true when no fragment is present.
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none() && self.account_number.is_none() && self.card_last_four.is_none()
    }

    /// Masks every fragment down to its last four characters.
    pub fn masked(&self) -> Self {
        Self {
            phone_number: self.phone_number.as_deref().map(mask),
            account_number: self.account_number.as_deref().map(mask),
            card_last_four: self.card_last_four.as_deref().map(last_four),
        }
    }
}

fn last_four(value: &str) -> String {
    let chars: Vec<char> = value.trim().chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

fn mask(value: &str) -> String {
    let trimmed = value.trim();
    let hidden = trimmed.chars().count().saturating_sub(4);
    let mut masked = "*".repeat(hidden);
    masked.push_str(&last_four(trimmed));
    masked
}

/// One donor's contribution attempt against a campaign, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: DonationId,
    pub donor: UserId,
    pub campaign: CampaignId,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub status: DonationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    pub receipt_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    pub fn is_completed(&self) -> bool {
        self.status == DonationStatus::Completed
    }
}
