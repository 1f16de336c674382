//! Beneficiary application record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BeneficiaryId, Money, UserId};

text_enum! {
    /// Review and distribution status of an aid application.
    ///
    /// ```text
    /// Pending ──┬──► Approved ──► AidDistributed
    ///           └──► Rejected
    /// ```
    #[derive(Default)]
    pub enum BeneficiaryStatus {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        AidDistributed => "aid-distributed",
    }
}

text_enum! {
    /// Kind of aid handed out.
    #[derive(Default)]
    pub enum AidType {
        #[default]
        Financial => "financial",
        Food => "food",
        Medical => "medical",
        Education => "education",
        Other => "other",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nid: Option<String>,
    pub application_date: DateTime<Utc>,
    pub status: BeneficiaryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub aid_type: AidType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_proof: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
