//! User profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// A registered person. Credentials live with the upstream identity provider;
/// this record only carries what the platform needs to reach and classify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Phone number if one is on file and not blank.
    pub fn phone_on_file(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}
