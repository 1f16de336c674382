//! In-app notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{NotificationId, UserId};

text_enum! {
    /// Channel the notification was (or would be) delivered on.
    #[derive(Default)]
    pub enum NotificationChannel {
        Email => "email",
        Sms => "sms",
        #[default]
        System => "system",
    }
}

text_enum! {
    /// Kind of entity a notification points back to.
    pub enum EntityType {
        Donation => "donation",
        Task => "task",
        Beneficiary => "beneficiary",
        Campaign => "campaign",
    }
}

/// Back-reference from a notification to the entity that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
}

impl RelatedEntity {
    pub fn new(entity_type: EntityType, entity_id: impl Into<Uuid>) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user: UserId,
    #[serde(rename = "type")]
    pub channel: NotificationChannel,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
