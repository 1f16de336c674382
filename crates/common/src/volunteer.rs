//! Volunteer task record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TaskId, UserId};

text_enum! {
    /// Progress of a volunteer task.
    ///
    /// ```text
    /// Assigned ──► InProgress ──► Completed
    ///     └────────────────────────►┘
    /// ```
    #[derive(Default)]
    pub enum TaskStatus {
        #[default]
        Assigned => "assigned",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

/// A progress note posted against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub update_text: String,
    pub update_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerTask {
    pub id: TaskId,
    pub volunteer: UserId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_by: UserId,
    pub assigned_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updates: Vec<TaskUpdate>,
    #[serde(default)]
    pub field_photos: Vec<String>,
    pub certificate_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
