//! Volunteer task assignment and progress tracking.

use common::{
    EntityType, NotificationChannel, RelatedEntity, Role, TaskId, TaskStatus, TaskUpdate, UserId,
    VolunteerTask, timestamp_now,
};
use serde::Deserialize;
use store::{NotificationStore, TaskQuery, TaskStore, UserStore};

use crate::caller::Caller;
use crate::error::{DomainError, Result};
use crate::notification::{NewNotification, NotificationService};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub volunteer: UserId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub field_photos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusChange {
    pub status: TaskStatus,
    #[serde(default)]
    pub update_text: Option<String>,
}

/// Assigns tasks to volunteers and records their progress.
///
/// Volunteers only see and change their own tasks. A completed task is
/// terminal.
#[derive(Clone)]
pub struct VolunteerService<S> {
    store: S,
    notifications: NotificationService<S>,
}

impl<S> VolunteerService<S>
where
    S: TaskStore + UserStore + NotificationStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            notifications: NotificationService::new(store.clone()),
            store,
        }
    }

    /// Assigns a task and notifies the volunteer by SMS-channel notification.
    #[tracing::instrument(skip(self, input), fields(volunteer = %input.volunteer))]
    pub async fn assign(&self, caller: &Caller, input: NewTask) -> Result<VolunteerTask> {
        caller.require_any(&[Role::Admin, Role::Staff])?;

        if input.title.trim().is_empty() {
            return Err(DomainError::validation("Please provide a task title"));
        }
        if input.description.trim().is_empty() {
            return Err(DomainError::validation("Please provide a task description"));
        }
        match self.store.get_user(input.volunteer).await? {
            Some(user) if user.role == Role::Volunteer => {}
            Some(_) => {
                return Err(DomainError::validation(
                    "Tasks can only be assigned to volunteers",
                ));
            }
            None => return Err(DomainError::validation("Volunteer does not exist")),
        }

        let now = timestamp_now();
        let task = VolunteerTask {
            id: TaskId::new(),
            volunteer: input.volunteer,
            title: input.title.trim().to_string(),
            description: input.description,
            status: TaskStatus::Assigned,
            assigned_by: caller.user_id,
            assigned_date: now,
            completed_date: None,
            updates: Vec::new(),
            field_photos: input.field_photos,
            certificate_generated: false,
            created_at: now,
            updated_at: now,
        };
        let task = self.store.insert_task(task).await?;

        self.notifications
            .notify(NewNotification {
                user: task.volunteer,
                channel: NotificationChannel::Sms,
                title: "New Task Assigned".to_string(),
                message: format!("You have been assigned a new task: {}", task.title),
                related_entity: Some(RelatedEntity::new(EntityType::Task, task.id)),
            })
            .await?;

        tracing::info!(task = %task.id, "task assigned");
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_for(&self, caller: &Caller) -> Result<Vec<VolunteerTask>> {
        let query = match caller.own_records_if(Role::Volunteer) {
            Some(volunteer) => TaskQuery::for_volunteer(volunteer),
            None => TaskQuery::new(),
        };
        Ok(self.store.query_tasks(query).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_for(&self, caller: &Caller, id: TaskId) -> Result<VolunteerTask> {
        let task = self
            .store
            .get_task(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Task", id))?;
        caller.ensure_owner_if(Role::Volunteer, task.volunteer)?;
        Ok(task)
    }

    /// Moves a task to a new status, optionally appending a progress note.
    #[tracing::instrument(skip(self, change), fields(status = %change.status))]
    pub async fn update_status(
        &self,
        caller: &Caller,
        id: TaskId,
        change: TaskStatusChange,
    ) -> Result<VolunteerTask> {
        caller.require_any(&[Role::Volunteer, Role::Staff, Role::Admin])?;

        let mut task = self.get_for(caller, id).await?;
        if task.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                current_state: task.status.as_str(),
                action: "update",
            });
        }

        let now = timestamp_now();
        task.status = change.status;
        if change.status == TaskStatus::Completed {
            task.completed_date = Some(now);
        }
        if let Some(text) = change.update_text.filter(|t| !t.trim().is_empty()) {
            task.updates.push(TaskUpdate {
                update_text: text,
                update_date: now,
            });
        }
        task.updated_at = now;

        let task = self.store.update_task(task).await?;
        tracing::info!(task = %task.id, status = %task.status, "task status updated");
        Ok(task)
    }

    /// Checks that the caller may have a certificate for this task and flags
    /// it as issued. Only completed tasks have certificates.
    #[tracing::instrument(skip(self))]
    pub async fn issue_certificate(&self, caller: &Caller, id: TaskId) -> Result<VolunteerTask> {
        let mut task = self.get_for(caller, id).await?;
        if task.status != TaskStatus::Completed {
            return Err(DomainError::validation(
                "Task must be completed to generate certificate",
            ));
        }
        if !task.certificate_generated {
            task.certificate_generated = true;
            task.updated_at = timestamp_now();
            task = self.store.update_task(task).await?;
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use common::User;
    use store::InMemoryStore;

    use super::*;

    async fn add_user(store: &InMemoryStore, role: Role) -> UserId {
        let now = timestamp_now();
        store
            .insert_user(User {
                id: UserId::new(),
                name: "Nusrat".to_string(),
                email: format!("{}@example.org", UserId::new()),
                phone: Some("01900000000".to_string()),
                role,
                is_active: true,
                is_approved: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
            .id
    }

    fn staff() -> Caller {
        Caller::new(UserId::new(), Role::Staff)
    }

    fn new_task(volunteer: UserId) -> NewTask {
        NewTask {
            volunteer,
            title: "Pack relief kits".to_string(),
            description: "Warehouse shift".to_string(),
            field_photos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn assign_notifies_volunteer() {
        let store = InMemoryStore::new();
        let volunteer = add_user(&store, Role::Volunteer).await;
        let service = VolunteerService::new(store.clone());

        let task = service.assign(&staff(), new_task(volunteer)).await.unwrap();
        assert_eq!(task.status, TaskStatus::Assigned);

        let notes = store.list_notifications(volunteer, 10).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].channel, NotificationChannel::Sms);
        assert_eq!(notes[0].title, "New Task Assigned");
        assert_eq!(
            notes[0].related_entity,
            Some(RelatedEntity::new(EntityType::Task, task.id))
        );
    }

    #[tokio::test]
    async fn assign_requires_existing_volunteer() {
        let store = InMemoryStore::new();
        let donor = add_user(&store, Role::Donor).await;
        let service = VolunteerService::new(store.clone());

        assert!(matches!(
            service.assign(&staff(), new_task(donor)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.assign(&staff(), new_task(UserId::new())).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(store.notification_count().await, 0);
    }

    #[tokio::test]
    async fn assign_requires_staff_or_admin() {
        let store = InMemoryStore::new();
        let volunteer = add_user(&store, Role::Volunteer).await;
        let service = VolunteerService::new(store);
        let caller = Caller::new(volunteer, Role::Volunteer);

        assert!(matches!(
            service.assign(&caller, new_task(volunteer)).await,
            Err(DomainError::AccessDenied(_))
        ));
    }

    #[tokio::test]
    async fn volunteers_only_see_own_tasks() {
        let store = InMemoryStore::new();
        let v1 = add_user(&store, Role::Volunteer).await;
        let v2 = add_user(&store, Role::Volunteer).await;
        let service = VolunteerService::new(store);

        service.assign(&staff(), new_task(v1)).await.unwrap();
        let other = service.assign(&staff(), new_task(v2)).await.unwrap();

        let me = Caller::new(v1, Role::Volunteer);
        assert_eq!(service.list_for(&me).await.unwrap().len(), 1);
        assert_eq!(service.list_for(&staff()).await.unwrap().len(), 2);
        assert!(matches!(
            service.get_for(&me, other.id).await,
            Err(DomainError::AccessDenied(_))
        ));
    }

    #[tokio::test]
    async fn completion_is_terminal() {
        let store = InMemoryStore::new();
        let volunteer = add_user(&store, Role::Volunteer).await;
        let service = VolunteerService::new(store);
        let me = Caller::new(volunteer, Role::Volunteer);
        let task = service.assign(&staff(), new_task(volunteer)).await.unwrap();

        let task = service
            .update_status(
                &me,
                task.id,
                TaskStatusChange {
                    status: TaskStatus::InProgress,
                    update_text: Some("Started".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.completed_date.is_none());

        let task = service
            .update_status(
                &me,
                task.id,
                TaskStatusChange {
                    status: TaskStatus::Completed,
                    update_text: Some("Done".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(task.completed_date.is_some());
        assert_eq!(task.updates.len(), 2);

        let result = service
            .update_status(
                &me,
                task.id,
                TaskStatusChange {
                    status: TaskStatus::InProgress,
                    update_text: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { current_state: "completed", .. })
        ));
    }

    #[tokio::test]
    async fn certificate_requires_completion() {
        let store = InMemoryStore::new();
        let volunteer = add_user(&store, Role::Volunteer).await;
        let service = VolunteerService::new(store);
        let me = Caller::new(volunteer, Role::Volunteer);
        let task = service.assign(&staff(), new_task(volunteer)).await.unwrap();

        assert!(matches!(
            service.issue_certificate(&me, task.id).await,
            Err(DomainError::Validation(_))
        ));

        service
            .update_status(
                &me,
                task.id,
                TaskStatusChange {
                    status: TaskStatus::Completed,
                    update_text: None,
                },
            )
            .await
            .unwrap();
        let issued = service.issue_certificate(&me, task.id).await.unwrap();
        assert!(issued.certificate_generated);
    }
}
