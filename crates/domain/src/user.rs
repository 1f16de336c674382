//! User profile registry. Credentials live with the identity provider.

use common::{Role, User, UserId, timestamp_now};
use serde::Deserialize;
use store::UserStore;

use crate::caller::Caller;
use crate::error::{DomainError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Donor
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
}

fn validate(user: &User) -> Result<()> {
    if user.name.trim().is_empty() {
        return Err(DomainError::validation("Please provide a name"));
    }
    let email = user.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("Please provide a valid email"));
    }
    Ok(())
}

/// Admin-only management of user profiles.
#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn create(&self, caller: &Caller, input: NewUser) -> Result<User> {
        caller.require_any(&[Role::Admin])?;

        let now = timestamp_now();
        let user = User {
            id: UserId::new(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            role: input.role,
            is_active: true,
            is_approved: true,
            created_at: now,
            updated_at: now,
        };
        validate(&user)?;
        Ok(self.store.insert_user(user).await?)
    }

    /// Looks up a user without an access check, for collaborators that need
    /// contact details.
    pub async fn find(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.store.get_user(id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, caller: &Caller, id: UserId) -> Result<User> {
        caller.require_any(&[Role::Admin])?;
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, caller: &Caller, role: Option<Role>) -> Result<Vec<User>> {
        caller.require_any(&[Role::Admin])?;
        Ok(self.store.list_users(role).await?)
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, caller: &Caller, id: UserId, update: UserUpdate) -> Result<User> {
        let mut user = self.get(caller, id).await?;
        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(active) = update.is_active {
            user.is_active = active;
        }
        if let Some(approved) = update.is_approved {
            user.is_approved = approved;
        }
        user.updated_at = timestamp_now();
        validate(&user)?;
        Ok(self.store.update_user(user).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, caller: &Caller, id: UserId) -> Result<()> {
        caller.require_any(&[Role::Admin])?;
        if !self.store.delete_user(id).await? {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}
