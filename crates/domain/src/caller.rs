//! The identity a request runs under.

use common::{Role, UserId};

use crate::error::{DomainError, Result};

/// The authenticated user behind a request, as asserted by the upstream gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Fails with `AccessDenied` unless the caller has one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::AccessDenied(format!(
                "User role {} is not authorized to access this route",
                self.role
            )))
        }
    }

    /// The owner filter for a listing in which `restricted` callers only see
    /// their own records. Every other role sees everything.
    pub fn own_records_if(&self, restricted: Role) -> Option<UserId> {
        (self.role == restricted).then_some(self.user_id)
    }

    /// Fails with `AccessDenied` when the caller has the `restricted` role and
    /// does not own the record.
    pub fn ensure_owner_if(&self, restricted: Role, owner: UserId) -> Result<()> {
        match self.own_records_if(restricted) {
            Some(own) if own != owner => Err(DomainError::access_denied()),
            _ => Ok(()),
        }
    }
}
