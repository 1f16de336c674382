//! Caller identity from upstream gateway headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{Role, UserId};
use domain::Caller;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller. Rejects the request with 401 when either
/// identity header is missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub Caller);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no identity".to_string()))
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id: UserId = header(parts, USER_ID_HEADER)?
            .parse()
            .map_err(|_| ApiError::Unauthorized("Not authorized, invalid user id".to_string()))?;
        let role: Role = header(parts, USER_ROLE_HEADER)?
            .parse()
            .map_err(|_| ApiError::Unauthorized("Not authorized, invalid role".to_string()))?;
        Ok(Auth(Caller::new(user_id, role)))
    }
}
