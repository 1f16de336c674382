//! HTTP route handlers, one module per resource.

pub mod analytics;
pub mod beneficiaries;
pub mod campaigns;
pub mod donations;
pub mod notifications;
pub mod pdf;
pub mod service;
pub mod users;
pub mod volunteer;

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ApiError;

/// `?status=` filter shared by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

/// `?role=` filter for user listings.
#[derive(Debug, Default, Deserialize)]
pub struct RoleFilter {
    pub role: Option<String>,
}

/// Parses a path id, rejecting malformed ids with 400.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} id: {raw}")))
}

/// Parses an optional query filter; an empty value means no filter.
pub(crate) fn parse_filter<T: FromStr>(raw: Option<&str>, what: &str) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {what}: {value}"))),
        None => Ok(None),
    }
}
