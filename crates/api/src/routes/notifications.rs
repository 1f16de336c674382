//! The caller's in-app notifications.

use std::sync::Arc;

use axum::extract::{Path, State};
use common::{Notification, NotificationId};
use serde::Serialize;
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};
use crate::routes::parse_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// GET /api/notifications: the caller's newest notifications.
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<Notification>>, ApiError> {
    Ok(response::list(state.notifications.list_for(&caller).await?))
}

/// PATCH /api/notifications/{id}/read
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn mark_read<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<Notification>, ApiError> {
    let id: NotificationId = parse_id(&id, "notification")?;
    Ok(response::data(state.notifications.mark_read(&caller, id).await?))
}

/// PATCH /api/notifications/read-all
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn mark_all_read<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
) -> Result<ApiResponse<MarkedRead>, ApiError> {
    let updated = state.notifications.mark_all_read(&caller).await?;
    Ok(response::with_message(
        "All notifications marked as read",
        MarkedRead { updated },
    ))
}
