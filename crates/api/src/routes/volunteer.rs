//! Volunteer task endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{TaskId, VolunteerTask};
use domain::{NewTask, TaskStatusChange};
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{self, ApiResponse};
use crate::routes::parse_id;
use crate::state::AppState;

/// POST /api/volunteer/tasks
#[tracing::instrument(skip(state, caller, input), fields(user = %caller.user_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    ApiJson(input): ApiJson<NewTask>,
) -> Result<(StatusCode, ApiResponse<VolunteerTask>), ApiError> {
    let task = state.volunteers.assign(&caller, input).await?;
    Ok((StatusCode::CREATED, response::data(task)))
}

/// GET /api/volunteer/tasks: volunteers see their own, others see all.
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<VolunteerTask>>, ApiError> {
    Ok(response::list(state.volunteers.list_for(&caller).await?))
}

/// GET /api/volunteer/tasks/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<VolunteerTask>, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    Ok(response::data(state.volunteers.get_for(&caller, id).await?))
}

/// PATCH /api/volunteer/tasks/{id}/status
#[tracing::instrument(skip(state, caller, change), fields(user = %caller.user_id))]
pub async fn update_status<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    ApiJson(change): ApiJson<TaskStatusChange>,
) -> Result<ApiResponse<VolunteerTask>, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    let task = state.volunteers.update_status(&caller, id, change).await?;
    Ok(response::data(task))
}
