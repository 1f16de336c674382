//! Admin management of user profiles.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Role, User, UserId};
use domain::{NewUser, UserUpdate};
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{self, ApiResponse};
use crate::routes::{RoleFilter, parse_filter, parse_id};
use crate::state::AppState;

/// POST /api/users
#[tracing::instrument(skip(state, caller, input), fields(user = %caller.user_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, ApiResponse<User>), ApiError> {
    let user = state.users.create(&caller, input).await?;
    Ok((StatusCode::CREATED, response::data(user)))
}

/// GET /api/users?role=
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Query(filter): Query<RoleFilter>,
) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let role = parse_filter::<Role>(filter.role.as_deref(), "role")?;
    Ok(response::list(state.users.list(&caller, role).await?))
}

/// GET /api/users/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    Ok(response::data(state.users.get(&caller, id).await?))
}

/// PUT /api/users/{id}
#[tracing::instrument(skip(state, caller, update), fields(user = %caller.user_id))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> Result<ApiResponse<User>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    Ok(response::data(state.users.update(&caller, id, update).await?))
}

/// DELETE /api/users/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    state.users.delete(&caller, id).await?;
    Ok(response::message("User deleted"))
}
