//! Donation endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Donation, DonationId, Role};
use store::Store;
use workflow::DonationRequest;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{self, ApiResponse};
use crate::routes::parse_id;
use crate::state::AppState;

/// POST /api/donations: runs the donation workflow for the caller.
#[tracing::instrument(skip(state, caller, request), fields(user = %caller.user_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    ApiJson(request): ApiJson<DonationRequest>,
) -> Result<(StatusCode, ApiResponse<Donation>), ApiError> {
    caller.require_any(&[Role::Donor, Role::Admin])?;
    let donation = state.coordinator.donate(caller.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        response::with_message("Donation successful", donation),
    ))
}

/// GET /api/donations: donors see their own, everyone else sees all.
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<Donation>>, ApiError> {
    Ok(response::list(state.donations.list_for(&caller).await?))
}

/// GET /api/donations/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<Donation>, ApiError> {
    let id: DonationId = parse_id(&id, "donation")?;
    Ok(response::data(state.donations.get_for(&caller, id).await?))
}
