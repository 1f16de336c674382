//! Campaign endpoints. Reads are public; writes are admin-only.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Campaign, CampaignId, CampaignStatus};
use domain::{CampaignUpdate, NewCampaign};
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{self, ApiResponse};
use crate::routes::{StatusFilter, parse_filter, parse_id};
use crate::state::AppState;

/// GET /api/campaigns?status=
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<StatusFilter>,
) -> Result<ApiResponse<Vec<Campaign>>, ApiError> {
    let status = parse_filter::<CampaignStatus>(filter.status.as_deref(), "status")?;
    Ok(response::list(state.campaigns.list(status).await?))
}

/// GET /api/campaigns/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Campaign>, ApiError> {
    let id: CampaignId = parse_id(&id, "campaign")?;
    Ok(response::data(state.campaigns.get(id).await?))
}

/// POST /api/campaigns
#[tracing::instrument(skip(state, caller, input), fields(user = %caller.user_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    ApiJson(input): ApiJson<NewCampaign>,
) -> Result<(StatusCode, ApiResponse<Campaign>), ApiError> {
    let campaign = state.campaigns.create(&caller, input).await?;
    Ok((StatusCode::CREATED, response::data(campaign)))
}

/// PUT /api/campaigns/{id}
#[tracing::instrument(skip(state, caller, update), fields(user = %caller.user_id))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<CampaignUpdate>,
) -> Result<ApiResponse<Campaign>, ApiError> {
    let id: CampaignId = parse_id(&id, "campaign")?;
    Ok(response::data(state.campaigns.update(&caller, id, update).await?))
}

/// PATCH /api/campaigns/{id}/close
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn close<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<Campaign>, ApiError> {
    let id: CampaignId = parse_id(&id, "campaign")?;
    Ok(response::data(state.campaigns.close(&caller, id).await?))
}

/// DELETE /api/campaigns/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: CampaignId = parse_id(&id, "campaign")?;
    state.campaigns.delete(&caller, id).await?;
    Ok(response::message("Campaign deleted"))
}
