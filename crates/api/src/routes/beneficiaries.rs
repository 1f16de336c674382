//! Aid applications and their review.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Beneficiary, BeneficiaryId, BeneficiaryStatus};
use domain::{AidDistribution, BeneficiaryApplication, ReviewDecision};
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{self, ApiResponse};
use crate::routes::{StatusFilter, parse_filter, parse_id};
use crate::state::AppState;

/// POST /api/beneficiaries: public application form.
#[tracing::instrument(skip(state, input))]
pub async fn apply<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(input): ApiJson<BeneficiaryApplication>,
) -> Result<(StatusCode, ApiResponse<Beneficiary>), ApiError> {
    let beneficiary = state.beneficiaries.apply(input).await?;
    Ok((
        StatusCode::CREATED,
        response::with_message("Application submitted successfully", beneficiary),
    ))
}

/// GET /api/beneficiaries?status=
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Query(filter): Query<StatusFilter>,
) -> Result<ApiResponse<Vec<Beneficiary>>, ApiError> {
    let status = parse_filter::<BeneficiaryStatus>(filter.status.as_deref(), "status")?;
    Ok(response::list(state.beneficiaries.list(&caller, status).await?))
}

/// GET /api/beneficiaries/{id}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<ApiResponse<Beneficiary>, ApiError> {
    let id: BeneficiaryId = parse_id(&id, "beneficiary")?;
    Ok(response::data(state.beneficiaries.get(&caller, id).await?))
}

/// PATCH /api/beneficiaries/{id}/review
#[tracing::instrument(skip(state, caller, decision), fields(user = %caller.user_id))]
pub async fn review<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    ApiJson(decision): ApiJson<ReviewDecision>,
) -> Result<ApiResponse<Beneficiary>, ApiError> {
    let id: BeneficiaryId = parse_id(&id, "beneficiary")?;
    Ok(response::data(
        state.beneficiaries.review(&caller, id, decision).await?,
    ))
}

/// PATCH /api/beneficiaries/{id}/distribute
#[tracing::instrument(skip(state, caller, distribution), fields(user = %caller.user_id))]
pub async fn distribute<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    ApiJson(distribution): ApiJson<AidDistribution>,
) -> Result<ApiResponse<Beneficiary>, ApiError> {
    let id: BeneficiaryId = parse_id(&id, "beneficiary")?;
    Ok(response::data(
        state
            .beneficiaries
            .distribute(&caller, id, distribution)
            .await?,
    ))
}
