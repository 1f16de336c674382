//! Dashboard and period reports.

use std::sync::Arc;

use axum::extract::{Query, State};
use reporting::{Dashboard, PeriodReport, ReportPeriod};
use serde::Deserialize;
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};
use crate::routes::parse_filter;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// GET /api/analytics/dashboard
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn dashboard<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Dashboard>, ApiError> {
    Ok(response::data(state.analytics.dashboard(&caller).await?))
}

/// GET /api/analytics/reports?period=weekly|monthly
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn reports<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Query(query): Query<PeriodQuery>,
) -> Result<ApiResponse<PeriodReport>, ApiError> {
    let period =
        parse_filter::<ReportPeriod>(query.period.as_deref(), "period")?.unwrap_or_default();
    Ok(response::data(state.analytics.report(&caller, period).await?))
}
