//! PDF receipts and certificates served as attachments.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use common::{DonationId, TaskId};
use reporting::Document;
use store::Store;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::state::AppState;

fn attachment(document: Document) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

/// GET /api/pdf/receipt/{donationId}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn receipt<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: DonationId = parse_id(&id, "donation")?;
    Ok(attachment(state.documents.receipt(&caller, id).await?))
}

/// GET /api/pdf/certificate/{taskId}
#[tracing::instrument(skip(state, caller), fields(user = %caller.user_id))]
pub async fn certificate<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    Ok(attachment(state.documents.certificate(&caller, id).await?))
}
