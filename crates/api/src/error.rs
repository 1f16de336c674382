//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use reporting::ReportError;
use serde_json::json;
use workflow::WorkflowError;

const SERVER_ERROR: &str = "Server error";

/// API-level error type that maps to HTTP responses.
///
/// Every error body is `{"success": false, "message": ...}`; a declined
/// payment also carries the failed `donation`.
#[derive(Debug)]
pub enum ApiError {
    /// Identity headers are missing or malformed.
    Unauthorized(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Donation workflow error.
    Workflow(WorkflowError),
    /// Reporting or document error.
    Report(ReportError),
    /// Internal server error.
    Internal(String),
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({ "success": false, "message": message.into() });
    (status, Json(body)).into_response()
}

fn internal(err: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %err, "internal server error");
    message(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(msg) => message(StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Workflow(err) => workflow_error_to_response(err),
            ApiError::Report(err) => report_error_to_response(err),
            ApiError::Internal(msg) => internal(&msg),
        }
    }
}

fn domain_error_to_response(err: DomainError) -> Response {
    match &err {
        DomainError::NotFound { .. } => message(StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Validation(_) | DomainError::InvalidStateTransition { .. } => {
            message(StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::AccessDenied(_) => message(StatusCode::FORBIDDEN, err.to_string()),
        DomainError::Store(_) => internal(&err),
    }
}

fn workflow_error_to_response(err: WorkflowError) -> Response {
    match err {
        WorkflowError::Validation(msg) => message(StatusCode::BAD_REQUEST, msg),
        WorkflowError::CampaignNotFound(_) => message(StatusCode::NOT_FOUND, err.to_string()),
        WorkflowError::PaymentDeclined { donation, reason } => {
            let body = json!({ "success": false, "message": reason, "donation": donation });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        WorkflowError::Domain(err) => domain_error_to_response(err),
        WorkflowError::PaymentGateway(_)
        | WorkflowError::Delivery(_)
        | WorkflowError::InvalidTransition { .. } => internal(&err),
    }
}

fn report_error_to_response(err: ReportError) -> Response {
    match err {
        ReportError::Domain(err) => domain_error_to_response(err),
        ReportError::Delivery(_) => internal(&err),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Report(err)
    }
}
