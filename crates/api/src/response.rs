//! Success envelope shared by every JSON endpoint.

use axum::Json;
use serde::Serialize;

/// `{success, message?, count?, data?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResponse<T> = Json<Envelope<T>>;

pub fn data<T: Serialize>(data: T) -> ApiResponse<T> {
    Json(Envelope {
        success: true,
        message: None,
        count: None,
        data: Some(data),
    })
}

pub fn list<T: Serialize>(items: Vec<T>) -> ApiResponse<Vec<T>> {
    Json(Envelope {
        success: true,
        message: None,
        count: Some(items.len()),
        data: Some(items),
    })
}

pub fn with_message<T: Serialize>(message: impl Into<String>, data: T) -> ApiResponse<T> {
    Json(Envelope {
        success: true,
        message: Some(message.into()),
        count: None,
        data: Some(data),
    })
}

pub fn message(message: impl Into<String>) -> ApiResponse<()> {
    Json(Envelope {
        success: true,
        message: Some(message.into()),
        count: None,
        data: None,
    })
}
