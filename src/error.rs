use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::doc_processor::ExtractError;
use crate::llm::LlmError;

/// Errors surfaced by the chat and upload handlers.
///
/// Status codes are assigned only in `IntoResponse`; the detail carries the
/// raw cause.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Missing API Key")]
    MissingCredentials,
    #[error("Invalid API Key")]
    Unauthorized,
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("missing form field: {0}")]
    MissingField(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::MissingCredentials
            | ServiceError::UnsupportedFormat(_)
            | ServiceError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {detail}");
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {detail}");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<LlmError> for ServiceError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Unauthorized => ServiceError::Unauthorized,
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<ExtractError> for ServiceError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedFormat(_) => ServiceError::UnsupportedFormat(e.to_string()),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Upstream(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServiceError::Upstream(format!("extraction task failed: {e}"))
    }
}

impl From<axum::extract::multipart::MultipartError> for ServiceError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ServiceError::BadRequest(e.body_text())
    }
}
