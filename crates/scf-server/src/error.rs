//! HTTP error mapping.
//!
//! Every error body is `{"error": "<message>"}`. Storage failures are logged
//! here and answered with a generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scf_db::error::BootstrapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Logged with its source; the client sees a generic message.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BootstrapError> for ApiError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::Validation(msg) => Self::BadRequest(msg),
            BootstrapError::OrganizationNotFound(_) => {
                Self::NotFound("organization not found".to_string())
            }
            BootstrapError::ProjectNotFound(_) => Self::NotFound("project not found".to_string()),
            BootstrapError::DocumentNotFound(_) => {
                Self::NotFound("document not found".to_string())
            }
            BootstrapError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal(source) => tracing::error!(error = %source, "request failed"),
            Self::BadRequest(msg) => tracing::debug!(%msg, "rejected request"),
            Self::NotFound(_) => {}
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
