//! Webhook error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors that end a webhook request early.
///
/// Each variant maps to a status code and a JSON body of the form `{"error": "..."}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// Missing or wrong bearer secret
    #[error("Unauthorized")]
    Unauthorized,

    /// Body is not JSON or lacks required fields
    #[error("{0}")]
    BadRequest(String),
}

impl WebhookError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
