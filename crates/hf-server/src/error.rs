//! XRPC-style JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hf_core::FeedError;
use serde_json::json;

/// API error with status code, XRPC error name and message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(code: &'static str, msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code, message: msg.into() }
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, code: "NotFound", message: msg.into() }
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, code: "InternalServerError", message: msg.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match &err {
            FeedError::InvalidCursor(_) => ApiError::bad_request("InvalidCursor", err.to_string()),
            FeedError::UnknownFeed(_) => ApiError::bad_request("UnsupportedAlgorithm", err.to_string()),
            _ => {
                tracing::error!(error = %err, "request failed");
                ApiError::internal("internal error")
            }
        }
    }
}
