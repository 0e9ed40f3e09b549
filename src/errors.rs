use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the chat pipeline, tagged by the stage that failed.
///
/// Validation problems carry their message back to the client; upstream
/// failures are logged in full server-side and answered with a generic
/// per-stage payload.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("completion failed: {0}")]
    Completion(String),
    #[error("stream interrupted: {0}")]
    Stream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Embedding(msg) => {
                tracing::error!(stage = "embedding", "{}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error creating embedding".to_string(),
                )
            }
            ApiError::Retrieval(msg) => {
                tracing::error!(stage = "retrieval", "{}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error querying index".to_string(),
                )
            }
            ApiError::Completion(msg) | ApiError::Stream(msg) => {
                tracing::error!(stage = "completion", "{}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating completion".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("{}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
