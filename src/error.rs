//! Error taxonomy for the HTTP API.
//!
//! Every error renders as `{"message": ...}` with the matching status code.
//! Store failures are logged server-side and surface only a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid request field - 400.
    #[error("{0}")]
    Validation(String),

    /// Unresolvable identifier - 404.
    #[error("{0}")]
    NotFound(&'static str),

    /// Duplicate unique field - 409.
    #[error("{0}")]
    Conflict(&'static str),

    /// Known user, bad password. Distinct from the 404 unknown-user case.
    #[error("Wrong password or username")]
    WrongCredentials,

    /// Store failure - 500.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything else unexpected (e.g. hashing/signing failures) - 500.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.to_string()),
            ApiError::WrongCredentials => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(_) | ApiError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
