use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

use super::StorageError;

#[derive(Debug, ThisError)]
pub enum WishlistError {
    /// Client input is missing or malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Admin password did not match.
    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Entry already present by catalog id or external id.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required server-side secret is absent.
    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(&'static str),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl WishlistError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WishlistError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WishlistError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WishlistError::Forbidden => StatusCode::FORBIDDEN,
            WishlistError::NotFound(_) => StatusCode::NOT_FOUND,
            WishlistError::Conflict(_) => StatusCode::CONFLICT,
            WishlistError::UpstreamStatus(_) | WishlistError::ReqwestError(_) => {
                StatusCode::BAD_GATEWAY
            }
            WishlistError::ServerMisconfigured(_) | WishlistError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for WishlistError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(e) => {
                WishlistError::BadRequest(format!("Failed to read request body: {e}"))
            }
            JsonRejection::MissingJsonContentType(_) => {
                WishlistError::bad_request("A JSON request body is required.")
            }
            other => {
                WishlistError::BadRequest(format!("Invalid request body: {}", other.body_text()))
            }
        }
    }
}

impl From<QueryRejection> for WishlistError {
    fn from(rejection: QueryRejection) -> Self {
        WishlistError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for WishlistError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            WishlistError::BadRequest(message) => {
                tracing::warn!(status = %status, message = %message, "Request rejected");
                ApiErrorBody::new("BAD_REQUEST", message.clone())
            }
            WishlistError::Forbidden => {
                tracing::warn!(status = %status, "Admin password mismatch");
                ApiErrorBody::new("FORBIDDEN", "Incorrect admin password.")
            }
            WishlistError::NotFound(message) => ApiErrorBody::new("NOT_FOUND", message.clone()),
            WishlistError::Conflict(message) => ApiErrorBody::new("CONFLICT", message.clone()),
            WishlistError::ServerMisconfigured(what) => {
                tracing::error!(missing = %what, "Server misconfigured");
                ApiErrorBody::new(
                    "SERVER_MISCONFIGURED",
                    format!("{what} is not configured on the server."),
                )
            }
            WishlistError::UpstreamStatus(code) => {
                tracing::warn!(upstream_status = %code, "Catalog upstream returned an error");
                ApiErrorBody::new(
                    "UPSTREAM_ERROR",
                    "Failed to reach the catalog. Please try again later.",
                )
            }
            WishlistError::ReqwestError(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "Catalog request failed");
                ApiErrorBody::new(
                    "UPSTREAM_ERROR",
                    "Failed to reach the catalog. Please try again later.",
                )
            }
            WishlistError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                ApiErrorBody::new("STORAGE_ERROR", "Unable to access the wishlist storage.")
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Error response payload. `message` sits at the top level where existing clients read it.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
