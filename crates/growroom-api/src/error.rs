use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use growroom_db::DbError;
use growroom_types::api::ErrorBody;

/// Every failure a service or handler can report. Each request fails on its
/// own; nothing here is retried or brings the server down.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required field.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, or a missing, invalid or expired bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The verified caller does not own the addressed resource.
    #[error("{0}")]
    Forbidden(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A unique field is taken, or a delete is blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),

    /// Storage or runtime failure. The cause is logged, never sent to the client.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!(
            "You need to specify the request body as a json object: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(cause) => {
                error!("Internal error: {}", cause);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            message,
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
