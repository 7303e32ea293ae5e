use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use roomplan_db::StoreError;

/// Every failure a handler can surface. The `Display` text is the
/// caller-visible message; store details only ever reach the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required, please log in again")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Failed to save: a referenced record does not exist")]
    ForeignKeyViolation,

    #[error("Storage is currently unavailable")]
    StoreUnavailable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ForeignKeyViolation | ApiError::StoreUnavailable | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Not found"),
            StoreError::ForeignKeyViolation => {
                warn!("Write rejected by foreign key constraint");
                ApiError::ForeignKeyViolation
            }
            StoreError::UniqueViolation(detail) => {
                warn!("Write rejected by unique constraint: {}", detail);
                ApiError::Conflict("Record already exists")
            }
            StoreError::Unavailable(_) | StoreError::Driver(_) => {
                error!("Store failure: {}", err);
                ApiError::StoreUnavailable
            }
        }
    }
}

/// JSON body extractor whose failures come back as a 400 `{error}` body.
pub type ApiJson<T> = WithRejection<Json<T>, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::Validation("Expected a JSON request body".into())
            }
            _ => ApiError::Validation("Invalid request data".into()),
        }
    }
}

/// Gives a store `NotFound` a message naming what was missing.
pub(crate) trait NotFoundExt<T> {
    fn not_found(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> NotFoundExt<T> for Result<T, ApiError> {
    fn not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(message),
            other => other,
        })
    }
}
