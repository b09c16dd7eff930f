//! Request-boundary error taxonomy.
//!
//! Every handler failure is one of four kinds, each mapped to a single
//! HTTP status and rendered as a `{"success": false, "message": ...}`
//! envelope. Storage failures are logged with their cause but reach the
//! client as an opaque internal error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::ZoneError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request was well-formed JSON but semantically invalid.
    #[error("{0}")]
    Invalid(String),
    /// The request collides with existing state, e.g. a duplicate name.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Collapse validator output into one client-facing message.
    pub fn from_validation(errors: ValidationErrors) -> Self {
        let message = first_message(&errors).unwrap_or_else(|| errors.to_string());
        Self::Invalid(message)
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Walk nested validation errors until a declared message turns up.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(message) = list.iter().find_map(|err| err.message.as_ref()) {
                    return Some(message.to_string());
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(message) = first_message(inner) {
                    return Some(message);
                }
            }
            ValidationErrorsKind::List(map) => {
                for inner in map.values() {
                    if let Some(message) = first_message(inner) {
                        return Some(message);
                    }
                }
            }
        }
    }
    None
}

impl From<ZoneError> for ApiError {
    fn from(err: ZoneError) -> Self {
        match err {
            ZoneError::DuplicateSubCounty | ZoneError::DuplicateLocation => {
                Self::Conflict(err.to_string())
            }
            ZoneError::SubCountyNotFound | ZoneError::LocationNotFound => {
                Self::NotFound(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
