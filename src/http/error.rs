//! Error type for HTTP handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_with::skip_serializing_none;
use thiserror::Error;
use tracing::error;

use crate::intake::{FieldViolation, ValidationFailed};
use crate::pipeline::IntakeError;
use crate::records::{RecordKind, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("duplicate profile email")]
    DuplicateEmail,

    #[error("missing or invalid admin token")]
    Unauthorized,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => Self::NotFound(match kind {
                RecordKind::Lead => "Lead",
                RecordKind::Profile => "Profile",
            }),
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Validation(failed) => Self::Validation(failed),
            IntakeError::Store(store) => store.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    fields: Option<Vec<&'static str>>,
    violations: Option<Vec<FieldViolation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Storage and upstream details stay in the logs, never in the body.
        let status = self.status_code();
        let body = match self {
            Self::Validation(failed) => ErrorBody {
                detail: format!("Missing or invalid fields: {}", failed.fields().join(", ")),
                fields: Some(failed.fields()),
                violations: Some(failed.violations),
            },
            Self::BadRequest(reason) => ErrorBody {
                detail: format!("Invalid request: {reason}"),
                fields: None,
                violations: None,
            },
            Self::NotFound(what) => ErrorBody {
                detail: format!("{what} not found"),
                fields: None,
                violations: None,
            },
            Self::DuplicateEmail => ErrorBody {
                detail: "A profile with this email already exists".into(),
                fields: Some(vec!["email"]),
                violations: None,
            },
            Self::Unauthorized => ErrorBody {
                detail: "Not authenticated".into(),
                fields: None,
                violations: None,
            },
            Self::Unavailable(reason) => {
                error!(reason = %reason, "request failed on storage");
                ErrorBody {
                    detail: "Service temporarily unavailable, please retry shortly".into(),
                    fields: None,
                    violations: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
