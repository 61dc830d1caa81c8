//! # Web API Error Types
//!
//! Maps service outcomes onto HTTP responses. Every error body has the shape
//! `{"error": true, "message": "..."}`.

use crate::error::ServiceError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error. Please contact support.";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable. Please retry later.";

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request could not be extracted (bad path, query or body)
    #[error("Validation failed: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Conflict { .. } => StatusCode::CONFLICT,
                ServiceError::BusinessRuleViolation { .. } | ServiceError::Validation { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ServiceError::CircuitOpen { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if let ApiError::Service(ServiceError::CircuitOpen { retry_after, .. }) = &self {
            // Whole seconds, rounded up so clients never retry early
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let body = Json(json!({ "error": true, "message": UNAVAILABLE_MESSAGE }));
            return (
                status_code,
                [(header::RETRY_AFTER, HeaderValue::from(seconds))],
                body,
            )
                .into_response();
        }

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Unhandled error while serving request");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(json!({ "error": true, "message": message })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
