//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::BillingError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Present on 503s: the same request may succeed if repeated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, retryable) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
                None,
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            ApiError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                msg.clone(),
                Some(true),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match &err {
            BillingError::InvalidState { .. } => ApiError::Conflict(err.to_string()),
            BillingError::Edi(_)
            | BillingError::InvalidAmount { .. }
            | BillingError::UnknownDenialCode { .. } => ApiError::Validation(err.to_string()),
            BillingError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            BillingError::Transport { .. } => ApiError::Unavailable(err.to_string()),
            BillingError::Store(store) if store.is_transient() => {
                ApiError::Unavailable(err.to_string())
            }
            BillingError::Store(domain_claims::StoreError::NotFound { .. }) => {
                ApiError::NotFound(err.to_string())
            }
            BillingError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<domain_claims::StoreError> for ApiError {
    fn from(err: domain_claims::StoreError) -> Self {
        ApiError::from(BillingError::Store(err))
    }
}
