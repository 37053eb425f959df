//! Response types for the payroll API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidPolicy { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("POLICY_ERROR", "Payroll policy is invalid", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "Periods need YYYY-MM-DD dates with the start on or before the end",
                ),
            ),
            EngineError::InvalidEmployee { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_EMPLOYEE", message),
            ),
            EngineError::InvalidOvertime { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_OVERTIME", message),
            ),
            EngineError::InvalidLoan { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_LOAN", message))
            }
            EngineError::UnsupportedTaxBracket { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "UNSUPPORTED_TAX_BRACKET",
                    message,
                    "The configured tax table has no bracket for this income",
                ),
            ),
            EngineError::InvalidStatusTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "INVALID_STATUS_TRANSITION",
                    message,
                    "Payroll records move forward only: draft, pending, paid",
                ),
            ),
            EngineError::RecordNotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
        };

        ApiErrorResponse { status, error }
    }
}
