//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the application and API layers returns
//! [`AppError`]. Each variant maps to one stable machine-readable error code
//! and one HTTP status, so handlers never match on message strings.
//!
//! # JSON body
//!
//! ```json
//! {
//!   "error": {
//!     "code": "code_in_use",
//!     "message": "This short code is already in use. Choose another one",
//!     "details": { "short_code": "abc123" }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error description used in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Destination URL is not an absolute `http(s)://` URL.
    #[error("{message}")]
    InvalidFormat { message: String, details: Value },

    /// Destination URL answered the probe with a redirect status.
    #[error("{message}")]
    IsRedirectTarget { message: String, details: Value },

    /// Caller-supplied short code already belongs to another link.
    #[error("{message}")]
    CodeInUse { message: String, details: Value },

    /// Every generated candidate collided with an existing code.
    #[error("{message}")]
    ExhaustedRetries { message: String, details: Value },

    /// Malformed request body or short code.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The store could not be reached or did not answer in time.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_format(details: Value) -> Self {
        Self::InvalidFormat {
            message: "Invalid URL. Use the http:// or https:// format".to_string(),
            details,
        }
    }

    pub fn is_redirect(details: Value) -> Self {
        Self::IsRedirectTarget {
            message: "The URL is a redirect. Shortening redirects is not allowed".to_string(),
            details,
        }
    }

    pub fn code_in_use(short_code: &str) -> Self {
        Self::CodeInUse {
            message: "This short code is already in use. Choose another one".to_string(),
            details: json!({ "short_code": short_code }),
        }
    }

    pub fn exhausted_retries(attempts: u32) -> Self {
        Self::ExhaustedRetries {
            message: "Failed to generate a unique short code".to_string(),
            details: json!({ "attempts": attempts }),
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "invalid_format",
            Self::IsRedirectTarget { .. } => "is_redirect",
            Self::CodeInUse { .. } => "code_in_use",
            Self::ExhaustedRetries { .. } => "exhausted_retries",
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFormat { .. }
            | Self::IsRedirectTarget { .. }
            | Self::CodeInUse { .. }
            | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ExhaustedRetries { .. }
            | Self::StoreUnavailable { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> &Value {
        match self {
            Self::InvalidFormat { details, .. }
            | Self::IsRedirectTarget { details, .. }
            | Self::CodeInUse { details, .. }
            | Self::ExhaustedRetries { details, .. }
            | Self::Validation { details, .. }
            | Self::NotFound { details, .. }
            | Self::StoreUnavailable { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, details = %self.details(), "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniquenessViolation { constraint } => AppError::internal(
                "Unexpected unique constraint violation",
                json!({ "constraint": constraint }),
            ),
            StoreError::Unavailable(reason) => {
                AppError::store_unavailable("Store unavailable", json!({ "reason": reason }))
            }
            StoreError::Timeout(after) => AppError::store_unavailable(
                "Store operation timed out",
                json!({ "timeout_ms": after.as_millis() as u64 }),
            ),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_codes_and_statuses() {
        let cases = [
            (AppError::invalid_format(json!({})), "invalid_format", 400),
            (AppError::is_redirect(json!({})), "is_redirect", 400),
            (AppError::code_in_use("abc123"), "code_in_use", 400),
            (AppError::exhausted_retries(5), "exhausted_retries", 500),
            (AppError::not_found("gone", json!({})), "not_found", 404),
            (
                AppError::store_unavailable("down", json!({})),
                "store_unavailable",
                500,
            ),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status().as_u16(), status);
        }
    }

    #[test]
    fn test_code_in_use_details() {
        let info = AppError::code_in_use("abc123").to_error_info();
        assert_eq!(info.code, "code_in_use");
        assert_eq!(info.details["short_code"], "abc123");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AppError = StoreError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));

        let err: AppError = StoreError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
        assert_eq!(err.to_error_info().details["timeout_ms"], 5000);

        let err: AppError = StoreError::UniquenessViolation {
            constraint: "links_short_code_key".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
