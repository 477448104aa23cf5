//! JSON error bodies for the registration API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::{FieldErrors, StorageError};

/// Error body: `{ error, details?, code?, fields? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: error.into(),
                details: None,
                code: None,
                fields: None,
            },
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.response.details = Some(details.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.code = Some(code.into());
        self
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.response.fields = Some(fields);
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, error)
    }

    /// Storage failure under the operation's headline, e.g. "Signup failed".
    ///
    /// Connection errors are 503, everything else 500. The `code` lets
    /// clients recover the storage error kind.
    pub fn storage(context: &str, err: StorageError) -> Self {
        let api_error = match &err {
            StorageError::Connection { message } => {
                warn!(error = %message, "{}: storage unreachable", context);
                Self::unavailable(context)
            }
            StorageError::DuplicateKey { message } => {
                warn!(error = %message, "{}: duplicate key", context);
                Self::internal(context)
            }
            StorageError::Unknown { message } => {
                error!(error = %message, "{}", context);
                Self::internal(context)
            }
        };

        api_error.with_details(err.message()).with_code(err.code())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::bad_request("Validation failed")
            .with_details(errors.to_string())
            .with_code("validation")
            .with_fields(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.response.details {
            Some(details) => write!(f, "{}: {}", self.response.error, details),
            None => write!(f, "{}", self.response.error),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_status_mapping() {
        let duplicate = ApiError::storage("Signup failed", StorageError::duplicate_key("taken"));
        assert_eq!(duplicate.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(duplicate.response.code.as_deref(), Some("duplicate_key"));

        let connection = ApiError::storage("Signup failed", StorageError::connection("down"));
        assert_eq!(connection.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(connection.response.code.as_deref(), Some("connection"));

        let unknown = ApiError::storage("Signup failed", StorageError::unknown("boom"));
        assert_eq!(unknown.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unknown.response.code.as_deref(), Some("storage"));
    }

    #[test]
    fn test_storage_body_shape() {
        let err = ApiError::storage("Failed to add employee", StorageError::unknown("boom"));
        let body = serde_json::to_value(&err.response).unwrap();

        assert_eq!(
            body,
            json!({"error": "Failed to add employee", "details": "boom", "code": "storage"})
        );
    }

    #[test]
    fn test_field_errors_conversion() {
        let mut errors = FieldErrors::new();
        errors.insert("phone", "Invalid phone number");

        let err = ApiError::from(errors);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(&err.response).unwrap();
        assert_eq!(body["fields"]["phone"], "Invalid phone number");
        assert_eq!(body["details"], "phone: Invalid phone number");
    }

    #[test]
    fn test_display() {
        let err = ApiError::internal("Signin failed").with_details("boom");
        assert_eq!(err.to_string(), "Signin failed: boom");
        assert_eq!(ApiError::bad_request("nope").to_string(), "nope");
    }
}
