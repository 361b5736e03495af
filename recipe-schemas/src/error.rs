//! Error types.
//!
//! Two families live here:
//!
//! - [`SchemaError`]: a schema *definition* is malformed. This is a
//!   programmer error; entity schemas verify themselves once when first
//!   built and abort loudly if this ever happens.
//! - [`ApiError`]: what a request handler answers with when the input it
//!   received is rejected. Malformed input is never a `SchemaError`.
//!
//! # Example
//! ```rust
//! use recipe_schemas::{ApiError, ApiErrorCode};
//!
//! let error = ApiError::new(ApiErrorCode::NotFound, "Recipe not found");
//! assert_eq!(error.status(), 404);
//!
//! let error = ApiError::unauthorized("Not logged in"); // Convenience method
//! assert_eq!(error.status(), 401);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::messages;
use crate::result::FieldErrors;

/// A schema definition that can never validate anything correctly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{path}: lower bound {lower} is greater than upper bound {upper}")]
    InvalidBounds { path: String, lower: f64, upper: f64 },

    #[error("{path}: field `{key}` is declared more than once")]
    DuplicateField { path: String, key: String },

    #[error("{path}: picklist has no options")]
    EmptyPicklist { path: String },

    #[error("{path}: default value does not satisfy its own rule ({message})")]
    InvalidDefault { path: String, message: String },

    #[error("{path}: cross-field check refers to unknown field `{key}`")]
    UnknownField { path: String, key: String },

    #[error("{path}: {operation} requires an object schema")]
    NotAnObject { path: String, operation: &'static str },
}

/// Result type alias for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error codes a request handler can answer with.
///
/// Serialized as SCREAMING_SNAKE_CASE (e.g. `NotFound` becomes
/// `"NOT_FOUND"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ApiErrorCode {
    // Client errors
    /// The request was malformed
    BadRequest,
    /// Input validation failed
    ValidationError,
    /// No valid session
    Unauthorized,
    /// The session lacks permission
    Forbidden,
    /// The requested resource was not found
    NotFound,
    /// The request conflicts with current state
    Conflict,
    /// The request payload exceeds size limits
    PayloadTooLarge,

    // Server errors
    /// An unexpected internal error occurred
    InternalError,
}

impl ApiErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest | Self::ValidationError => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::PayloadTooLarge => 413,
            Self::InternalError => 500,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rejected request.
///
/// Validation failures carry the field→message mapping unchanged in
/// `errors`, so the response body echoes it verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct ApiError {
    /// Type-safe error code
    pub code: ApiErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Per-field messages for validation failures
    #[serde(default)]
    pub errors: Option<FieldErrors>,
    /// Optional additional details (JSON value)
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new error with code and message.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        self.code.status()
    }

    /// Strip internal information from server errors before they leave the
    /// process.
    pub fn sanitize(mut self) -> Self {
        if self.code.is_server_error() {
            debug!(
                original_message = %self.message,
                "Sanitizing internal error for client response"
            );
            self.message = messages::INTERNAL_ERROR_PUBLIC.to_string();
            self.details = None;
        }
        self
    }

    /// The JSON response body: `{ "message": .., "errors": {..} }`, where
    /// `errors` is only present for validation failures.
    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("message".into(), self.message.clone().into());
        if let Some(errors) = &self.errors {
            body.insert(
                "errors".into(),
                serde_json::to_value(errors).unwrap_or_default(),
            );
        }
        serde_json::Value::Object(body)
    }

    // Convenience constructors

    /// A VALIDATION_ERROR carrying the field→message mapping.
    pub fn validation_failed(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(ApiErrorCode::ValidationError, messages::VALIDATION_ERROR)
        }
    }

    /// Create a BAD_REQUEST error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }

    /// Create an UNAUTHORIZED error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Unauthorized, message)
    }

    /// Create a FORBIDDEN error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Forbidden, message)
    }

    /// Create a NOT_FOUND error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    /// Create a CONFLICT error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Conflict, message)
    }

    /// Create a PAYLOAD_TOO_LARGE error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::PayloadTooLarge, message)
    }

    /// Create an INTERNAL_ERROR error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(format!("JSON error: {}", err))
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ApiError", 4)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;

        if let Some(ref errors) = self.errors {
            state.serialize_field("errors", errors)?;
        }

        if let Some(ref details) = self.details {
            state.serialize_field("details", details)?;
        }

        state.end()
    }
}

/// Result type alias for request handling.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorCode::ValidationError.status(), 400);
        assert_eq!(ApiErrorCode::BadRequest.status(), 400);
        assert_eq!(ApiErrorCode::Unauthorized.status(), 401);
        assert_eq!(ApiErrorCode::PayloadTooLarge.status(), 413);
        assert_eq!(ApiErrorCode::InternalError.status(), 500);
        assert!(ApiErrorCode::Forbidden.is_client_error());
        assert!(ApiErrorCode::InternalError.is_server_error());
    }

    #[test]
    fn test_code_serialization() {
        let json = serde_json::to_string(&ApiErrorCode::PayloadTooLarge).unwrap();
        assert_eq!(json, "\"PAYLOAD_TOO_LARGE\"");
        assert_eq!(ApiErrorCode::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn test_validation_body_echoes_errors() {
        let mut errors = FieldErrors::new();
        errors.insert_first("email", "כתובת אימייל לא תקינה");
        let error = ApiError::validation_failed(errors);

        assert_eq!(error.status(), 400);
        assert_eq!(
            error.body(),
            serde_json::json!({
                "message": "Validation error",
                "errors": { "email": "כתובת אימייל לא תקינה" }
            })
        );
    }

    #[test]
    fn test_plain_body_has_no_errors_key() {
        let error = ApiError::unauthorized("Not logged in");
        assert_eq!(error.body(), serde_json::json!({ "message": "Not logged in" }));
        assert_eq!(error.to_string(), "[UNAUTHORIZED] Not logged in");
    }

    #[test]
    fn test_sanitize_only_touches_server_errors() {
        let internal = ApiError::internal("db pool exhausted").with_details("pool=4");
        let sanitized = internal.sanitize();
        assert_eq!(sanitized.message, "An internal error occurred");
        assert!(sanitized.details.is_none());

        let client = ApiError::not_found("Recipe not found").sanitize();
        assert_eq!(client.message, "Recipe not found");
    }

    #[test]
    fn test_serialize_skips_empty_parts() {
        let json = serde_json::to_value(ApiError::forbidden("Admins only")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "FORBIDDEN", "message": "Admins only" })
        );
    }
}
