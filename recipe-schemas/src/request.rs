//! Server-side request helpers.
//!
//! Handlers never interpret schemas themselves: they hand the body or a
//! path segment to one of these helpers and get either the normalized
//! entity or an [`ApiError`] ready to be written as the response.
//!
//! - `parse_body`: size guard, then [`EntitySchema::validate`]. A failure
//!   becomes a 400 whose body echoes the field→message mapping.
//! - `parse_recipe_id`: path identifier, 400 when malformed.
//! - `parse_session`: session cookie to user id, 401 when missing or
//!   malformed.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ValidatorConfig;
use crate::entities::{RecipeId, UserId};
use crate::error::{ApiError, ApiResult};
use crate::messages;
use crate::result::ValidationResult;
use crate::traits::EntitySchema;

/// Reject bodies larger than the configured maximum.
///
/// Scalars and empty containers are sized without serializing; anything
/// else is measured exactly.
///
/// # Errors
///
/// Returns `ApiError::payload_too_large` if the input exceeds the configured maximum size.
pub fn check_input_size(input: &Value, config: &ValidatorConfig) -> ApiResult<()> {
    let estimated_size = match input {
        Value::Null => 4,
        Value::Bool(_) => 5,
        Value::Number(_) => 20,
        Value::String(s) => s.len() + 2,
        Value::Array(arr) if arr.is_empty() => 2,
        Value::Object(obj) if obj.is_empty() => 2,
        _ => {
            let size = serde_json::to_vec(input)?.len();
            if size > config.max_input_size {
                return Err(ApiError::payload_too_large(format!(
                    "Input size {} bytes exceeds maximum {} bytes",
                    size, config.max_input_size
                )));
            }
            return Ok(());
        }
    };

    if estimated_size > config.max_input_size {
        return Err(ApiError::payload_too_large(format!(
            "Input size ~{} bytes exceeds maximum {} bytes",
            estimated_size, config.max_input_size
        )));
    }

    Ok(())
}

/// Validate a request body as entity `T`.
///
/// # Example
/// ```rust
/// use recipe_schemas::entities::Login;
/// use recipe_schemas::request::parse_body;
/// use recipe_schemas::ValidatorConfig;
/// use serde_json::json;
///
/// let config = ValidatorConfig::default();
/// let login: Login = parse_body(&json!({ "email": " Dana@Example.com ", "password": "x" }), &config)
///     .unwrap();
/// assert_eq!(login.email, "dana@example.com");
///
/// let err = parse_body::<Login>(&json!({ "email": "dana@example.com", "password": "" }), &config)
///     .unwrap_err();
/// assert_eq!(err.status(), 400);
/// assert_eq!(err.body()["errors"]["password"], "נדרשת סיסמה");
/// ```
pub fn parse_body<T>(input: &Value, config: &ValidatorConfig) -> ApiResult<T>
where
    T: EntitySchema + DeserializeOwned,
{
    check_input_size(input, config)?;

    match T::validate(input) {
        ValidationResult::Success(data) => Ok(data),
        ValidationResult::Failure(errors) => {
            if config.log_rejections {
                debug!(
                    entity = T::schema_name(),
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "Rejected request body"
                );
            }
            Err(ApiError::validation_failed(errors))
        }
    }
}

/// Validate a recipe identifier taken from the URL.
pub fn parse_recipe_id(raw: &str) -> ApiResult<RecipeId> {
    match RecipeId::validate(&Value::from(raw)) {
        ValidationResult::Success(id) => Ok(id),
        ValidationResult::Failure(errors) => {
            let message = errors
                .root_message()
                .unwrap_or(messages::INVALID_OPTION)
                .to_string();
            Err(ApiError::bad_request(message))
        }
    }
}

/// Resolve the session cookie to a user identifier.
pub fn parse_session(cookie: Option<&str>) -> ApiResult<UserId> {
    let Some(raw) = cookie.filter(|raw| !raw.is_empty()) else {
        return Err(ApiError::unauthorized(messages::NOT_LOGGED_IN));
    };

    match UserId::validate(&Value::from(raw)) {
        ValidationResult::Success(id) => Ok(id),
        ValidationResult::Failure(_) => {
            warn!(length = raw.len(), "Session cookie does not hold a user id");
            Err(ApiError::unauthorized(messages::INVALID_SESSION))
        }
    }
}
