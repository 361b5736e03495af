//! The [`EntitySchema`] trait: one type, one schema, two projected shapes.
//!
//! An entity type *is* the output shape: what a successful validation
//! produces after trimming, case folding, defaults and numeric
//! normalization. Its associated [`EntitySchema::Input`] is the shape
//! callers are expected to submit. Both come from the same definition, so
//! changing a rule never needs a separate type edit.
//!
//! ## Deriving vs Manual Implementation
//!
//! Entities are normally derived:
//!
//! ```rust
//! use recipe_schemas::EntitySchema;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(EntitySchema, Deserialize, Serialize)]
//! #[serde(rename_all = "camelCase")]
//! #[schema(message = "נדרש דירוג")]
//! pub struct Stars {
//!     #[schema(min(0, "דירוג חייב להיות לפחות 0"), max(5, "דירוג יכול להיות עד 5"))]
//!     pub rating: f64,
//! }
//!
//! let stars = Stars::validate(&json!({ "rating": 4 })).into_result().unwrap();
//! assert_eq!(stars.rating, 4.0);
//!
//! let errors = Stars::validate(&json!({ "rating": 7 })).errors().cloned().unwrap();
//! assert_eq!(errors.get("rating"), Some("דירוג יכול להיות עד 5"));
//!
//! let input = StarsInput { rating: 2.5 };
//! assert!(Stars::validate_input(&input).is_success());
//! ```
//!
//! A bare value such as an identifier can implement it by hand; see
//! `entities::ids`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::executor;
use crate::messages;
use crate::result::{FieldErrors, ValidationResult};
use crate::schema::Schema;

/// A type whose values are produced by validating untrusted input.
pub trait EntitySchema: Sized {
    /// The pre-validation shape. Fields with a default are optional here.
    type Input: Serialize + DeserializeOwned;

    /// The schema, built and verified once on first use.
    fn schema() -> &'static Schema;

    /// Type name used in the browser contract, e.g. `"Login"`.
    fn type_name() -> &'static str;

    /// Schema constant name used in the browser contract, e.g.
    /// `"LoginSchema"`.
    fn schema_name() -> &'static str;

    /// Validate untrusted input and convert the normalized output.
    fn validate(input: &Value) -> ValidationResult<Self>
    where
        Self: DeserializeOwned,
    {
        executor::validate_as::<Self>(input)
    }

    /// Validate an already-typed input value.
    fn validate_input(input: &Self::Input) -> ValidationResult<Self>
    where
        Self: DeserializeOwned,
    {
        match serde_json::to_value(input) {
            Ok(value) => Self::validate(&value),
            Err(err) => {
                error!(
                    entity = Self::schema_name(),
                    error = %err,
                    "Input value does not serialize"
                );
                ValidationResult::Failure(FieldErrors::root(messages::INTERNAL_ERROR))
            }
        }
    }
}

/// The input shape of an entity.
pub type InputOf<T> = <T as EntitySchema>::Input;
