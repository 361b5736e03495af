//! The validation result handed back to callers.
//!
//! On the wire a result is always the three-key object the browser form
//! layer expects:
//!
//! ```json
//! { "success": true,  "data": { "...": "..." }, "errors": null }
//! { "success": false, "data": null, "errors": { "email": "..." } }
//! ```

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error key for violations not attributable to a single field.
///
/// A leading underscore keeps it apart from every field name the entity
/// schemas declare.
pub const ROOT_ERROR_KEY: &str = "_root";

/// Field name → message, at most one message per field, in the order the
/// fields were first reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping with a single message under [`ROOT_ERROR_KEY`].
    pub fn root(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert_first(ROOT_ERROR_KEY, message);
        errors
    }

    /// Record `message` for `field` unless the field already has one.
    /// Returns whether the message was recorded.
    pub fn insert_first(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.entries.push((field, message.into()));
        true
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The schema-level message, if any.
    pub fn root_message(&self) -> Option<&str> {
        self.get(ROOT_ERROR_KEY)
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorsVisitor;

        impl<'de> Visitor<'de> for FieldErrorsVisitor {
            type Value = FieldErrors;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to messages")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldErrors, A::Error> {
                let mut errors = FieldErrors::new();
                while let Some((field, message)) = access.next_entry::<String, String>()? {
                    errors.insert_first(field, message);
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(FieldErrorsVisitor)
    }
}

/// The discriminated outcome of a validation: exactly one of normalized
/// data or a field→message mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Success(T),
    Failure(FieldErrors),
}

impl<T> ValidationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Success(_) => None,
            Self::Failure(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<T, FieldErrors> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(errors) => Err(errors),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            Self::Success(data) => ValidationResult::Success(f(data)),
            Self::Failure(errors) => ValidationResult::Failure(errors),
        }
    }
}

impl<T> From<ValidationResult<T>> for Result<T, FieldErrors> {
    fn from(result: ValidationResult<T>) -> Self {
        result.into_result()
    }
}

#[derive(Serialize)]
struct WireRef<'a, T> {
    success: bool,
    data: Option<&'a T>,
    errors: Option<&'a FieldErrors>,
}

#[derive(Deserialize)]
struct WireOwned<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

impl<T: Serialize> Serialize for ValidationResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRef {
            success: self.is_success(),
            data: self.data(),
            errors: self.errors(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ValidationResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOwned::<T>::deserialize(deserializer)?;
        match (wire.success, wire.data, wire.errors) {
            (true, Some(data), None) => Ok(Self::Success(data)),
            (false, None, Some(errors)) => Ok(Self::Failure(errors)),
            (success, _, _) => Err(de::Error::custom(format!(
                "inconsistent validation result (success = {})",
                success
            ))),
        }
    }
}
