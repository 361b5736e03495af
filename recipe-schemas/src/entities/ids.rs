//! Document identifiers: 24 hexadecimal characters.
//!
//! Identifiers are checked before they are used as lookup keys, so a
//! malformed value never reaches the store. These are bare strings rather
//! than objects and implement [`EntitySchema`] by hand.

use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::EntitySchema;
use crate::error::SchemaResult;
use crate::rules::{OBJECT_ID_PATTERN, StringRule};
use crate::schema::Schema;

fn object_id_schema(schema_name: &str, message: &str) -> Schema {
    let build = || -> SchemaResult<Schema> {
        let schema = Schema::from(StringRule::new().pattern(OBJECT_ID_PATTERN, message)?);
        schema.verify()?;
        Ok(schema)
    };
    match build() {
        Ok(schema) => schema,
        Err(err) => panic!("invalid schema `{schema_name}`: {err}"),
    }
}

/// Identifier of a recipe, as taken from a URL segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl EntitySchema for RecipeId {
    type Input = String;

    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> =
            LazyLock::new(|| object_id_schema("RecipeIdSchema", "מזהה מתכון לא תקין"));
        &SCHEMA
    }

    fn type_name() -> &'static str {
        "RecipeId"
    }

    fn schema_name() -> &'static str {
        "RecipeIdSchema"
    }
}

/// Identifier of a user, as stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl EntitySchema for UserId {
    type Input = String;

    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> =
            LazyLock::new(|| object_id_schema("UserIdSchema", "מזהה משתמש לא תקין"));
        &SCHEMA
    }

    fn type_name() -> &'static str {
        "UserId"
    }

    fn schema_name() -> &'static str {
        "UserIdSchema"
    }
}

macro_rules! impl_id_traits {
    ($($ty:ident),*) => {$(
        impl Deref for $ty {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

impl_id_traits!(RecipeId, UserId);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_id_accepts_hex() {
        let result = RecipeId::validate(&json!("507f1f77bcf86cd799439011"));
        assert_eq!(result.data().map(RecipeId::as_str), Some("507f1f77bcf86cd799439011"));
    }

    #[test]
    fn test_recipe_id_rejects_malformed() {
        let result = RecipeId::validate(&json!("not-a-hex-id"));
        let errors = result.errors().unwrap();
        assert_eq!(errors.root_message(), Some("מזהה מתכון לא תקין"));
    }

    #[test]
    fn test_recipe_id_rejects_wrong_length() {
        assert!(!RecipeId::validate(&json!("507f1f77bcf86cd79943901")).is_success());
        assert!(!RecipeId::validate(&json!("507f1f77bcf86cd7994390111")).is_success());
    }

    #[test]
    fn test_user_id_display() {
        let id = UserId::validate(&json!("507F1F77BCF86CD799439011"))
            .into_result()
            .unwrap();
        assert_eq!(id.to_string(), "507F1F77BCF86CD799439011");
        assert_eq!(id.len(), 24);
    }
}
