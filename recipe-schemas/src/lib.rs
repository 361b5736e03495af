//! # recipe-schemas
//!
//! One definition per input shape, enforced identically in the browser and
//! on the server.
//!
//! Each operation the application accepts (registration, login, recipe
//! creation and update, rating) is declared once as an entity. From that
//! declaration come the schema data the executor walks, the input and
//! output types, and the valibot module the browser form layer imports.
//!
//! ## Quick Start
//!
//! ```rust
//! use recipe_schemas::entities::Login;
//! use recipe_schemas::EntitySchema;
//! use serde_json::json;
//!
//! let result = Login::validate(&json!({ "email": " Test@Test.com ", "password": "" }));
//! let errors = result.errors().unwrap();
//! assert_eq!(errors.get("password"), Some("נדרשת סיסמה"));
//! assert!(!errors.contains("email"));
//! ```
//!
//! ## Validation Result
//!
//! [`ValidationResult`] is either the normalized entity or a mapping from
//! field name to one message. On the wire:
//!
//! ```text
//! { "success": true,  "data": { .. }, "errors": null }
//! { "success": false, "data": null,   "errors": { "password": "נדרשת סיסמה" } }
//! ```
//!
//! A failure not attributable to any field is reported under
//! [`ROOT_ERROR_KEY`] (`"_root"`).
//!
//! ## Declaring Entities
//!
//! ```rust
//! use recipe_schemas::EntitySchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize, EntitySchema)]
//! #[serde(rename_all = "camelCase")]
//! #[schema(message = "details required", partial = "UpdateNote")]
//! pub struct CreateNote {
//!     #[schema(trim, min_length(2, "title too short"), max_length(200, "title too long"))]
//!     pub title: String,
//!
//!     #[schema(int("whole stars only"), min(1, "at least 1"), max(5, "at most 5"))]
//!     pub stars: i64,
//!
//!     #[schema(default = false)]
//!     pub pinned: bool,
//! }
//!
//! // `CreateNoteInput` is the pre-validation shape: `pinned` may be omitted.
//! let input = CreateNoteInput { title: " Soup ".into(), stars: 3.0, pinned: None };
//! let note = CreateNote::validate_input(&input).into_result().unwrap();
//! assert_eq!(note.title, "Soup");
//! assert!(!note.pinned);
//!
//! // `UpdateNote` has every field optional, and no defaults.
//! let update = UpdateNote::validate(&serde_json::json!({})).into_result().unwrap();
//! assert_eq!(update.pinned, None);
//! ```
//!
//! ## Container Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[schema(rename = "Name")]` | Type name in the browser contract |
//! | `#[schema(rename_all = "camelCase")]` | Rename all keys (serde's `rename_all` is also read) |
//! | `#[schema(message = "...")]` | Not-an-object / missing-key message, or the picklist message |
//! | `#[schema(partial = "UpdateName")]` | Generate a partial variant |
//! | `#[schema(equal(source = "a", target = "b", message = "..."))]` | Cross-field equality, reported on `b` |
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[schema(rename = "key")]` | Rename this key (serde's `rename` is also read) |
//! | `#[schema(flatten)]` / `#[serde(flatten)]` | Merge another entity's fields |
//! | `#[schema(default = lit)]` | Value used when the key is absent |
//! | `#[schema(message = "...")]` | Type-mismatch message |
//! | `#[schema(min_items(N, ".."))]`, `#[schema(max_items(N, ".."))]` | List length |
//! | `#[schema(items(...))]` | Checks on each list item |
//!
//! ### Checks
//!
//! | Attribute | Applies to | Order |
//! |-----------|------------|-------|
//! | `trim` | text | 1 |
//! | `lowercase` | text | 2 |
//! | `email` | text | 3 |
//! | `pattern = "re"` | text | 4 |
//! | `min_length = N`, `max_length = N` | text | 5, 6 |
//! | `int` | numbers | 1 |
//! | `min = N`, `max = N` | numbers | 2, 3 |
//!
//! Checks run in the order above whatever order they are written in, and
//! the first failing check ends the field. Each accepts a list form with a
//! message: `min_length(2, "too short")`, `email("bad address")`.
//!
//! ## Type Mappings
//!
//! | Rust Type | Schema | Input type |
//! |-----------|--------|------------|
//! | `String` | string | `String` |
//! | `bool` | boolean | `bool` |
//! | `f32`, `f64` | number | `f64` |
//! | `i8`-`i64`, `isize` | number, whole | `f64` |
//! | `u8`-`u64`, `usize` | number, whole, ≥ 0 | `f64` |
//! | `Option<T>` | optional `T` | `Option<T::Input>` |
//! | `Vec<T>` | array of `T` | `Vec<T::Input>` |
//! | entity type | its schema | `T::Input` |

extern crate self as recipe_schemas;

pub mod config;
pub mod entities;
pub mod error;
pub mod executor;
pub mod export;
pub mod issue;
pub mod messages;
pub mod registry;
pub mod request;
pub mod result;
pub mod rules;
pub mod schema;
pub mod traits;

#[cfg(test)]
mod tests;

// Re-export main types
pub use config::{ConfigError, ValidatorConfig};
pub use error::{ApiError, ApiErrorCode, ApiResult, SchemaError, SchemaResult};
pub use executor::{flatten_issues, safe_parse, validate, validate_as};
pub use export::{ExportConfig, generate_module};
pub use issue::{Issue, IssueKind, PathSegment};
pub use registry::{SchemaEntry, SchemaRegistry};
pub use result::{FieldErrors, ROOT_ERROR_KEY, ValidationResult};
pub use schema::Schema;
pub use traits::{EntitySchema, InputOf};

// Re-export derive macro
pub use recipe_schemas_macros::EntitySchema;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
