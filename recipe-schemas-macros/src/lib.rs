//! # recipe-schemas-macros
//!
//! Procedural macros for declaring validated entities.
//!
//! This crate provides the `#[derive(EntitySchema)]` macro. It builds the
//! entity's schema once, generates the pre-validation `{Type}Input` shape,
//! and optionally a partial variant for update requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recipe_schemas::EntitySchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize, EntitySchema)]
//! #[serde(rename_all = "camelCase")]
//! #[schema(message = "נדרשים פרטי התחברות")]
//! struct Login {
//!     #[schema(trim, lowercase, email("כתובת אימייל לא תקינה"))]
//!     email: String,
//!
//!     #[schema(min_length(1, "נדרשת סיסמה"))]
//!     password: String,
//! }
//! ```
//!
//! ## Attributes
//!
//! ### Container Attributes
//!
//! - `#[schema(rename = "Name")]` - Type name in the exported contract
//! - `#[schema(rename_all = "camelCase")]` - Rename all keys
//! - `#[schema(message = "...")]` - Message when the value is not an object
//! - `#[schema(partial = "UpdateName")]` - Also generate a partial variant
//! - `#[schema(equal(source = "a", target = "b", message = "..."))]` - Cross-field equality
//!
//! ### Field Attributes
//!
//! - `#[schema(rename = "key")]` - Rename this key
//! - `#[schema(flatten)]` - Merge another entity's fields into this one
//! - `#[schema(default = lit)]` - Fill an absent key
//! - `#[schema(message = "...")]` - Message on type mismatch
//! - `#[schema(min_items(N, "..."))]`, `#[schema(max_items(N, "..."))]` - List length
//! - `#[schema(items(...))]` - Checks applied to each list item
//!
//! ### Value Checks
//!
//! - `trim`, `lowercase` - Normalizations
//! - `email`, `pattern = "re"` - Format checks
//! - `min_length = N`, `max_length = N` - Text length in UTF-16 code units
//! - `int`, `min = N`, `max = N` - Numeric checks
//!
//! Integer fields are always checked as whole numbers within the range of
//! their type; `min`/`max` narrow that range.
//!
//! Every check also accepts a list form carrying its message, such as
//! `min_length(2, "too short")`.

use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

mod codegen;
mod ir;
mod parser;

use codegen::impl_block::ImplBlockGenerator;
use parser::enum_parser::{EnumParseError, EnumParser};
use parser::struct_parser::{StructParseError, StructParser};

/// Derive macro implementing `EntitySchema`.
///
/// # Example
///
/// ```rust,ignore
/// use recipe_schemas::EntitySchema;
///
/// #[derive(EntitySchema)]
/// #[schema(message = "נדרש דירוג")]
/// struct RateRecipe {
///     #[schema(min(0, "הדירוג חייב להיות בין 0 ל-5"), max(5, "הדירוג חייב להיות בין 0 ל-5"))]
///     rating: f64,
/// }
/// ```
#[proc_macro_derive(EntitySchema, attributes(schema, serde))]
pub fn derive_entity_schema(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match derive_entity_schema_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Routes to the struct or enum parser and generates the impl block.
fn derive_entity_schema_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let entity = match &input.data {
        Data::Struct(_) => StructParser::parse(input).map_err(|e| convert_parse_error(e, input))?,
        Data::Enum(_) => {
            EnumParser::parse(input).map_err(|e| convert_enum_parse_error(e, input))?
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "EntitySchema cannot be derived for unions",
            ));
        }
    };

    Ok(ImplBlockGenerator::new().generate(&entity))
}

/// Convert a StructParseError to a syn::Error with proper span information.
fn convert_parse_error(error: StructParseError, input: &DeriveInput) -> syn::Error {
    match error {
        StructParseError::InvalidField { span, .. } => syn::Error::new(span, error.to_string()),
        other => syn::Error::new_spanned(&input.ident, other.to_string()),
    }
}

/// Convert an EnumParseError to a syn::Error with proper span information.
fn convert_enum_parse_error(error: EnumParseError, input: &DeriveInput) -> syn::Error {
    syn::Error::new_spanned(&input.ident, error.to_string())
}
