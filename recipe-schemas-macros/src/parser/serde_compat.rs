//! Serde attribute compatibility.
//!
//! Entities are deserialized by serde, so the wire names serde uses must be
//! the names the schema checks. `#[schema(...)]` attributes take precedence
//! when both are present.

use syn::Attribute;
use syn::meta::ParseNestedMeta;

use super::attributes::RenameRule;

/// Serde container attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeContainerAttrs {
    /// Rename all fields or variants using a case convention
    pub rename_all: Option<RenameRule>,
}

impl SerdeContainerAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                    let value = parse_string_value(&meta)?;
                    result.rename_all = parse_rename_rule(&value);
                } else {
                    skip_value(&meta)?;
                }
                Ok(())
            });
        }

        result
    }
}

/// Serde field or variant attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeFieldAttrs {
    /// Rename this field or variant
    pub rename: Option<String>,

    /// Flatten nested object
    pub flatten: bool,
}

impl SerdeFieldAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    result.rename = Some(parse_string_value(&meta)?);
                } else if meta.path.is_ident("flatten") {
                    result.flatten = true;
                } else {
                    skip_value(&meta)?;
                }
                Ok(())
            });
        }

        result
    }
}

/// Parse a string value from a meta item like `rename = "value"`.
fn parse_string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let value: syn::LitStr = meta.value()?.parse()?;
    Ok(value.value())
}

/// Consume the value of an item we do not interpret, so the items after it
/// are still visited.
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _: proc_macro2::TokenTree = meta.input.parse()?;
    }
    Ok(())
}

/// Parse a serde rename rule string into our RenameRule enum.
fn parse_rename_rule(s: &str) -> Option<RenameRule> {
    match s {
        "lowercase" => Some(RenameRule::Lowercase),
        "camelCase" => Some(RenameRule::CamelCase),
        "snake_case" => Some(RenameRule::SnakeCase),
        "PascalCase" => Some(RenameRule::PascalCase),
        "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
        "kebab-case" => Some(RenameRule::KebabCase),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename_rule() {
        assert_eq!(parse_rename_rule("camelCase"), Some(RenameRule::CamelCase));
        assert_eq!(parse_rename_rule("lowercase"), Some(RenameRule::Lowercase));
        assert_eq!(parse_rename_rule("kebab-case"), Some(RenameRule::KebabCase));
        assert_eq!(parse_rename_rule("unknown"), None);
    }

    #[test]
    fn test_container_rename_all() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[serde(deny_unknown_fields, rename_all = "camelCase")])];
        let serde = SerdeContainerAttrs::from_attrs(&attrs);
        assert_eq!(serde.rename_all, Some(RenameRule::CamelCase));
    }

    #[test]
    fn test_field_attrs_survive_unknown_items() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(
            #[serde(default, skip_serializing_if = "Option::is_none", rename = "img")]
        )];
        let serde = SerdeFieldAttrs::from_attrs(&attrs);
        assert_eq!(serde.rename.as_deref(), Some("img"));
        assert!(!serde.flatten);
    }

    #[test]
    fn test_field_flatten() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[serde(flatten)])];
        assert!(SerdeFieldAttrs::from_attrs(&attrs).flatten);
    }

    #[test]
    fn test_split_rename_is_skipped() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(
            #[serde(rename(serialize = "a", deserialize = "b"), flatten)]
        )];
        let serde = SerdeFieldAttrs::from_attrs(&attrs);
        assert_eq!(serde.rename, None);
        assert!(serde.flatten);
    }
}
