//! Enum parsing logic.
//!
//! A unit-only enum becomes a picklist of its variants' wire literals.

use darling::{FromDeriveInput, FromVariant};
use syn::{Data, DeriveInput, Fields};

use crate::ir::{EntityIR, EntityKind};
use crate::parser::attributes::{ContainerAttrs, VariantAttrs};

#[cfg(feature = "serde-compat")]
use crate::parser::serde_compat::{SerdeContainerAttrs, SerdeFieldAttrs};

/// Error type for enum parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnumParseError {
    #[error("Failed to parse container attributes: {0}")]
    ContainerAttrs(String),

    #[error("Failed to parse variant attributes: {0}")]
    VariantAttrs(String),

    #[error("Expected enum, found {0}")]
    NotAnEnum(String),

    #[error("Variant `{0}` carries data; only unit variants can form a picklist")]
    DataVariant(String),

    #[error("Enum has no variants")]
    Empty,

    #[error("`{0}` is only valid on structs")]
    StructOnly(&'static str),
}

/// Parses unit enums into picklist [`EntityIR`].
pub struct EnumParser;

impl EnumParser {
    pub fn parse(input: &DeriveInput) -> Result<EntityIR, EnumParseError> {
        let data_enum = match &input.data {
            Data::Enum(e) => e,
            Data::Struct(_) => return Err(EnumParseError::NotAnEnum("struct".into())),
            Data::Union(_) => return Err(EnumParseError::NotAnEnum("union".into())),
        };

        // Report data variants by name before darling's generic shape error.
        if let Some(variant) = data_enum
            .variants
            .iter()
            .find(|v| !matches!(v.fields, Fields::Unit))
        {
            return Err(EnumParseError::DataVariant(variant.ident.to_string()));
        }

        let container_attrs = ContainerAttrs::from_derive_input(input)
            .map_err(|e| EnumParseError::ContainerAttrs(e.to_string()))?;

        if container_attrs.partial.is_some() {
            return Err(EnumParseError::StructOnly("partial"));
        }
        if !container_attrs.equal.is_empty() {
            return Err(EnumParseError::StructOnly("equal"));
        }

        #[cfg(feature = "serde-compat")]
        let effective_rename_all = container_attrs
            .rename_all
            .or(SerdeContainerAttrs::from_attrs(&input.attrs).rename_all);

        #[cfg(not(feature = "serde-compat"))]
        let effective_rename_all = container_attrs.rename_all;

        let mut options = Vec::with_capacity(data_enum.variants.len());
        for variant in &data_enum.variants {
            let attrs = VariantAttrs::from_variant(variant)
                .map_err(|e| EnumParseError::VariantAttrs(e.to_string()))?;

            #[cfg(feature = "serde-compat")]
            let wire_name = match (&attrs.rename, SerdeFieldAttrs::from_attrs(&variant.attrs).rename) {
                (None, Some(serde_name)) => serde_name,
                _ => attrs.wire_name(effective_rename_all),
            };

            #[cfg(not(feature = "serde-compat"))]
            let wire_name = attrs.wire_name(effective_rename_all);

            options.push((attrs.ident.clone(), wire_name));
        }

        if options.is_empty() {
            return Err(EnumParseError::Empty);
        }

        Ok(EntityIR {
            ident: container_attrs.ident.clone(),
            vis: container_attrs.vis.clone(),
            type_name: container_attrs.type_name(),
            message: container_attrs.message.clone(),
            kind: EntityKind::Picklist(options),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse(tokens: proc_macro2::TokenStream) -> Result<EntityIR, EnumParseError> {
        let input: DeriveInput = syn::parse2(tokens).unwrap();
        EnumParser::parse(&input)
    }

    fn options(entity: &EntityIR) -> Vec<String> {
        match &entity.kind {
            EntityKind::Picklist(options) => options.iter().map(|(_, w)| w.clone()).collect(),
            other => panic!("expected picklist, got {:?}", other),
        }
    }

    #[test]
    fn test_variant_names() {
        let entity = parse(quote! {
            #[schema(message = "סוג כשרות לא תקין")]
            enum KosherType { Parve, Dairy, Meat }
        })
        .unwrap();
        assert_eq!(options(&entity), vec!["Parve", "Dairy", "Meat"]);
        assert_eq!(entity.message.as_deref(), Some("סוג כשרות לא תקין"));
        assert_eq!(entity.schema_name(), "KosherTypeSchema");
    }

    #[test]
    fn test_serde_lowercase() {
        let entity = parse(quote! {
            #[serde(rename_all = "lowercase")]
            enum UserRole { Admin, User }
        })
        .unwrap();
        assert_eq!(options(&entity), vec!["admin", "user"]);
    }

    #[test]
    fn test_variant_rename() {
        let entity = parse(quote! {
            enum Kind {
                #[schema(rename = "x")]
                A,
                #[serde(rename = "y")]
                B,
            }
        })
        .unwrap();
        assert_eq!(options(&entity), vec!["x", "y"]);
    }

    #[test]
    fn test_data_variant_rejected() {
        let err = parse(quote! {
            enum Bad { A(String) }
        })
        .unwrap_err();
        assert!(matches!(err, EnumParseError::DataVariant(ref v) if v == "A"));
    }

    #[test]
    fn test_partial_rejected() {
        assert!(matches!(
            parse(quote! {
                #[schema(partial = "Other")]
                enum Kind { A }
            }),
            Err(EnumParseError::StructOnly("partial"))
        ));
    }
}
