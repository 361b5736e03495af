//! Struct parsing logic.
//!
//! Lowers a struct with named fields into an object [`EntityIR`]. Checks are
//! placed in a fixed order whatever order they were written in:
//! trim, lowercase, email, pattern, min_length, max_length for strings and
//! int, min, max for numbers.

use darling::{FromDeriveInput, FromField};
use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Lit};

use crate::ir::{
    EntityIR, EntityKind, EqualCheckIR, FieldIR, FieldType, ListIR, ObjectIR, RuleIR, StepIR,
};
use crate::parser::attributes::{ContainerAttrs, FieldAttrs, RenameRule, RuleAttrs};
use crate::parser::type_parser::{ParseError, TypeParser};

#[cfg(feature = "serde-compat")]
use crate::parser::serde_compat::{SerdeContainerAttrs, SerdeFieldAttrs};

/// Error type for struct parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StructParseError {
    #[error("Failed to parse container attributes: {0}")]
    ContainerAttrs(String),

    #[error("Failed to parse field attributes: {0}")]
    FieldAttrs(String),

    #[error("Failed to parse type of field `{field}`: {source}")]
    FieldType {
        field: String,
        #[source]
        source: ParseError,
    },

    #[error("Field `{field}`: {message}")]
    InvalidField {
        field: String,
        message: String,
        span: Span,
    },

    #[error("Expected a struct with named fields, found {0}")]
    NotANamedStruct(String),
}

impl StructParseError {
    fn invalid(field: &str, span: Span, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
            span,
        }
    }
}

/// Parses Rust struct definitions into [`EntityIR`].
pub struct StructParser;

impl StructParser {
    /// Parse a DeriveInput into an EntityIR.
    pub fn parse(input: &DeriveInput) -> Result<EntityIR, StructParseError> {
        let container_attrs = ContainerAttrs::from_derive_input(input)
            .map_err(|e| StructParseError::ContainerAttrs(e.to_string()))?;

        #[cfg(feature = "serde-compat")]
        let effective_rename_all = container_attrs
            .rename_all
            .or(SerdeContainerAttrs::from_attrs(&input.attrs).rename_all);

        #[cfg(not(feature = "serde-compat"))]
        let effective_rename_all = container_attrs.rename_all;

        let fields = match &input.data {
            Data::Struct(s) => match &s.fields {
                Fields::Named(fields) => fields,
                Fields::Unnamed(_) => {
                    return Err(StructParseError::NotANamedStruct("tuple struct".into()));
                }
                Fields::Unit => return Err(StructParseError::NotANamedStruct("unit struct".into())),
            },
            Data::Enum(_) => return Err(StructParseError::NotANamedStruct("enum".into())),
            Data::Union(_) => return Err(StructParseError::NotANamedStruct("union".into())),
        };

        let field_irs = fields
            .named
            .iter()
            .map(|field| Self::parse_field(field, effective_rename_all))
            .collect::<Result<Vec<_>, _>>()?;

        if container_attrs.partial.is_some() {
            if let Some(field) = field_irs.iter().find(|f| f.flatten) {
                return Err(StructParseError::invalid(
                    &field.ident.to_string(),
                    field.span,
                    "`partial` cannot be combined with flattened fields",
                ));
            }
        }

        let checks = container_attrs
            .equal
            .iter()
            .map(|check| EqualCheckIR {
                source: check.source.clone(),
                target: check.target.clone(),
                message: check.message.clone(),
            })
            .collect();

        Ok(EntityIR {
            ident: container_attrs.ident.clone(),
            vis: container_attrs.vis.clone(),
            type_name: container_attrs.type_name(),
            message: container_attrs.message.clone(),
            kind: EntityKind::Object(ObjectIR {
                fields: field_irs,
                checks,
                partial: container_attrs.partial.clone(),
            }),
        })
    }

    fn parse_field(
        field: &syn::Field,
        rename_all: Option<RenameRule>,
    ) -> Result<FieldIR, StructParseError> {
        let attrs =
            FieldAttrs::from_field(field).map_err(|e| StructParseError::FieldAttrs(e.to_string()))?;
        let span = field.span();

        let ident = attrs
            .ident
            .clone()
            .ok_or_else(|| StructParseError::NotANamedStruct("tuple struct".into()))?;
        let name = ident.to_string();

        #[cfg(feature = "serde-compat")]
        let (wire_name, flatten) = {
            let serde = SerdeFieldAttrs::from_attrs(&field.attrs);
            let wire_name = match (&attrs.rename, serde.rename) {
                (None, Some(serde_name)) => serde_name,
                _ => attrs.wire_name(rename_all),
            };
            (wire_name, attrs.flatten || serde.flatten)
        };

        #[cfg(not(feature = "serde-compat"))]
        let (wire_name, flatten) = (attrs.wire_name(rename_all), attrs.flatten);

        let field_type = TypeParser::parse(&attrs.ty).map_err(|source| {
            StructParseError::FieldType {
                field: name.clone(),
                source,
            }
        })?;

        if flatten {
            let plain = !attrs.rules.has_string_steps()
                && !attrs.rules.has_number_steps()
                && attrs.rules.message.is_none()
                && attrs.default.is_none()
                && attrs.items.is_none();
            if !matches!(field_type, FieldType::Entity(_)) || !plain {
                return Err(StructParseError::invalid(
                    &name,
                    span,
                    "flattened fields must be a plain entity type without checks",
                ));
            }
        }

        if let Some(default) = &attrs.default {
            if field_type.is_optional() {
                return Err(StructParseError::invalid(
                    &name,
                    span,
                    "`default` cannot be used on an Option field",
                ));
            }
            check_default_literal(&name, span, &field_type, &default.0)?;
        }

        let (rules, items, list) = match field_type.leaf() {
            FieldType::Array(item) => {
                if attrs.rules.has_string_steps() || attrs.rules.has_number_steps() {
                    return Err(StructParseError::invalid(
                        &name,
                        span,
                        "value checks on a list apply to its items; use `items(...)`",
                    ));
                }
                let item_rules = attrs.items.clone().unwrap_or_default();
                let list = ListIR {
                    min_items: attrs.min_items.as_ref().map(|b| (b.value, b.message.clone())),
                    max_items: attrs.max_items.as_ref().map(|b| (b.value, b.message.clone())),
                };
                (
                    RuleIR {
                        message: attrs.rules.message.clone(),
                        steps: Vec::new(),
                    },
                    lower_rules(&name, span, item.leaf(), &item_rules)?,
                    list,
                )
            }
            leaf => {
                if attrs.items.is_some() || attrs.min_items.is_some() || attrs.max_items.is_some() {
                    return Err(StructParseError::invalid(
                        &name,
                        span,
                        "`items`, `min_items` and `max_items` are only valid on Vec fields",
                    ));
                }
                (
                    lower_rules(&name, span, leaf, &attrs.rules)?,
                    RuleIR::default(),
                    ListIR::default(),
                )
            }
        };

        Ok(FieldIR {
            ident,
            wire_name,
            ty: attrs.ty.clone(),
            field_type,
            rules,
            items,
            list,
            default: attrs.default.map(|d| d.0),
            flatten,
            span,
        })
    }
}

/// Turn attribute checks into ordered steps for one leaf type.
pub(crate) fn lower_rules(
    field: &str,
    span: Span,
    leaf: &FieldType,
    rules: &RuleAttrs,
) -> Result<RuleIR, StructParseError> {
    let mut steps = Vec::new();

    match leaf {
        FieldType::String => {
            if rules.has_number_steps() {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    "`int`, `min` and `max` apply to numbers; use `min_length`/`max_length`",
                ));
            }
            if rules.trim {
                steps.push(StepIR::Trim);
            }
            if rules.lowercase {
                steps.push(StepIR::Lowercase);
            }
            if let Some(check) = &rules.email {
                steps.push(StepIR::Email(check.message.clone()));
            }
            if let Some(pattern) = &rules.pattern {
                steps.push(StepIR::Pattern(pattern.value.clone(), pattern.message.clone()));
            }
            if let Some(bound) = &rules.min_length {
                steps.push(StepIR::MinLength(bound.value, bound.message.clone()));
            }
            if let Some(bound) = &rules.max_length {
                steps.push(StepIR::MaxLength(bound.value, bound.message.clone()));
            }
        }
        FieldType::Float | FieldType::Integer { .. } => {
            if rules.has_string_steps() {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    "string checks cannot be applied to a number",
                ));
            }
            // Integer types always check for a whole number; floats only on request.
            match (leaf, &rules.int) {
                (_, Some(check)) => steps.push(StepIR::Integer(check.message.clone())),
                (FieldType::Integer { .. }, None) => steps.push(StepIR::Integer(None)),
                _ => {}
            }
            // Integer types are also bounded by their width; declared bounds
            // replace the implicit ones but must stay inside them.
            let range = leaf.integer_range();
            if let (Some((lo, hi)), Some(bound)) = (range, &rules.min)
                && !(lo..=hi).contains(&bound.value)
            {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    "`min` is outside the range of this integer type",
                ));
            }
            if let (Some((lo, hi)), Some(bound)) = (range, &rules.max)
                && !(lo..=hi).contains(&bound.value)
            {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    "`max` is outside the range of this integer type",
                ));
            }
            match (&rules.min, range) {
                (Some(bound), _) => steps.push(StepIR::MinValue(bound.value, bound.message.clone())),
                (None, Some((lo, _))) => steps.push(StepIR::MinValue(lo, None)),
                _ => {}
            }
            match (&rules.max, range) {
                (Some(bound), _) => steps.push(StepIR::MaxValue(bound.value, bound.message.clone())),
                (None, Some((_, hi))) => steps.push(StepIR::MaxValue(hi, None)),
                _ => {}
            }
        }
        other => {
            if rules.has_string_steps() || rules.has_number_steps() {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    format!("checks cannot be applied to a {} field", other.describe()),
                ));
            }
            if rules.message.is_some() && matches!(other, FieldType::Entity(_)) {
                return Err(StructParseError::invalid(
                    field,
                    span,
                    "an entity field takes its message from the entity's own `message`",
                ));
            }
        }
    }

    Ok(RuleIR {
        message: rules.message.clone(),
        steps,
    })
}

fn check_default_literal(
    field: &str,
    span: Span,
    field_type: &FieldType,
    lit: &Lit,
) -> Result<(), StructParseError> {
    let matches = match (field_type, lit) {
        (FieldType::String | FieldType::Entity(_), Lit::Str(_)) => true,
        (FieldType::Boolean, Lit::Bool(_)) => true,
        (FieldType::Float | FieldType::Integer { .. }, Lit::Int(_) | Lit::Float(_)) => true,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(StructParseError::invalid(
            field,
            span,
            format!("default literal does not fit a {} field", field_type.describe()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse(tokens: proc_macro2::TokenStream) -> Result<EntityIR, StructParseError> {
        let input: DeriveInput = syn::parse2(tokens).unwrap();
        StructParser::parse(&input)
    }

    fn object(entity: &EntityIR) -> &ObjectIR {
        match &entity.kind {
            EntityKind::Object(object) => object,
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_step_order() {
        let entity = parse(quote! {
            #[serde(rename_all = "camelCase")]
            struct Register {
                #[schema(max_length(255, "long"), email("bad"), lowercase, trim)]
                email: String,
            }
        })
        .unwrap();

        let field = &object(&entity).fields[0];
        assert_eq!(
            field.rules.steps,
            vec![
                StepIR::Trim,
                StepIR::Lowercase,
                StepIR::Email(Some("bad".into())),
                StepIR::MaxLength(255, Some("long".into())),
            ]
        );
    }

    #[test]
    fn test_wire_names_follow_serde() {
        let entity = parse(quote! {
            #[serde(rename_all = "camelCase")]
            struct CreateRecipe {
                prep_time: f64,
                #[serde(rename = "img")]
                image_url: String,
                #[schema(rename = "yemeni")]
                #[serde(rename = "ignored")]
                is_yemeni: bool,
            }
        })
        .unwrap();

        let names: Vec<_> = object(&entity)
            .fields
            .iter()
            .map(|f| f.wire_name.as_str())
            .collect();
        assert_eq!(names, vec!["prepTime", "img", "yemeni"]);
    }

    #[test]
    fn test_integer_gets_whole_number_check() {
        let entity = parse(quote! {
            struct Rate {
                #[schema(int("whole"), min = 1, max = 5)]
                difficulty: i64,
                count: u32,
            }
        })
        .unwrap();

        let fields = &object(&entity).fields;
        assert_eq!(
            fields[0].rules.steps,
            vec![
                StepIR::Integer(Some("whole".into())),
                StepIR::MinValue(1.0, None),
                StepIR::MaxValue(5.0, None),
            ]
        );
        assert_eq!(
            fields[1].rules.steps,
            vec![
                StepIR::Integer(None),
                StepIR::MinValue(0.0, None),
                StepIR::MaxValue(4_294_967_295.0, None),
            ]
        );
    }

    #[test]
    fn test_small_integers_bounded_by_width() {
        let entity = parse(quote! {
            struct Servings {
                count: u8,
                #[schema(max(12, "too many"))]
                portions: u8,
                offset: i8,
            }
        })
        .unwrap();

        let fields = &object(&entity).fields;
        assert_eq!(
            fields[0].rules.steps,
            vec![
                StepIR::Integer(None),
                StepIR::MinValue(0.0, None),
                StepIR::MaxValue(255.0, None),
            ]
        );
        assert_eq!(
            fields[1].rules.steps,
            vec![
                StepIR::Integer(None),
                StepIR::MinValue(0.0, None),
                StepIR::MaxValue(12.0, Some("too many".into())),
            ]
        );
        assert_eq!(
            fields[2].rules.steps,
            vec![
                StepIR::Integer(None),
                StepIR::MinValue(-128.0, None),
                StepIR::MaxValue(127.0, None),
            ]
        );
    }

    #[test]
    fn test_bound_outside_integer_width_rejected() {
        let err = parse(quote! {
            struct Bad {
                #[schema(min = -1)]
                count: u8,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("outside the range"));

        assert!(parse(quote! {
            struct Bad {
                #[schema(max = 300)]
                count: u8,
            }
        })
        .is_err());
    }

    #[test]
    fn test_list_items_and_counts() {
        let entity = parse(quote! {
            struct CreateRecipe {
                #[schema(min_items(1, "need one"), items(trim, min_length(1, "empty")))]
                ingredients: Vec<String>,
            }
        })
        .unwrap();

        let field = &object(&entity).fields[0];
        assert!(field.rules.steps.is_empty());
        assert_eq!(
            field.items.steps,
            vec![StepIR::Trim, StepIR::MinLength(1, Some("empty".into()))]
        );
        assert_eq!(field.list.min_items, Some((1, Some("need one".into()))));
    }

    #[test]
    fn test_string_checks_on_number_rejected() {
        let err = parse(quote! {
            struct Bad {
                #[schema(min_length = 2)]
                rating: f64,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn test_items_on_scalar_rejected() {
        assert!(parse(quote! {
            struct Bad {
                #[schema(items(trim))]
                title: String,
            }
        })
        .is_err());
    }

    #[test]
    fn test_default_type_mismatch_rejected() {
        assert!(parse(quote! {
            struct Bad {
                #[schema(default = "no")]
                is_yemeni: bool,
            }
        })
        .is_err());
    }

    #[test]
    fn test_default_on_option_rejected() {
        assert!(parse(quote! {
            struct Bad {
                #[schema(default = "")]
                note: Option<String>,
            }
        })
        .is_err());
    }

    #[test]
    fn test_flatten_and_checks() {
        let entity = parse(quote! {
            #[serde(rename_all = "camelCase")]
            #[schema(equal(source = "password", target = "confirmPassword", message = "mismatch"))]
            struct RegisterWithConfirm {
                #[serde(flatten)]
                account: Register,
                confirm_password: String,
            }
        })
        .unwrap();

        let object = object(&entity);
        assert!(object.fields[0].flatten);
        assert_eq!(object.checks.len(), 1);
        assert_eq!(object.checks[0].source, "password");
    }

    #[test]
    fn test_partial_with_flatten_rejected() {
        assert!(parse(quote! {
            #[schema(partial = "UpdateThing")]
            struct Thing {
                #[serde(flatten)]
                base: Register,
            }
        })
        .is_err());
    }

    #[test]
    fn test_tuple_struct_rejected() {
        assert!(parse(quote! { struct Id(String); }).is_err());
    }
}
