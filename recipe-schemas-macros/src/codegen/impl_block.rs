//! Generates `impl EntitySchema` blocks.
//!
//! The generated `schema()` builds the schema on first use, verifies it,
//! and keeps it in a `LazyLock` for the life of the process. A definition
//! that fails verification panics with the schema name on first use.

use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::projection::ProjectionGenerator;
use crate::ir::{EntityIR, EntityKind, FieldIR, FieldType, ListIR, ObjectIR, RuleIR, StepIR};

/// Generator for `EntitySchema` implementations.
pub struct ImplBlockGenerator {
    /// Path to the runtime crate
    crate_path: TokenStream,
}

impl Default for ImplBlockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ImplBlockGenerator {
    pub fn new() -> Self {
        Self {
            crate_path: quote!(::recipe_schemas),
        }
    }

    /// Generate everything one derive input expands to.
    pub fn generate(&self, entity: &EntityIR) -> TokenStream {
        match &entity.kind {
            EntityKind::Object(object) => self.generate_object(entity, object),
            EntityKind::Picklist(options) => self.generate_picklist(entity, options),
        }
    }

    fn generate_object(&self, entity: &EntityIR, object: &ObjectIR) -> TokenStream {
        let krate = &self.crate_path;
        let ident = &entity.ident;
        let input_ident = entity.input_ident();
        let projection = ProjectionGenerator::new(self.crate_path.clone());

        let message = entity.message.as_ref().map(|m| quote!(.message(#m)));
        let fields = object.fields.iter().map(|field| self.field_builder(field));
        let checks = object.checks.iter().map(|check| {
            let (source, target, message) = (&check.source, &check.target, &check.message);
            quote!(.checked(#krate::schema::CrossCheck::equal(#source, #target, #message)))
        });

        let schema_fn = self.schema_fn(
            &entity.schema_name(),
            quote! {
                let object = #krate::schema::ObjectSchema::new() #message;
                #( let object = #fields; )*
                let schema = #krate::schema::Schema::from(object) #(#checks)*;
                schema.verify()?;
                ::std::result::Result::Ok(schema)
            },
        );
        let names_fns = self.names_fns(&entity.type_name, &entity.schema_name());
        let input_struct = projection.input_struct(entity, object);

        let partial = object
            .partial
            .as_ref()
            .map(|partial_ident| {
                let partial_entity = EntityIR {
                    ident: partial_ident.clone(),
                    vis: entity.vis.clone(),
                    type_name: partial_ident.to_string(),
                    message: entity.message.clone(),
                    kind: EntityKind::Object(object.clone()),
                };
                self.generate_partial(&partial_entity, ident, object, &projection)
            });

        quote! {
            #input_struct

            impl #krate::EntitySchema for #ident {
                type Input = #input_ident;

                #schema_fn

                #names_fns
            }

            #partial
        }
    }

    fn generate_partial(
        &self,
        partial: &EntityIR,
        base: &syn::Ident,
        object: &ObjectIR,
        projection: &ProjectionGenerator,
    ) -> TokenStream {
        let krate = &self.crate_path;
        let ident = &partial.ident;
        let input_ident = partial.input_ident();

        let schema_fn = self.schema_fn(
            &partial.schema_name(),
            quote! {
                let schema = <#base as #krate::EntitySchema>::schema().partial()?;
                schema.verify()?;
                ::std::result::Result::Ok(schema)
            },
        );
        let names_fns = self.names_fns(&partial.type_name, &partial.schema_name());
        let structs = projection.partial_structs(partial, base, object);

        quote! {
            #structs

            impl #krate::EntitySchema for #ident {
                type Input = #input_ident;

                #schema_fn

                #names_fns
            }
        }
    }

    fn generate_picklist(&self, entity: &EntityIR, options: &[(syn::Ident, String)]) -> TokenStream {
        let krate = &self.crate_path;
        let ident = &entity.ident;
        let message = entity.message.as_ref().map(|m| quote!(.message(#m)));
        let literals = options.iter().map(|(_, wire)| wire);

        let schema_fn = self.schema_fn(
            &entity.schema_name(),
            quote! {
                let schema = #krate::schema::Schema::from(
                    #krate::rules::PicklistRule::new([#(#literals),*]) #message
                );
                schema.verify()?;
                ::std::result::Result::Ok(schema)
            },
        );
        let names_fns = self.names_fns(&entity.type_name, &entity.schema_name());

        quote! {
            impl #krate::EntitySchema for #ident {
                type Input = Self;

                #schema_fn

                #names_fns
            }
        }
    }

    fn schema_fn(&self, schema_name: &str, build: TokenStream) -> TokenStream {
        let krate = &self.crate_path;
        quote! {
            fn schema() -> &'static #krate::schema::Schema {
                static SCHEMA: ::std::sync::LazyLock<#krate::schema::Schema> =
                    ::std::sync::LazyLock::new(|| {
                        let build = || -> ::std::result::Result<
                            #krate::schema::Schema,
                            #krate::SchemaError,
                        > { #build };
                        match build() {
                            ::std::result::Result::Ok(schema) => schema,
                            ::std::result::Result::Err(err) => {
                                ::std::panic!("invalid schema `{}`: {}", #schema_name, err)
                            }
                        }
                    });
                &SCHEMA
            }
        }
    }

    fn names_fns(&self, type_name: &str, schema_name: &str) -> TokenStream {
        quote! {
            fn type_name() -> &'static str {
                #type_name
            }

            fn schema_name() -> &'static str {
                #schema_name
            }
        }
    }

    /// `object` extended by one field.
    fn field_builder(&self, field: &FieldIR) -> TokenStream {
        let krate = &self.crate_path;

        if field.flatten {
            let ty = &field.ty;
            let path = format!("$.{}", field.ident);
            return quote! {
                object.extend(
                    <#ty as #krate::EntitySchema>::schema()
                        .as_object()
                        .ok_or_else(|| #krate::SchemaError::NotAnObject {
                            path: ::std::string::String::from(#path),
                            operation: "flatten",
                        })?,
                )
            };
        }

        let wire = &field.wire_name;
        let mut expr = self.schema_expr(&field.field_type, &field.rules, &field.items, &field.list);
        if let Some(default) = &field.default {
            expr = quote! {
                #krate::schema::Schema::optional_with_default(
                    #expr,
                    #krate::__private::serde_json::Value::from(#default),
                )
            };
        }

        quote!(object.field(#wire, #expr))
    }

    /// Expression of type `Schema` for one field type.
    pub(crate) fn schema_expr(
        &self,
        ty: &FieldType,
        rules: &RuleIR,
        items: &RuleIR,
        list: &ListIR,
    ) -> TokenStream {
        let krate = &self.crate_path;
        let message = rules.message.as_ref().map(|m| quote!(.message(#m)));

        match ty {
            FieldType::Optional(inner) => {
                let inner = self.schema_expr(inner, rules, items, list);
                quote!(#krate::schema::Schema::optional(#inner))
            }
            FieldType::String => {
                let steps = rules.steps.iter().map(|step| self.step(step));
                quote! {
                    #krate::schema::Schema::from(#krate::rules::StringRule::new() #message #(#steps)*)
                }
            }
            FieldType::Float | FieldType::Integer { .. } => {
                let steps = rules.steps.iter().map(|step| self.step(step));
                quote! {
                    #krate::schema::Schema::from(#krate::rules::NumberRule::new() #message #(#steps)*)
                }
            }
            FieldType::Boolean => {
                quote!(#krate::schema::Schema::from(#krate::rules::BooleanRule::new() #message))
            }
            FieldType::Array(item) => {
                let item = self.schema_expr(item, items, &RuleIR::default(), &ListIR::default());
                let min = list.min_items.as_ref().map(|(length, m)| {
                    let m = self.message_or(m, quote!(TOO_FEW_ITEMS));
                    quote!(.min_items(#length, #m))
                });
                let max = list.max_items.as_ref().map(|(length, m)| {
                    let m = self.message_or(m, quote!(TOO_MANY_ITEMS));
                    quote!(.max_items(#length, #m))
                });
                quote! {
                    #krate::schema::Schema::from(
                        #krate::schema::ArraySchema::new(#item) #message #min #max
                    )
                }
            }
            FieldType::Entity(ty) => {
                quote!(::std::clone::Clone::clone(<#ty as #krate::EntitySchema>::schema()))
            }
        }
    }

    fn step(&self, step: &StepIR) -> TokenStream {
        match step {
            StepIR::Trim => quote!(.trim()),
            StepIR::Lowercase => quote!(.to_lowercase()),
            StepIR::Email(m) => {
                let m = self.message_or(m, quote!(INVALID_EMAIL));
                quote!(.email(#m)?)
            }
            StepIR::Pattern(pattern, m) => {
                let m = self.message_or(m, quote!(INVALID_FORMAT));
                quote!(.pattern(#pattern, #m)?)
            }
            StepIR::MinLength(length, m) => {
                let m = self.message_or(m, quote!(TOO_SHORT));
                quote!(.min_length(#length, #m))
            }
            StepIR::MaxLength(length, m) => {
                let m = self.message_or(m, quote!(TOO_LONG));
                quote!(.max_length(#length, #m))
            }
            StepIR::Integer(m) => {
                let m = self.message_or(m, quote!(NOT_INTEGER));
                quote!(.integer(#m))
            }
            StepIR::MinValue(value, m) => {
                let m = self.message_or(m, quote!(TOO_SMALL));
                let value = number_literal(*value);
                quote!(.min_value(#value, #m))
            }
            StepIR::MaxValue(value, m) => {
                let m = self.message_or(m, quote!(TOO_LARGE));
                let value = number_literal(*value);
                quote!(.max_value(#value, #m))
            }
        }
    }

    fn message_or(&self, message: &Option<String>, fallback: TokenStream) -> TokenStream {
        let krate = &self.crate_path;
        match message {
            Some(m) => quote!(#m),
            None => quote!(#krate::messages::#fallback),
        }
    }
}

/// Literals are never negative; a negative bound is `-` applied to one.
fn number_literal(value: f64) -> TokenStream {
    if value < 0.0 {
        let magnitude = -value;
        quote!(-#magnitude)
    } else {
        quote!(#value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::enum_parser::EnumParser;
    use crate::parser::struct_parser::StructParser;

    fn expand(tokens: TokenStream) -> String {
        let input: syn::DeriveInput = syn::parse2(tokens).unwrap();
        let entity = match &input.data {
            syn::Data::Enum(_) => EnumParser::parse(&input).unwrap(),
            _ => StructParser::parse(&input).unwrap(),
        };
        ImplBlockGenerator::new().generate(&entity).to_string()
    }

    #[test]
    fn test_object_impl() {
        let output = expand(quote! {
            #[serde(rename_all = "camelCase")]
            #[schema(message = "נדרש דירוג")]
            pub struct RateRecipe {
                #[schema(min(0, "low"), max(5, "high"))]
                pub rating: f64,
            }
        });

        assert!(output.contains("impl :: recipe_schemas :: EntitySchema for RateRecipe"));
        assert!(output.contains("type Input = RateRecipeInput"));
        assert!(output.contains("pub struct RateRecipeInput"));
        assert!(output.contains("\"RateRecipeSchema\""));
        assert!(output.contains(". min_value (0f64 , \"low\")"));
        assert!(output.contains("LazyLock"));
    }

    #[test]
    fn test_signed_integer_bounds() {
        let output = expand(quote! {
            struct Oven {
                offset: i8,
            }
        });
        assert!(output.contains(". min_value (- 128f64 , :: recipe_schemas :: messages :: TOO_SMALL)"));
        assert!(output.contains(". max_value (127f64 , :: recipe_schemas :: messages :: TOO_LARGE)"));
    }

    #[test]
    fn test_default_messages_reference_constants() {
        let output = expand(quote! {
            struct Title {
                #[schema(trim, min_length = 2)]
                title: String,
            }
        });
        assert!(output.contains("messages :: TOO_SHORT"));
        assert!(output.contains(". trim ()"));
    }

    #[test]
    fn test_default_wraps_optional() {
        let output = expand(quote! {
            struct Flags {
                #[schema(default = false)]
                is_yemeni: bool,
            }
        });
        assert!(output.contains("optional_with_default"));
        assert!(output.contains("Value :: from (false)"));
    }

    #[test]
    fn test_partial_generated() {
        let output = expand(quote! {
            #[schema(partial = "UpdateThing")]
            struct Thing {
                name: String,
            }
        });
        assert!(output.contains("pub struct UpdateThing") || output.contains("struct UpdateThing"));
        assert!(output.contains("impl :: recipe_schemas :: EntitySchema for UpdateThing"));
        assert!(output.contains(". partial ()"));
    }

    #[test]
    fn test_picklist_impl() {
        let output = expand(quote! {
            #[schema(message = "bad")]
            enum KosherType { Parve, Dairy, Meat }
        });
        assert!(output.contains("PicklistRule :: new ([\"Parve\" , \"Dairy\" , \"Meat\"])"));
        assert!(output.contains("type Input = Self"));
    }

    #[test]
    fn test_flatten_extends() {
        let output = expand(quote! {
            struct RegisterWithConfirm {
                #[serde(flatten)]
                account: Register,
                confirm_password: String,
            }
        });
        assert!(output.contains("object . extend"));
        assert!(output.contains("\"flatten\""));
    }
}
