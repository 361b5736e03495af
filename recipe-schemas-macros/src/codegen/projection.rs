//! Projected types: the pre-validation input shape and the partial variant.

use proc_macro2::TokenStream;
use quote::quote;

use crate::ir::{EntityIR, FieldIR, FieldType, ObjectIR};

pub struct ProjectionGenerator {
    crate_path: TokenStream,
}

impl ProjectionGenerator {
    pub fn new(crate_path: TokenStream) -> Self {
        Self { crate_path }
    }

    fn derives(&self, with_default: bool) -> TokenStream {
        let krate = &self.crate_path;
        let default = with_default.then(|| quote!(::std::default::Default,));
        quote! {
            #[derive(
                ::std::fmt::Debug,
                ::std::clone::Clone,
                #default
                ::std::cmp::PartialEq,
                #krate::__private::serde::Serialize,
                #krate::__private::serde::Deserialize,
            )]
            #[serde(crate = "::recipe_schemas::__private::serde")]
        }
    }

    /// Field type before validation: numbers are plain `f64`, entities use
    /// their own input type.
    pub fn input_type(&self, ty: &FieldType) -> TokenStream {
        let krate = &self.crate_path;
        match ty {
            FieldType::String => quote!(::std::string::String),
            FieldType::Boolean => quote!(bool),
            FieldType::Float | FieldType::Integer { .. } => quote!(f64),
            FieldType::Array(item) => {
                let item = self.input_type(item);
                quote!(::std::vec::Vec<#item>)
            }
            FieldType::Optional(inner) => {
                let inner = self.input_type(inner);
                quote!(::std::option::Option<#inner>)
            }
            FieldType::Entity(ty) => quote!(<#ty as #krate::EntitySchema>::Input),
        }
    }

    /// `{Ident}Input`: keys that may be absent are `Option`.
    pub fn input_struct(&self, entity: &EntityIR, object: &ObjectIR) -> TokenStream {
        let vis = &entity.vis;
        let input_ident = entity.input_ident();
        let derives = self.derives(false);
        let doc = format!(
            "Shape of [`{}`] before validation: defaulted keys may be omitted.",
            entity.ident
        );
        let fields = object.fields.iter().map(|field| self.input_field(vis, field));

        quote! {
            #[doc = #doc]
            #derives
            #vis struct #input_ident {
                #(#fields,)*
            }
        }
    }

    fn input_field(&self, vis: &syn::Visibility, field: &FieldIR) -> TokenStream {
        let krate = &self.crate_path;
        let ident = &field.ident;
        let wire = &field.wire_name;

        if field.flatten {
            let ty = &field.ty;
            return quote! {
                #[serde(flatten)]
                #vis #ident: <#ty as #krate::EntitySchema>::Input
            };
        }

        let ty = self.input_type(&field.field_type);
        if field.is_optional_on_input() {
            let ty = if field.field_type.is_optional() {
                ty
            } else {
                quote!(::std::option::Option<#ty>)
            };
            quote! {
                #[serde(rename = #wire, default, skip_serializing_if = "::std::option::Option::is_none")]
                #vis #ident: #ty
            }
        } else {
            quote! {
                #[serde(rename = #wire)]
                #vis #ident: #ty
            }
        }
    }

    /// The partial output struct and its input struct.
    pub fn partial_structs(&self, partial: &EntityIR, base: &syn::Ident, object: &ObjectIR) -> TokenStream {
        let vis = &partial.vis;
        let ident = &partial.ident;
        let input_ident = partial.input_ident();
        let output_derives = self.derives(true);
        let input_derives = self.derives(true);

        let doc = format!("[`{base}`] with every field optional and no defaults.");
        let input_doc = format!("Shape of [`{ident}`] before validation.");

        let output_fields = object.fields.iter().map(|field| {
            let ident = &field.ident;
            let wire = &field.wire_name;
            let ty = &field.ty;
            let ty = if field.field_type.is_optional() {
                quote!(#ty)
            } else {
                quote!(::std::option::Option<#ty>)
            };
            quote! {
                #[serde(rename = #wire, default, skip_serializing_if = "::std::option::Option::is_none")]
                #vis #ident: #ty
            }
        });

        let input_fields = object.fields.iter().map(|field| {
            let ident = &field.ident;
            let wire = &field.wire_name;
            let ty = self.input_type(&field.field_type);
            let ty = if field.field_type.is_optional() {
                ty
            } else {
                quote!(::std::option::Option<#ty>)
            };
            quote! {
                #[serde(rename = #wire, default, skip_serializing_if = "::std::option::Option::is_none")]
                #vis #ident: #ty
            }
        });

        quote! {
            #[doc = #doc]
            #output_derives
            #vis struct #ident {
                #(#output_fields,)*
            }

            #[doc = #input_doc]
            #input_derives
            #vis struct #input_ident {
                #(#input_fields,)*
            }
        }
    }
}
