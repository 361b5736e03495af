//! Type parsing from Rust AST to IR.
//!
//! Supports:
//! - Primitives (`String`, `bool`, integers, floats)
//! - `Option<T>` and `Vec<T>`
//! - `Box<T>` (unwrapped)
//! - Any other path type, which must implement `EntitySchema`

use syn::{GenericArgument, PathArguments, Type};

use crate::ir::FieldType;

/// Error type for type parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Empty path in type")]
    EmptyPath,

    #[error("Missing generic parameter for {0}")]
    MissingGeneric(String),
}

/// Parses Rust types into [`FieldType`].
pub struct TypeParser;

impl TypeParser {
    pub fn parse(ty: &Type) -> Result<FieldType, ParseError> {
        match ty {
            Type::Path(type_path) => {
                if type_path.qself.is_some() {
                    return Err(ParseError::UnsupportedType(
                        "Qualified self types".to_string(),
                    ));
                }
                Self::parse_path(ty, &type_path.path)
            }
            Type::Paren(paren) => Self::parse(&paren.elem),
            Type::Group(group) => Self::parse(&group.elem),
            Type::Reference(_) => Err(ParseError::UnsupportedType(
                "References; entities own their data".to_string(),
            )),
            Type::Tuple(_) => Err(ParseError::UnsupportedType("Tuples".to_string())),
            Type::Array(_) | Type::Slice(_) => Err(ParseError::UnsupportedType(
                "Arrays and slices; use Vec<T>".to_string(),
            )),
            _ => Err(ParseError::UnsupportedType(
                "Only named types are supported".to_string(),
            )),
        }
    }

    fn parse_path(ty: &Type, path: &syn::Path) -> Result<FieldType, ParseError> {
        let segment = path.segments.last().ok_or(ParseError::EmptyPath)?;
        let ident = segment.ident.to_string();

        let kind = match ident.as_str() {
            "String" => FieldType::String,
            "bool" => FieldType::Boolean,
            "f32" | "f64" => FieldType::Float,
            "i8" => FieldType::Integer { signed: true, bits: 8 },
            "i16" => FieldType::Integer { signed: true, bits: 16 },
            "i32" => FieldType::Integer { signed: true, bits: 32 },
            "i64" | "isize" => FieldType::Integer { signed: true, bits: 64 },
            "i128" => FieldType::Integer { signed: true, bits: 128 },
            "u8" => FieldType::Integer { signed: false, bits: 8 },
            "u16" => FieldType::Integer { signed: false, bits: 16 },
            "u32" => FieldType::Integer { signed: false, bits: 32 },
            "u64" | "usize" => FieldType::Integer { signed: false, bits: 64 },
            "u128" => FieldType::Integer { signed: false, bits: 128 },
            "Option" => FieldType::Optional(Box::new(Self::parse(Self::single_generic(
                &ident,
                &segment.arguments,
            )?)?)),
            "Vec" => FieldType::Array(Box::new(Self::parse(Self::single_generic(
                &ident,
                &segment.arguments,
            )?)?)),
            "Box" => Self::parse(Self::single_generic(&ident, &segment.arguments)?)?,
            _ => FieldType::Entity(ty.clone()),
        };

        Ok(kind)
    }

    fn single_generic<'a>(name: &str, args: &'a PathArguments) -> Result<&'a Type, ParseError> {
        match args {
            PathArguments::AngleBracketed(angle) => angle
                .args
                .iter()
                .find_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(ty),
                    _ => None,
                })
                .ok_or_else(|| ParseError::MissingGeneric(name.to_string())),
            _ => Err(ParseError::MissingGeneric(name.to_string())),
        }
    }
}
