//! Field type representation.

use syn::Type;

/// Largest integer both runtimes represent exactly (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The shape of a field's Rust type, as far as validation cares.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// `String`
    String,
    /// `bool`
    Boolean,
    /// `f32`, `f64`
    Float,
    /// Any primitive integer; validated as a whole number within the
    /// range of its width
    Integer { signed: bool, bits: u32 },
    /// `Vec<T>`
    Array(Box<FieldType>),
    /// `Option<T>`
    Optional(Box<FieldType>),
    /// Another type implementing `EntitySchema`
    Entity(Type),
}

impl FieldType {
    /// Human-readable name for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "bool",
            Self::Float => "float",
            Self::Integer { .. } => "integer",
            Self::Array(_) => "Vec",
            Self::Optional(_) => "Option",
            Self::Entity(_) => "entity",
        }
    }

    /// Strip `Option` wrappers.
    pub fn leaf(&self) -> &FieldType {
        match self {
            Self::Optional(inner) => inner.leaf(),
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Inclusive value range of an integer type, clamped to the exactly
    /// representable integers.
    pub fn integer_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Integer { signed, bits } => {
                let bits = *bits as i32;
                let (min, max) = if *signed {
                    let half = 2f64.powi(bits - 1);
                    (-half, half - 1.0)
                } else {
                    (0.0, 2f64.powi(bits) - 1.0)
                };
                Some((min.max(-MAX_SAFE_INTEGER), max.min(MAX_SAFE_INTEGER)))
            }
            _ => None,
        }
    }
}
