//! Entity IR: what one derive input describes.

use proc_macro2::Span;
use syn::{Ident, Lit, Type, Visibility};

use super::types::FieldType;

/// One normalization or check, in the order the generated rule runs it.
#[derive(Debug, Clone, PartialEq)]
pub enum StepIR {
    Trim,
    Lowercase,
    Email(Option<String>),
    Pattern(String, Option<String>),
    MinLength(usize, Option<String>),
    MaxLength(usize, Option<String>),
    Integer(Option<String>),
    MinValue(f64, Option<String>),
    MaxValue(f64, Option<String>),
}

/// The checks applied to a leaf value (string, number, bool).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleIR {
    /// Type-mismatch message
    pub message: Option<String>,
    pub steps: Vec<StepIR>,
}

/// Item-count checks on a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListIR {
    pub min_items: Option<(usize, Option<String>)>,
    pub max_items: Option<(usize, Option<String>)>,
}

/// A parsed struct field.
#[derive(Debug, Clone)]
pub struct FieldIR {
    pub ident: Ident,
    /// Key on the wire
    pub wire_name: String,
    /// The Rust type as written; the output type
    pub ty: Type,
    pub field_type: FieldType,
    /// Checks on the value, or on the element of a list
    pub rules: RuleIR,
    /// Checks on list items when the field is a list
    pub items: RuleIR,
    pub list: ListIR,
    pub default: Option<Lit>,
    pub flatten: bool,
    pub span: Span,
}

impl FieldIR {
    /// Absent keys are accepted.
    pub fn is_optional_on_input(&self) -> bool {
        self.default.is_some() || self.field_type.is_optional()
    }
}

#[derive(Debug, Clone)]
pub struct EqualCheckIR {
    pub source: String,
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ObjectIR {
    pub fields: Vec<FieldIR>,
    pub checks: Vec<EqualCheckIR>,
    /// Name of the generated partial variant, if requested
    pub partial: Option<Ident>,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Object(ObjectIR),
    /// Unit-only enum: `(variant, wire literal)` pairs
    Picklist(Vec<(Ident, String)>),
}

/// Everything the generator needs for one derive input.
#[derive(Debug, Clone)]
pub struct EntityIR {
    pub ident: Ident,
    pub vis: Visibility,
    /// Type name in the browser contract
    pub type_name: String,
    pub message: Option<String>,
    pub kind: EntityKind,
}

impl EntityIR {
    pub fn schema_name(&self) -> String {
        format!("{}Schema", self.type_name)
    }

    pub fn input_ident(&self) -> Ident {
        Ident::new(&format!("{}Input", self.ident), self.ident.span())
    }
}
