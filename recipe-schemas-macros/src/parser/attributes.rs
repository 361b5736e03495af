//! Attribute parsing using darling.
//!
//! This module defines the structures for `#[schema(...)]` attributes on
//! containers (structs/enums), fields, and variants.
//!
//! Checks take either a bare value or a value and a message:
//!
//! ```rust,ignore
//! #[schema(trim, min_length = 2, max_length(100, "too long"))]
//! #[schema(email("bad address"), int, min(1, "at least one"))]
//! ```

use darling::ast::NestedMeta;
use darling::{FromDeriveInput, FromField, FromMeta, FromVariant};
use syn::{Expr, ExprLit, ExprUnary, Ident, Lit, Type, UnOp, Visibility};

/// Container-level attributes for structs and enums.
/// Parsed from `#[schema(...)]` on the type definition.
#[derive(Debug, Clone, FromDeriveInput)]
#[darling(attributes(schema), supports(struct_named, enum_unit))]
pub struct ContainerAttrs {
    /// The identifier of the type
    pub ident: Ident,

    /// Visibility of the type
    pub vis: Visibility,

    /// Rename the type in the browser contract
    #[darling(default)]
    pub rename: Option<String>,

    /// Rename all fields using a case convention
    #[darling(default)]
    pub rename_all: Option<RenameRule>,

    /// Object message (missing key / not an object) or picklist message
    #[darling(default)]
    pub message: Option<String>,

    /// Also generate a partial variant under this name
    #[darling(default)]
    pub partial: Option<Ident>,

    /// Cross-field equality checks
    #[darling(multiple)]
    pub equal: Vec<EqualAttrs>,
}

impl ContainerAttrs {
    /// Get the type name (renamed or original).
    pub fn type_name(&self) -> String {
        self.rename
            .clone()
            .unwrap_or_else(|| self.ident.to_string())
    }
}

/// `equal(source = "password", target = "confirmPassword", message = "...")`
#[derive(Debug, Clone, FromMeta)]
pub struct EqualAttrs {
    pub source: String,
    pub target: String,
    pub message: String,
}

/// Checks for a single leaf value. Shared by fields and by `items(...)`.
#[derive(Debug, Clone, Default, FromMeta)]
#[darling(default)]
pub struct RuleAttrs {
    /// Type-mismatch message
    pub message: Option<String>,

    /// Trim surrounding whitespace
    pub trim: bool,

    /// Lower-case the value
    pub lowercase: bool,

    /// Email format
    pub email: Option<Check>,

    /// Regular expression the whole value must match
    pub pattern: Option<Bound<String>>,

    /// Minimum length in UTF-16 units
    pub min_length: Option<Bound<usize>>,

    /// Maximum length in UTF-16 units
    pub max_length: Option<Bound<usize>>,

    /// Whole number
    pub int: Option<Check>,

    /// Inclusive minimum value
    pub min: Option<Bound<f64>>,

    /// Inclusive maximum value
    pub max: Option<Bound<f64>>,
}

impl RuleAttrs {
    pub fn has_string_steps(&self) -> bool {
        self.trim
            || self.lowercase
            || self.email.is_some()
            || self.pattern.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
    }

    pub fn has_number_steps(&self) -> bool {
        self.int.is_some() || self.min.is_some() || self.max.is_some()
    }
}

/// Field-level attributes parsed from `#[schema(...)]` on struct fields.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(schema))]
pub struct FieldAttrs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Rename this field on the wire
    #[darling(default)]
    pub rename: Option<String>,

    /// Merge the fields of another entity into this one
    #[darling(default)]
    pub flatten: bool,

    /// Value substituted when the key is absent
    #[darling(default)]
    pub default: Option<DefaultValue>,

    /// Minimum number of list items
    #[darling(default)]
    pub min_items: Option<Bound<usize>>,

    /// Maximum number of list items
    #[darling(default)]
    pub max_items: Option<Bound<usize>>,

    /// Checks for each list item
    #[darling(default)]
    pub items: Option<RuleAttrs>,

    /// Checks for the value itself
    #[darling(flatten)]
    pub rules: RuleAttrs,
}

impl FieldAttrs {
    /// Wire name for this field.
    pub fn wire_name(&self, rename_rule: Option<RenameRule>) -> String {
        if let Some(ref name) = self.rename {
            return name.clone();
        }

        match (&self.ident, rename_rule) {
            (Some(ident), Some(rule)) => rule.apply(&ident.to_string()),
            (Some(ident), None) => ident.to_string(),
            (None, _) => String::new(),
        }
    }
}

/// Variant-level attributes for unit enum variants.
#[derive(Debug, Clone, FromVariant)]
#[darling(attributes(schema))]
pub struct VariantAttrs {
    /// Variant identifier
    pub ident: Ident,

    /// Rename this variant
    #[darling(default)]
    pub rename: Option<String>,
}

impl VariantAttrs {
    /// Literal used for this variant on the wire.
    pub fn wire_name(&self, rename_rule: Option<RenameRule>) -> String {
        if let Some(ref name) = self.rename {
            return name.clone();
        }

        let name = self.ident.to_string();
        match rename_rule {
            Some(rule) => rule.apply(&name),
            None => name,
        }
    }
}

/// A flag check with an optional message: `email` or `email = "msg"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Check {
    pub message: Option<String>,
}

impl FromMeta for Check {
    fn from_word() -> darling::Result<Self> {
        Ok(Self::default())
    }

    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(Self {
            message: Some(value.to_string()),
        })
    }

    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        match items {
            [NestedMeta::Lit(Lit::Str(message))] => Self::from_string(&message.value()),
            _ => Err(darling::Error::custom("expected `(\"message\")`")),
        }
    }
}

/// A literal a check can be parameterized with.
pub trait LitValue: Sized {
    fn from_lit(lit: &Lit) -> darling::Result<Self>;

    /// Value of `-lit`; only signed values accept it.
    fn from_negated_lit(lit: &Lit) -> darling::Result<Self> {
        Err(darling::Error::custom("value cannot be negative").with_span(lit))
    }
}

impl LitValue for usize {
    fn from_lit(lit: &Lit) -> darling::Result<Self> {
        match lit {
            Lit::Int(int) => int.base10_parse().map_err(darling::Error::from),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        }
    }
}

impl LitValue for f64 {
    fn from_lit(lit: &Lit) -> darling::Result<Self> {
        match lit {
            Lit::Int(int) => int.base10_parse().map_err(darling::Error::from),
            Lit::Float(float) => float.base10_parse().map_err(darling::Error::from),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        }
    }

    fn from_negated_lit(lit: &Lit) -> darling::Result<Self> {
        Self::from_lit(lit).map(|value| -value)
    }
}

impl LitValue for String {
    fn from_lit(lit: &Lit) -> darling::Result<Self> {
        match lit {
            Lit::Str(s) => Ok(s.value()),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        }
    }
}

/// A parameterized check: `min_length = 2` or `min_length(2, "msg")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
    pub value: T,
    pub message: Option<String>,
}

impl<T: LitValue> FromMeta for Bound<T> {
    fn from_value(lit: &Lit) -> darling::Result<Self> {
        Ok(Self {
            value: T::from_lit(lit)?,
            message: None,
        })
    }

    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Lit(ExprLit { lit, .. }) => Self::from_value(lit),
            Expr::Group(group) => Self::from_expr(&group.expr),
            // `min = -1`
            Expr::Unary(ExprUnary { op: UnOp::Neg(_), expr, .. }) => match expr.as_ref() {
                Expr::Lit(ExprLit { lit, .. }) => Ok(Self {
                    value: T::from_negated_lit(lit)?,
                    message: None,
                }),
                other => Err(darling::Error::unexpected_expr_type(other)),
            },
            other => Err(darling::Error::unexpected_expr_type(other)),
        }
    }

    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        match items {
            [NestedMeta::Lit(value)] => Self::from_value(value),
            [NestedMeta::Lit(value), NestedMeta::Lit(Lit::Str(message))] => Ok(Self {
                value: T::from_lit(value)?,
                message: Some(message.value()),
            }),
            _ => Err(darling::Error::custom(
                "expected `(value)` or `(value, \"message\")`",
            )),
        }
    }
}

/// A literal default: `default = ""`, `default = false`, `default = "Parve"`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue(pub Lit);

impl FromMeta for DefaultValue {
    fn from_value(lit: &Lit) -> darling::Result<Self> {
        match lit {
            Lit::Str(_) | Lit::Bool(_) | Lit::Int(_) | Lit::Float(_) => Ok(Self(lit.clone())),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        }
    }
}

/// Rename rule for field/variant name transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromMeta)]
pub enum RenameRule {
    /// lowercase
    #[darling(rename = "lowercase")]
    Lowercase,

    /// camelCase
    #[darling(rename = "camelCase")]
    CamelCase,

    /// snake_case
    #[darling(rename = "snake_case")]
    SnakeCase,

    /// PascalCase
    #[darling(rename = "PascalCase")]
    PascalCase,

    /// SCREAMING_SNAKE_CASE
    #[darling(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,

    /// kebab-case
    #[darling(rename = "kebab-case")]
    KebabCase,
}

impl RenameRule {
    /// Apply the rename rule to a string.
    pub fn apply(&self, name: &str) -> String {
        use convert_case::{Case, Casing};

        match self {
            RenameRule::Lowercase => name.to_lowercase(),
            RenameRule::CamelCase => name.to_case(Case::Camel),
            RenameRule::SnakeCase => name.to_case(Case::Snake),
            RenameRule::PascalCase => name.to_case(Case::Pascal),
            RenameRule::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            RenameRule::KebabCase => name.to_case(Case::Kebab),
        }
    }
}
