//! The schema data model.
//!
//! A [`Schema`] is plain data: a tagged tree the executor walks with a
//! single `match`. Schemas are built once, verified once, and never mutated
//! afterwards, so a `&'static Schema` can be shared freely between threads.
//!
//! # Example
//! ```rust
//! use recipe_schemas::rules::{NumberRule, StringRule};
//! use recipe_schemas::schema::{ObjectSchema, Schema};
//!
//! let schema: Schema = ObjectSchema::new()
//!     .message("rating required")
//!     .field("rating", NumberRule::new().min_value(0.0, "min").max_value(5.0, "max"))
//!     .into();
//! schema.verify().unwrap();
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};
use crate::executor;
use crate::issue::{Issue, IssueKind, PathSegment};
use crate::messages;
use crate::rules::{BooleanRule, NumberRule, PicklistRule, StringRule, StringStep};

/// A node in a schema tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schema {
    String(StringRule),
    Number(NumberRule),
    Boolean(BooleanRule),
    Picklist(PicklistRule),
    Array(ArraySchema),
    Object(ObjectSchema),
    Optional(OptionalSchema),
    Checked(CheckedSchema),
}

impl Schema {
    /// Wrap in an optional without a default: an absent key produces no
    /// violation and no output key.
    pub fn optional(inner: impl Into<Schema>) -> Self {
        Self::Optional(OptionalSchema {
            inner: Box::new(inner.into()),
            default: None,
        })
    }

    /// Wrap in an optional whose absent key is replaced by `default`, which
    /// then goes through the wrapped schema like any present value.
    pub fn optional_with_default(inner: impl Into<Schema>, default: impl Into<Value>) -> Self {
        Self::Optional(OptionalSchema {
            inner: Box::new(inner.into()),
            default: Some(default.into()),
        })
    }

    /// Add a cross-field check, wrapping the schema if it has none yet.
    pub fn checked(self, check: CrossCheck) -> Self {
        match self {
            Self::Checked(mut checked) => {
                checked.checks.push(check);
                Self::Checked(checked)
            }
            other => Self::Checked(CheckedSchema {
                inner: Box::new(other),
                checks: vec![check],
            }),
        }
    }

    /// The object at the heart of this schema, looking through cross-field
    /// checks.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            Self::Checked(checked) => checked.inner.as_object(),
            _ => None,
        }
    }

    /// The partial variant of an object schema. Cross-field checks are not
    /// carried over, since they cannot hold over absent fields.
    pub fn partial(&self) -> SchemaResult<Schema> {
        self.as_object()
            .map(|object| Schema::Object(object.partial()))
            .ok_or(SchemaError::NotAnObject {
                path: "$".to_string(),
                operation: "partial",
            })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Picklist(_) => "picklist",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Optional(_) => "optional",
            Self::Checked(_) => "checked",
        }
    }

    /// Check the definition itself. A schema that fails here is a
    /// programmer error, not a data error.
    pub fn verify(&self) -> SchemaResult<()> {
        self.verify_at("$")
    }

    fn verify_at(&self, path: &str) -> SchemaResult<()> {
        match self {
            Self::String(rule) => {
                let (mut min, mut max) = (None, None);
                for step in &rule.steps {
                    match step {
                        StringStep::MinLength { length, .. } => min = Some(*length),
                        StringStep::MaxLength { length, .. } => max = Some(*length),
                        _ => {}
                    }
                }
                check_bounds(path, min.map(|n| n as f64), max.map(|n| n as f64))
            }
            Self::Number(rule) => {
                let (min, max) = rule.bounds();
                check_bounds(path, min, max)
            }
            Self::Boolean(_) => Ok(()),
            Self::Picklist(rule) => {
                if rule.options.is_empty() {
                    return Err(SchemaError::EmptyPicklist {
                        path: path.to_string(),
                    });
                }
                Ok(())
            }
            Self::Array(array) => {
                array.item.verify_at(&format!("{}[]", path))?;
                let (min, max) = array.bounds();
                check_bounds(path, min.map(|n| n as f64), max.map(|n| n as f64))
            }
            Self::Object(object) => {
                let mut seen = HashSet::new();
                for field in &object.fields {
                    if !seen.insert(field.key.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            path: path.to_string(),
                            key: field.key.clone(),
                        });
                    }
                    field.schema.verify_at(&format!("{}.{}", path, field.key))?;
                }
                Ok(())
            }
            Self::Optional(optional) => {
                optional.inner.verify_at(path)?;
                if let Some(default) = &optional.default {
                    let output = executor::safe_parse(&optional.inner, default);
                    if let Some(issue) = output.issues.first() {
                        return Err(SchemaError::InvalidDefault {
                            path: path.to_string(),
                            message: issue.message.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::Checked(checked) => {
                checked.inner.verify_at(path)?;
                let object = checked.inner.as_object().ok_or(SchemaError::NotAnObject {
                    path: path.to_string(),
                    operation: "cross-field check",
                })?;
                for check in &checked.checks {
                    for key in check.keys() {
                        if object.get(key).is_none() {
                            return Err(SchemaError::UnknownField {
                                path: path.to_string(),
                                key: key.to_string(),
                            });
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn check_bounds(path: &str, lower: Option<f64>, upper: Option<f64>) -> SchemaResult<()> {
    match (lower, upper) {
        (Some(lower), Some(upper)) if lower > upper => Err(SchemaError::InvalidBounds {
            path: path.to_string(),
            lower,
            upper,
        }),
        _ => Ok(()),
    }
}

impl From<StringRule> for Schema {
    fn from(rule: StringRule) -> Self {
        Self::String(rule)
    }
}

impl From<NumberRule> for Schema {
    fn from(rule: NumberRule) -> Self {
        Self::Number(rule)
    }
}

impl From<BooleanRule> for Schema {
    fn from(rule: BooleanRule) -> Self {
        Self::Boolean(rule)
    }
}

impl From<PicklistRule> for Schema {
    fn from(rule: PicklistRule) -> Self {
        Self::Picklist(rule)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Self::Array(schema)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}

// =============================================================================
// Arrays
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum ArrayCheck {
    MinItems { length: usize, message: String },
    MaxItems { length: usize, message: String },
}

/// A list whose every item follows `item`. Item-count checks only run when
/// every item is structurally valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySchema {
    pub item: Box<Schema>,
    pub message: String,
    pub checks: Vec<ArrayCheck>,
}

impl ArraySchema {
    pub fn new(item: impl Into<Schema>) -> Self {
        Self {
            item: Box::new(item.into()),
            message: messages::INVALID_ARRAY.to_string(),
            checks: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn min_items(mut self, length: usize, message: impl Into<String>) -> Self {
        self.checks.push(ArrayCheck::MinItems {
            length,
            message: message.into(),
        });
        self
    }

    pub fn max_items(mut self, length: usize, message: impl Into<String>) -> Self {
        self.checks.push(ArrayCheck::MaxItems {
            length,
            message: message.into(),
        });
        self
    }

    fn bounds(&self) -> (Option<usize>, Option<usize>) {
        let mut bounds = (None, None);
        for check in &self.checks {
            match check {
                ArrayCheck::MinItems { length, .. } => bounds.0 = Some(*length),
                ArrayCheck::MaxItems { length, .. } => bounds.1 = Some(*length),
            }
        }
        bounds
    }
}

// =============================================================================
// Objects
// =============================================================================

/// One named entry of an object schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub schema: Schema,
}

/// An ordered mapping from key to schema.
///
/// `message` is reported when the input is not an object and when a
/// required key is absent. Keys the schema does not name are dropped from
/// the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub message: String,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            message: messages::INVALID_OBJECT.to_string(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            key: key.into(),
            schema: schema.into(),
        });
        self
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.schema)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    /// Append every field of `other`, in order.
    pub fn extend(mut self, other: &ObjectSchema) -> Self {
        self.fields.extend(other.fields.iter().cloned());
        self
    }

    /// Every field becomes optional. Defaults are dropped: an absent field
    /// is omitted from the output rather than filled in.
    pub fn partial(&self) -> ObjectSchema {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let inner = match &field.schema {
                    Schema::Optional(optional) => optional.inner.as_ref().clone(),
                    other => other.clone(),
                };
                Field {
                    key: field.key.clone(),
                    schema: Schema::optional(inner),
                }
            })
            .collect();

        ObjectSchema {
            fields,
            message: self.message.clone(),
        }
    }
}

// =============================================================================
// Optional and cross-checked wrappers
// =============================================================================

/// A field that may be absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionalSchema {
    pub inner: Box<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// A check across several fields of a parsed object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CrossCheck {
    /// `target` must equal `source`; a mismatch is reported on `target`.
    Equal {
        source: String,
        target: String,
        message: String,
    },
}

impl CrossCheck {
    pub fn equal(
        source: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Equal {
            source: source.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Keys this check reads.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Equal { source, target, .. } => vec![source.as_str(), target.as_str()],
        }
    }

    /// Run the check against a structurally valid object.
    pub fn evaluate(&self, object: &Map<String, Value>) -> Option<Issue> {
        match self {
            Self::Equal {
                source,
                target,
                message,
            } => (object.get(source) != object.get(target)).then(|| {
                Issue::new(
                    IssueKind::Check,
                    message.clone(),
                    vec![PathSegment::Key(target.clone())],
                )
            }),
        }
    }
}

/// An object schema with cross-field checks that run once the object is
/// structurally valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckedSchema {
    pub inner: Box<Schema>,
    pub checks: Vec<CrossCheck>,
}
