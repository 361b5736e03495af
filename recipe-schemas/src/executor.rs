//! The validation executor.
//!
//! [`validate`] is the single place schema semantics are interpreted. It
//! walks a [`Schema`] against an untrusted JSON value, collects every
//! violation it meets, and flattens them to one message per field.
//!
//! A walk produces a *dataset*: the normalized value plus a `typed` flag.
//! Structural problems (wrong primitive type, missing required key, value
//! outside a picklist) clear the flag; constraint failures do not. Item
//! count checks and cross-field checks only run on typed datasets.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, trace};

use crate::issue::{Issue, IssueKind, PathSegment};
use crate::messages;
use crate::result::{FieldErrors, ROOT_ERROR_KEY, ValidationResult};
use crate::rules::RuleOutcome;
use crate::schema::{ArrayCheck, ArraySchema, CheckedSchema, ObjectSchema, Schema};
use crate::traits::EntitySchema;

/// Everything a walk produced, before flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// The normalized value. Only meaningful when `issues` is empty.
    pub value: Option<Value>,
    /// Whether the value is structurally of the schema's shape.
    pub typed: bool,
    /// Every violation, in schema-definition order.
    pub issues: Vec<Issue>,
}

impl ParseOutput {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug)]
struct Dataset {
    value: Option<Value>,
    typed: bool,
}

impl Dataset {
    fn typed(value: Value) -> Self {
        Self {
            value: Some(value),
            typed: true,
        }
    }

    fn untyped() -> Self {
        Self {
            value: None,
            typed: false,
        }
    }
}

#[derive(Default)]
struct Walker {
    issues: Vec<Issue>,
    path: Vec<PathSegment>,
}

impl Walker {
    fn report(&mut self, kind: IssueKind, message: &str) {
        self.issues
            .push(Issue::new(kind, message, self.path.clone()));
    }

    fn run(&mut self, schema: &Schema, input: &Value) -> Dataset {
        match schema {
            Schema::String(rule) => self.rule(rule.apply(input)),
            Schema::Number(rule) => self.rule(rule.apply(input)),
            Schema::Boolean(rule) => self.rule(rule.apply(input)),
            Schema::Picklist(rule) => self.rule(rule.apply(input)),
            Schema::Array(array) => self.array(array, input),
            Schema::Object(object) => self.object(object, input),
            // Presence is decided by the enclosing object; a value that
            // reaches here is present.
            Schema::Optional(optional) => self.run(&optional.inner, input),
            Schema::Checked(checked) => self.checked(checked, input),
        }
    }

    fn rule(&mut self, outcome: RuleOutcome) -> Dataset {
        match outcome {
            RuleOutcome::Mismatch(violation) => {
                self.report(violation.kind, &violation.message);
                Dataset::untyped()
            }
            RuleOutcome::Parsed { value, violation } => {
                if let Some(violation) = violation {
                    self.report(violation.kind, &violation.message);
                }
                Dataset::typed(value)
            }
        }
    }

    fn array(&mut self, schema: &ArraySchema, input: &Value) -> Dataset {
        let Value::Array(items) = input else {
            self.report(IssueKind::Type, &schema.message);
            return Dataset::untyped();
        };

        let mut typed = true;
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            let dataset = self.run(&schema.item, item);
            self.path.pop();

            typed &= dataset.typed;
            output.push(dataset.value.unwrap_or(Value::Null));
        }

        if typed {
            for check in &schema.checks {
                let failed = match check {
                    ArrayCheck::MinItems { length, message } => {
                        (items.len() < *length).then_some((IssueKind::MinItems, message))
                    }
                    ArrayCheck::MaxItems { length, message } => {
                        (items.len() > *length).then_some((IssueKind::MaxItems, message))
                    }
                };
                if let Some((kind, message)) = failed {
                    self.report(kind, message);
                    break;
                }
            }
        }

        Dataset {
            value: Some(Value::Array(output)),
            typed,
        }
    }

    fn object(&mut self, schema: &ObjectSchema, input: &Value) -> Dataset {
        let Value::Object(entries) = input else {
            self.report(IssueKind::Type, &schema.message);
            return Dataset::untyped();
        };

        let mut typed = true;
        let mut output = Map::new();
        for field in &schema.fields {
            self.path.push(PathSegment::Key(field.key.clone()));

            let dataset = match (entries.get(&field.key), &field.schema) {
                (Some(value), field_schema) => Some(self.run(field_schema, value)),
                (None, Schema::Optional(optional)) => optional
                    .default
                    .as_ref()
                    .map(|default| self.run(&optional.inner, default)),
                (None, _) => {
                    self.report(IssueKind::Required, &schema.message);
                    Some(Dataset::untyped())
                }
            };

            self.path.pop();

            if let Some(dataset) = dataset {
                typed &= dataset.typed;
                if let Some(value) = dataset.value {
                    output.insert(field.key.clone(), value);
                }
            }
        }

        Dataset {
            value: Some(Value::Object(output)),
            typed,
        }
    }

    fn checked(&mut self, schema: &CheckedSchema, input: &Value) -> Dataset {
        let dataset = self.run(&schema.inner, input);

        if let (true, Some(Value::Object(object))) = (dataset.typed, &dataset.value) {
            for check in &schema.checks {
                if let Some(mut issue) = check.evaluate(object) {
                    let mut path = self.path.clone();
                    path.append(&mut issue.path);
                    issue.path = path;
                    trace!(field = ?issue.field(), "Cross-field check failed");
                    self.issues.push(issue);
                }
            }
        }

        dataset
    }
}

/// Walk `schema` against `input` and return every violation unflattened.
pub fn safe_parse(schema: &Schema, input: &Value) -> ParseOutput {
    let mut walker = Walker::default();
    let dataset = walker.run(schema, input);
    ParseOutput {
        value: dataset.value,
        typed: dataset.typed,
        issues: walker.issues,
    }
}

/// Flatten violations to one message per field.
///
/// Each violation is attributed to the shallowest named field on its path,
/// or to [`ROOT_ERROR_KEY`] when it has none. The first message recorded for
/// a key wins.
pub fn flatten_issues(issues: &[Issue]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for issue in issues {
        errors.insert_first(issue.field().unwrap_or(ROOT_ERROR_KEY), &issue.message);
    }

    if errors.is_empty() {
        if let Some(first) = issues.first() {
            errors.insert_first(ROOT_ERROR_KEY, &first.message);
        }
    }

    errors
}

/// Validate untrusted input against a schema.
///
/// # Example
/// ```rust
/// use recipe_schemas::executor::validate;
/// use recipe_schemas::rules::StringRule;
/// use recipe_schemas::schema::{ObjectSchema, Schema};
/// use serde_json::json;
///
/// let schema: Schema = ObjectSchema::new()
///     .field("name", StringRule::new().trim().min_length(2, "too short"))
///     .into();
///
/// let result = validate(&schema, &json!({ "name": "  Dana " }));
/// assert_eq!(result.data(), Some(&json!({ "name": "Dana" })));
///
/// let result = validate(&schema, &json!({ "name": " D " }));
/// assert_eq!(result.errors().unwrap().get("name"), Some("too short"));
/// ```
pub fn validate(schema: &Schema, input: &Value) -> ValidationResult<Value> {
    let output = safe_parse(schema, input);

    if !output.is_valid() {
        let errors = flatten_issues(&output.issues);
        debug!(
            issue_count = output.issues.len(),
            error_count = errors.len(),
            fields = ?errors.keys().collect::<Vec<_>>(),
            "Validation failed"
        );
        return ValidationResult::Failure(errors);
    }

    match output.value {
        Some(value) => {
            trace!(schema = schema.kind_name(), "Validation passed");
            ValidationResult::Success(value)
        }
        None => {
            error!(
                schema = schema.kind_name(),
                "Validation produced neither a value nor an issue"
            );
            ValidationResult::Failure(FieldErrors::root(messages::INTERNAL_ERROR))
        }
    }
}

/// Validate against an entity's schema and convert the normalized output to
/// the entity type.
pub fn validate_as<T>(input: &Value) -> ValidationResult<T>
where
    T: EntitySchema + DeserializeOwned,
{
    match validate(T::schema(), input) {
        ValidationResult::Success(value) => match serde_json::from_value::<T>(value) {
            Ok(data) => ValidationResult::Success(data),
            Err(err) => {
                error!(
                    entity = T::schema_name(),
                    error = %err,
                    "Validated output does not convert to its entity type"
                );
                ValidationResult::Failure(FieldErrors::root(messages::INTERNAL_ERROR))
            }
        },
        ValidationResult::Failure(errors) => ValidationResult::Failure(errors),
    }
}
