//! Primitive field rules.
//!
//! A rule takes one raw JSON value and either rejects its type outright or
//! produces a normalized value, possibly with the first constraint it
//! violated. Steps run in insertion order and the first failing check ends
//! the chain for that value.
//!
//! Two details keep the server in step with the browser form layer:
//! lengths are counted in UTF-16 code units, and trimming removes exactly
//! the characters `String.prototype.trim` removes.

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

use crate::error::{SchemaError, SchemaResult};
use crate::issue::IssueKind;
use crate::messages;

/// Email shape. The browser contract emits this same pattern, so both
/// sides accept exactly the same addresses.
pub const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_+-]+(?:\.[A-Za-z0-9_+-]+)*@[0-9A-Za-z]+(?:[.-][0-9A-Za-z]+)*\.[A-Za-z]{2,}$";

/// 24 hexadecimal characters, the shape of a document-store identifier.
pub const OBJECT_ID_PATTERN: &str = "^[0-9a-fA-F]{24}$";

/// Largest integer both runtimes represent exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A compiled regular expression that compares and serializes as its source.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> SchemaResult<Self> {
        let regex = Regex::new(source).map_err(|source_err| SchemaError::InvalidPattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A failed check: what kind, and the message to report.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Violation {
    pub kind: IssueKind,
    pub message: String,
}

impl Violation {
    fn new(kind: IssueKind, message: &str) -> Self {
        trace!(kind = %kind, "Rule check failed");
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// What applying a rule to one value produced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RuleOutcome {
    /// The raw value has the wrong type. The output is untyped.
    Mismatch(Violation),
    /// The value has the right type and was normalized. A constraint may
    /// still have failed; the output stays typed either way.
    Parsed {
        value: Value,
        violation: Option<Violation>,
    },
}

impl RuleOutcome {
    fn ok(value: Value) -> Self {
        Self::Parsed {
            value,
            violation: None,
        }
    }

    fn failed(value: Value, kind: IssueKind, message: &str) -> Self {
        Self::Parsed {
            value,
            violation: Some(Violation::new(kind, message)),
        }
    }
}

// =============================================================================
// Strings
// =============================================================================

/// A normalization or check on a string value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StringStep {
    Trim,
    ToLowerCase,
    Email { pattern: Pattern, message: String },
    Pattern { pattern: Pattern, message: String },
    MinLength { length: usize, message: String },
    MaxLength { length: usize, message: String },
}

/// A string with an ordered pipeline of steps.
///
/// # Example
/// ```rust
/// use recipe_schemas::rules::StringRule;
///
/// let rule = StringRule::new()
///     .trim()
///     .min_length(2, "too short")
///     .max_length(100, "too long");
/// assert_eq!(rule.steps.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringRule {
    /// Reported when the raw value is not a string
    pub message: String,
    pub steps: Vec<StringStep>,
}

impl Default for StringRule {
    fn default() -> Self {
        Self::new()
    }
}

impl StringRule {
    pub fn new() -> Self {
        Self {
            message: messages::INVALID_STRING.to_string(),
            steps: Vec::new(),
        }
    }

    /// Override the type-mismatch message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn trim(mut self) -> Self {
        self.steps.push(StringStep::Trim);
        self
    }

    pub fn to_lowercase(mut self) -> Self {
        self.steps.push(StringStep::ToLowerCase);
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> SchemaResult<Self> {
        self.steps.push(StringStep::Email {
            pattern: Pattern::new(EMAIL_PATTERN)?,
            message: message.into(),
        });
        Ok(self)
    }

    pub fn pattern(mut self, source: &str, message: impl Into<String>) -> SchemaResult<Self> {
        self.steps.push(StringStep::Pattern {
            pattern: Pattern::new(source)?,
            message: message.into(),
        });
        Ok(self)
    }

    pub fn min_length(mut self, length: usize, message: impl Into<String>) -> Self {
        self.steps.push(StringStep::MinLength {
            length,
            message: message.into(),
        });
        self
    }

    pub fn max_length(mut self, length: usize, message: impl Into<String>) -> Self {
        self.steps.push(StringStep::MaxLength {
            length,
            message: message.into(),
        });
        self
    }

    pub(crate) fn apply(&self, input: &Value) -> RuleOutcome {
        let Value::String(raw) = input else {
            return RuleOutcome::Mismatch(Violation::new(IssueKind::Type, &self.message));
        };

        let mut value = raw.clone();
        for step in &self.steps {
            let failure = match step {
                StringStep::Trim => {
                    value = js_trim(&value).to_string();
                    None
                }
                StringStep::ToLowerCase => {
                    value = value.to_lowercase();
                    None
                }
                StringStep::Email { pattern, message } => {
                    (!pattern.is_match(&value)).then_some((IssueKind::Email, message))
                }
                StringStep::Pattern { pattern, message } => {
                    (!pattern.is_match(&value)).then_some((IssueKind::Pattern, message))
                }
                StringStep::MinLength { length, message } => {
                    (utf16_len(&value) < *length).then_some((IssueKind::MinLength, message))
                }
                StringStep::MaxLength { length, message } => {
                    (utf16_len(&value) > *length).then_some((IssueKind::MaxLength, message))
                }
            };

            if let Some((kind, message)) = failure {
                return RuleOutcome::failed(Value::String(value), kind, message);
            }
        }

        RuleOutcome::ok(Value::String(value))
    }
}

/// Length as the browser counts it.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Trim the characters `String.prototype.trim` trims: Unicode white space
/// except U+0085, plus the byte-order mark.
pub fn js_trim(value: &str) -> &str {
    value.trim_matches(is_js_whitespace)
}

fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

// =============================================================================
// Numbers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum NumberStep {
    Integer { message: String },
    MinValue { value: f64, message: String },
    MaxValue { value: f64, message: String },
}

/// A finite number with an ordered pipeline of checks.
///
/// Integral values are emitted as JSON integers, so `3.0` becomes `3`
/// exactly as it would after a round trip through the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberRule {
    pub message: String,
    pub steps: Vec<NumberStep>,
}

impl Default for NumberRule {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberRule {
    pub fn new() -> Self {
        Self {
            message: messages::INVALID_NUMBER.to_string(),
            steps: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn integer(mut self, message: impl Into<String>) -> Self {
        self.steps.push(NumberStep::Integer {
            message: message.into(),
        });
        self
    }

    pub fn min_value(mut self, value: f64, message: impl Into<String>) -> Self {
        self.steps.push(NumberStep::MinValue {
            value,
            message: message.into(),
        });
        self
    }

    pub fn max_value(mut self, value: f64, message: impl Into<String>) -> Self {
        self.steps.push(NumberStep::MaxValue {
            value,
            message: message.into(),
        });
        self
    }

    /// The `(min, max)` bounds, if declared.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        let mut bounds = (None, None);
        for step in &self.steps {
            match step {
                NumberStep::MinValue { value, .. } => bounds.0 = Some(*value),
                NumberStep::MaxValue { value, .. } => bounds.1 = Some(*value),
                NumberStep::Integer { .. } => {}
            }
        }
        bounds
    }

    pub(crate) fn apply(&self, input: &Value) -> RuleOutcome {
        let Some(number) = input.as_f64().filter(|n| n.is_finite()) else {
            return RuleOutcome::Mismatch(Violation::new(IssueKind::Type, &self.message));
        };

        let value = number_value(number, input);
        for step in &self.steps {
            let failure = match step {
                NumberStep::Integer { message } => {
                    (number.fract() != 0.0).then_some((IssueKind::Integer, message))
                }
                NumberStep::MinValue { value, message } => {
                    (number < *value).then_some((IssueKind::MinValue, message))
                }
                NumberStep::MaxValue { value, message } => {
                    (number > *value).then_some((IssueKind::MaxValue, message))
                }
            };

            if let Some((kind, message)) = failure {
                return RuleOutcome::failed(value, kind, message);
            }
        }

        RuleOutcome::ok(value)
    }
}

fn number_value(number: f64, original: &Value) -> Value {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return Value::from(number as i64);
    }
    match serde_json::Number::from_f64(number) {
        Some(n) => Value::Number(n),
        None => original.clone(),
    }
}

// =============================================================================
// Booleans and picklists
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanRule {
    pub message: String,
}

impl Default for BooleanRule {
    fn default() -> Self {
        Self {
            message: messages::INVALID_BOOLEAN.to_string(),
        }
    }
}

impl BooleanRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn apply(&self, input: &Value) -> RuleOutcome {
        match input {
            Value::Bool(_) => RuleOutcome::ok(input.clone()),
            _ => RuleOutcome::Mismatch(Violation::new(IssueKind::Type, &self.message)),
        }
    }
}

/// One of a closed set of string literals. Anything else, including a
/// value of another type, is a mismatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicklistRule {
    pub options: Vec<String>,
    pub message: String,
}

impl PicklistRule {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            message: messages::INVALID_OPTION.to_string(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }

    pub(crate) fn apply(&self, input: &Value) -> RuleOutcome {
        match input.as_str() {
            Some(value) if self.contains(value) => RuleOutcome::ok(input.clone()),
            _ => RuleOutcome::Mismatch(Violation::new(IssueKind::Picklist, &self.message)),
        }
    }
}
