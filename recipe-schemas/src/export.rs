//! Export utilities for generating the browser contract module.
//!
//! The browser form layer validates with valibot. Every registered entity
//! is emitted as a valibot schema carrying the same checks in the same
//! order, with every message spelled out, so a form and a request handler
//! given the same input report the same errors. The emitted `validate()`
//! flattens issues with the same policy as [`crate::executor::validate`].

use serde_json::Value;

use crate::registry::{SchemaEntry, SchemaRegistry};
use crate::result::ROOT_ERROR_KEY;
use crate::rules::{NumberStep, StringStep};
use crate::schema::{ArrayCheck, CrossCheck, Schema};

const INDENT: &str = "  ";

/// Configuration for contract module generation.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Whether to include the valibot import statement.
    pub include_import: bool,

    /// Whether to emit `{Type}Input` / `{Type}Output` aliases.
    pub generate_types: bool,

    /// Whether to emit `ROOT_ERROR_KEY`, `ValidationResult` and `validate()`.
    pub include_runtime: bool,

    /// Custom preamble to add at the top of the file.
    pub preamble: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_import: true,
            generate_types: true,
            include_runtime: true,
            preamble: None,
        }
    }
}

impl ExportConfig {
    /// Create a new export configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include the valibot import.
    pub fn with_import(mut self, include: bool) -> Self {
        self.include_import = include;
        self
    }

    /// Set whether to generate types.
    pub fn with_types(mut self, generate: bool) -> Self {
        self.generate_types = generate;
        self
    }

    pub fn with_runtime(mut self, include: bool) -> Self {
        self.include_runtime = include;
        self
    }

    /// Set custom preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }
}

/// Generate the complete contract module from a registry.
pub fn generate_module(registry: &SchemaRegistry, config: &ExportConfig) -> String {
    let mut output = String::new();

    if let Some(preamble) = &config.preamble {
        output.push_str(preamble.trim_end());
        output.push_str("\n\n");
    }

    if config.include_import {
        output.push_str("import * as v from 'valibot';\n\n");
    }

    if config.include_runtime {
        output.push_str(&runtime_header());
    }

    for entry in registry.entries() {
        output.push_str(&generate_entry(entry, config));
        output.push('\n');
    }

    if config.include_runtime {
        output.push_str(&runtime_validate());
    }

    output
}

/// The `export const` block for one entity, plus its type aliases.
pub fn generate_entry(entry: &SchemaEntry, config: &ExportConfig) -> String {
    let mut output = format!(
        "export const {} = {};\n",
        entry.schema_name,
        emit_schema(entry.schema)
    );

    if config.generate_types {
        output.push_str(&format!(
            "export type {ty}Input = v.InferInput<typeof {schema}>;\n\
             export type {ty}Output = v.InferOutput<typeof {schema}>;\n",
            ty = entry.type_name,
            schema = entry.schema_name,
        ));
    }

    output
}

/// Render a schema as a valibot expression.
///
/// # Example
/// ```rust
/// use recipe_schemas::export::emit_schema;
/// use recipe_schemas::rules::StringRule;
/// use recipe_schemas::schema::Schema;
///
/// let schema = Schema::from(StringRule::new().message("text").trim().min_length(2, "short"));
/// assert_eq!(
///     emit_schema(&schema),
///     r#"v.pipe(v.string("text"), v.trim(), v.minLength(2, "short"))"#
/// );
/// ```
pub fn emit_schema(schema: &Schema) -> String {
    emit_at(schema, 0)
}

fn emit_at(schema: &Schema, depth: usize) -> String {
    match schema {
        Schema::String(rule) => {
            let actions = rule.steps.iter().map(|step| match step {
                StringStep::Trim => "v.trim()".to_string(),
                StringStep::ToLowerCase => "v.toLowerCase()".to_string(),
                StringStep::Email { pattern, message } | StringStep::Pattern { pattern, message } => {
                    format!("v.regex({}, {})", js_regex(pattern.as_str()), js_string(message))
                }
                StringStep::MinLength { length, message } => {
                    format!("v.minLength({length}, {})", js_string(message))
                }
                StringStep::MaxLength { length, message } => {
                    format!("v.maxLength({length}, {})", js_string(message))
                }
            });
            pipe(format!("v.string({})", js_string(&rule.message)), actions)
        }
        Schema::Number(rule) => {
            let actions = rule.steps.iter().map(|step| match step {
                NumberStep::Integer { message } => format!("v.integer({})", js_string(message)),
                NumberStep::MinValue { value, message } => {
                    format!("v.minValue({}, {})", js_number(*value), js_string(message))
                }
                NumberStep::MaxValue { value, message } => {
                    format!("v.maxValue({}, {})", js_number(*value), js_string(message))
                }
            });
            pipe(format!("v.number({})", js_string(&rule.message)), actions)
        }
        Schema::Boolean(rule) => format!("v.boolean({})", js_string(&rule.message)),
        Schema::Picklist(rule) => {
            let options: Vec<String> = rule.options.iter().map(|o| js_string(o)).collect();
            format!(
                "v.picklist([{}], {})",
                options.join(", "),
                js_string(&rule.message)
            )
        }
        Schema::Array(array) => {
            let actions = array.checks.iter().map(|check| match check {
                ArrayCheck::MinItems { length, message } => {
                    format!("v.minLength({length}, {})", js_string(message))
                }
                ArrayCheck::MaxItems { length, message } => {
                    format!("v.maxLength({length}, {})", js_string(message))
                }
            });
            pipe(
                format!(
                    "v.array({}, {})",
                    emit_at(&array.item, depth),
                    js_string(&array.message)
                ),
                actions,
            )
        }
        Schema::Object(object) => {
            if object.fields.is_empty() {
                return format!("v.object({{}}, {})", js_string(&object.message));
            }
            let inner = INDENT.repeat(depth + 1);
            let outer = INDENT.repeat(depth);
            let fields: Vec<String> = object
                .fields
                .iter()
                .map(|field| {
                    format!(
                        "{inner}{}: {},\n",
                        js_key(&field.key),
                        emit_at(&field.schema, depth + 1)
                    )
                })
                .collect();
            format!(
                "v.object({{\n{}{outer}}}, {})",
                fields.concat(),
                js_string(&object.message)
            )
        }
        Schema::Optional(optional) => match &optional.default {
            Some(default) => format!(
                "v.optional({}, {})",
                emit_at(&optional.inner, depth),
                js_value(default)
            ),
            None => format!("v.optional({})", emit_at(&optional.inner, depth)),
        },
        Schema::Checked(checked) => {
            let actions = checked.checks.iter().map(|check| emit_check(check, depth));
            pipe(emit_at(&checked.inner, depth), actions)
        }
    }
}

/// A cross-field check as a `rawCheck` that only runs on a typed dataset,
/// reporting on the target key.
fn emit_check(check: &CrossCheck, depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let outer = INDENT.repeat(depth);
    match check {
        CrossCheck::Equal {
            source,
            target,
            message,
        } => {
            let source = js_string(source);
            let target = js_string(target);
            format!(
                "v.rawCheck(({{ dataset, addIssue }}) => {{\n\
                 {inner}if (dataset.typed && dataset.value[{source}] !== dataset.value[{target}]) {{\n\
                 {inner}{INDENT}addIssue({{\n\
                 {inner}{INDENT}{INDENT}message: {message},\n\
                 {inner}{INDENT}{INDENT}path: [{{ type: 'object', origin: 'value', input: dataset.value, key: {target}, value: dataset.value[{target}] }}],\n\
                 {inner}{INDENT}}});\n\
                 {inner}}}\n\
                 {outer}}})",
                message = js_string(message),
            )
        }
    }
}

fn pipe(base: String, actions: impl Iterator<Item = String>) -> String {
    let actions: Vec<String> = actions.collect();
    if actions.is_empty() {
        base
    } else {
        format!("v.pipe({base}, {})", actions.join(", "))
    }
}

fn runtime_header() -> String {
    format!(
        "export const ROOT_ERROR_KEY = {};\n\n\
         export type ValidationResult<T> =\n\
         {INDENT}| {{ success: true; data: T; errors: null }}\n\
         {INDENT}| {{ success: false; data: null; errors: Record<string, string> }};\n\n",
        js_string(ROOT_ERROR_KEY)
    )
}

fn runtime_validate() -> String {
    [
        "export function validate<T extends v.GenericSchema>(",
        "  schema: T,",
        "  data: unknown",
        "): ValidationResult<v.InferOutput<T>> {",
        "  const result = v.safeParse(schema, data);",
        "  if (result.success) {",
        "    return { success: true, data: result.output, errors: null };",
        "  }",
        "",
        "  const errors: Record<string, string> = {};",
        "  for (const issue of result.issues) {",
        "    const key = issue.path?.find((item) => typeof item.key === 'string')?.key;",
        "    const field = typeof key === 'string' ? key : ROOT_ERROR_KEY;",
        "    if (!Object.prototype.hasOwnProperty.call(errors, field)) {",
        "      errors[field] = issue.message;",
        "    }",
        "  }",
        "",
        "  if (Object.keys(errors).length === 0 && result.issues[0]) {",
        "    errors[ROOT_ERROR_KEY] = result.issues[0].message;",
        "  }",
        "",
        "  return { success: false, data: null, errors };",
        "}",
        "",
    ]
    .join("\n")
}

/// A string literal. JSON string syntax is valid JavaScript.
fn js_string(value: &str) -> String {
    Value::from(value).to_string()
}

fn js_value(value: &Value) -> String {
    value.to_string()
}

fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn js_regex(source: &str) -> String {
    format!("/{}/u", source.replace('/', "\\/"))
}

fn js_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
