//! Validate a JSON document against a registered schema.

use crate::error::{CliError, CliResult};
use recipe_schemas::request::check_input_size;
use recipe_schemas::{SchemaRegistry, ValidationResult, ValidatorConfig, validate};
use serde_json::Value;

/// Parse `document` and run it through the schema registered as `name`.
///
/// Unknown schema names, malformed JSON and oversized documents are
/// errors. A document that parses but violates the schema is not: it comes
/// back as [`ValidationResult::Failure`].
pub fn check_document(
    registry: &SchemaRegistry,
    name: &str,
    document: &str,
    config: &ValidatorConfig,
) -> CliResult<ValidationResult<Value>> {
    let entry = registry.get(name).ok_or_else(|| CliError::UnknownSchema {
        name: name.to_string(),
    })?;

    let input: Value = serde_json::from_str(document)?;
    check_input_size(&input, config)?;

    let result = validate(entry.schema, &input);
    if let ValidationResult::Failure(errors) = &result {
        if config.log_rejections {
            tracing::info!(
                schema = entry.schema_name,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Document rejected"
            );
        }
    }

    Ok(result)
}
