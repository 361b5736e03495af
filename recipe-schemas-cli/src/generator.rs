//! Contract generation from the schema registry.
//!
//! The module text itself comes from [`recipe_schemas::export`]; this layer
//! maps CLI configuration onto it and reports what was emitted.

use crate::config::Config;
use recipe_schemas::{ExportConfig, SchemaRegistry, generate_module};

/// Generated output containing the module and what it declares.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Complete TypeScript content.
    pub content: String,

    /// Exported constant names in emission order.
    pub schemas: Vec<String>,
}

/// Builds the browser contract module.
pub struct ContractGenerator {
    config: Config,
}

impl ContractGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Export options derived from the `[output]` section.
    pub fn export_config(&self) -> ExportConfig {
        let output = &self.config.output;
        let mut export = ExportConfig::new()
            .with_import(output.include_import)
            .with_types(output.generate_types)
            .with_runtime(output.include_runtime);
        if !output.preamble.trim().is_empty() {
            export = export.with_preamble(output.preamble.clone());
        }
        export
    }

    /// Generate the module for every schema in `registry`.
    pub fn generate(&self, registry: &SchemaRegistry) -> GeneratedOutput {
        let content = generate_module(registry, &self.export_config());
        let schemas = registry.names().map(str::to_string).collect::<Vec<_>>();

        tracing::debug!(
            schemas = schemas.len(),
            bytes = content.len(),
            "Generated contract module"
        );

        GeneratedOutput { content, schemas }
    }

    /// Whether `existing` matches what would be generated now.
    ///
    /// Line endings are normalized so a checkout with CRLF endings still
    /// compares equal.
    pub fn is_up_to_date(&self, registry: &SchemaRegistry, existing: &str) -> bool {
        let expected = self.generate(registry).content;
        existing.replace("\r\n", "\n") == expected
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
