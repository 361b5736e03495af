//! Configuration management for the CLI.
//!
//! Configuration is read from `recipe-schemas.toml` and merged with
//! command-line arguments, which take precedence.

use crate::error::{CliResult, ConfigError};
use recipe_schemas::ValidatorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "recipe-schemas.toml";

/// Header written above the generated module unless configured otherwise.
pub const DEFAULT_PREAMBLE: &str = "// Generated by recipe-schemas. Do not edit by hand.\n\
// Regenerate with `recipe-schemas export`.";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Limits applied by `check` before validating a document.
    pub validator: ValidatorConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Output filename.
    pub file: String,

    /// Whether to emit the `valibot` import line.
    pub include_import: bool,

    /// Whether to generate `Input`/`Output` type aliases per schema.
    pub generate_types: bool,

    /// Whether to emit the `validate()` helper and its result type.
    pub include_runtime: bool,

    /// Comment block placed at the top of the file. Empty disables it.
    pub preamble: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./src/lib"),
            file: "schemas.ts".to_string(),
            include_import: true,
            generate_types: true,
            include_runtime: true,
            preamble: DEFAULT_PREAMBLE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of the generated module.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

impl Config {
    /// Reject values that would make a command misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.file.trim().is_empty() {
            return Err(ConfigError::invalid_value("output.file", "must not be empty"));
        }
        self.validator
            .validate()
            .map_err(|e| ConfigError::invalid_value("validator.max_input_size", e.to_string()))
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path the default filename in the working directory is
    /// tried. A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;
        config.validate()?;

        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(generate_types) = args.generate_types {
            config.output.generate_types = generate_types;
        }

        if let Some(include_runtime) = args.include_runtime {
            config.output.include_runtime = include_runtime;
        }

        if let Some(max_input_size) = args.max_input_size {
            config.validator.max_input_size = max_input_size;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# recipe-schemas configuration file

[output]
# Directory the browser contract is written to
dir = "./src/lib"

# Output file name
file = "schemas.ts"

# Emit `import * as v from 'valibot';`
include_import = true

# Emit `export type XInput = v.InferInput<typeof X>` and the matching Output alias
generate_types = true

# Emit the `validate()` helper that returns { success, data, errors }
include_runtime = true

# Comment block at the top of the generated file (empty string disables it)
preamble = """
// Generated by recipe-schemas. Do not edit by hand.
// Regenerate with `recipe-schemas export`."""

[validator]
# Documents larger than this many bytes are refused by `check`
max_input_size = 1048576

# Log every rejected document with the failing fields
log_rejections = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Generate types override.
    pub generate_types: Option<bool>,

    /// Runtime helper override.
    pub include_runtime: Option<bool>,

    /// Input size limit override.
    pub max_input_size: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, PathBuf::from("./src/lib"));
        assert_eq!(config.output.file, "schemas.ts");
        assert!(config.output.include_import);
        assert!(config.output.generate_types);
        assert!(config.output.include_runtime);
        assert!(config.output.preamble.starts_with("// Generated by recipe-schemas"));
        assert_eq!(config.validator.max_input_size, 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_path() {
        let config = Config::default();
        assert_eq!(config.output.path(), PathBuf::from("./src/lib/schemas.ts"));
    }

    #[test]
    fn test_merge_cli_args_output() {
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            output_file: Some("contract.ts".to_string()),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(Config::default(), &args);
        assert_eq!(merged.output.path(), PathBuf::from("./custom/contract.ts"));
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let merged = ConfigManager::merge_cli_args(config.clone(), &CliArgs::default());
        assert_eq!(merged.output.dir, config.output.dir);
        assert_eq!(merged.output.file, config.output.file);
        assert_eq!(merged.output.generate_types, config.output.generate_types);
        assert_eq!(merged.validator, config.validator);
    }

    #[test]
    fn test_merge_cli_args_flags() {
        let args = CliArgs {
            generate_types: Some(false),
            include_runtime: Some(false),
            max_input_size: Some(512),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(Config::default(), &args);
        assert!(!merged.output.generate_types);
        assert!(!merged.output.include_runtime);
        assert_eq!(merged.validator.max_input_size, 512);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
[output]
dir = "./web/src"
generate_types = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("./web/src"));
        assert!(!config.output.generate_types);
        // Unset keys keep their defaults
        assert_eq!(config.output.file, "schemas.ts");
        assert!(config.output.include_runtime);
        assert!(config.validator.log_rejections);
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.output.dir, defaults.output.dir);
        assert_eq!(config.output.file, defaults.output.file);
        assert_eq!(config.output.preamble, defaults.output.preamble);
        assert_eq!(config.validator, defaults.validator);
    }

    #[test]
    fn test_zero_max_input_size_rejected() {
        let mut config = Config::default();
        config.validator.max_input_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validator.max_input_size"));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = ConfigManager::load(Some(Path::new("/nonexistent/recipe-schemas.toml")))
            .unwrap();
        assert_eq!(config.output.file, "schemas.ts");
    }
}
