//! # recipe-schemas
//!
//! Command-line front end for the recipes application's input schemas.
//!
//! ## Usage
//!
//! ```bash
//! # Write the valibot contract for the web client
//! recipe-schemas export --output ./web/src/lib
//!
//! # Preview without writing
//! recipe-schemas export --dry-run
//!
//! # Fail (exit 2) when the committed contract is stale
//! recipe-schemas verify --path ./web/src/lib/schemas.ts
//!
//! # Validate a document, from a file or stdin
//! echo '{"rating": 4}' | recipe-schemas check --schema RateRecipeSchema
//!
//! # Inspect the registry
//! recipe-schemas list
//! recipe-schemas show CreateRecipeSchema
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use recipe_schemas::{SchemaRegistry, ValidationResult};
use recipe_schemas_cli::{
    check::check_document,
    config::{CONFIG_FILENAME, CliArgs, ConfigManager},
    error::CliError,
    generator::ContractGenerator,
    logging,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "recipe-schemas")]
#[command(author, version, about = "Export and check the recipes application's input schemas", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the valibot contract module
    Export {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file name
        #[arg(long)]
        file: Option<String>,

        /// Skip the Input/Output type aliases
        #[arg(long)]
        no_types: bool,

        /// Skip the validate() helper
        #[arg(long)]
        no_runtime: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that a written contract matches the current schemas
    Verify {
        /// Path to the generated contract
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a JSON document and print the result
    Check {
        /// Schema name (e.g. LoginSchema) or type name (e.g. Login)
        #[arg(short, long)]
        schema: String,

        /// JSON file to read; stdin when omitted
        file: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the registered schemas
    List,

    /// Print a schema definition as JSON
    Show {
        /// Schema name or type name
        name: String,
    },

    /// Create a configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let registry = SchemaRegistry::builtin();

    match cli.command {
        Commands::Export {
            output,
            file,
            no_types,
            no_runtime,
            dry_run,
            config,
        } => {
            let args = CliArgs {
                output,
                output_file: file,
                generate_types: no_types.then_some(false),
                include_runtime: no_runtime.then_some(false),
                ..Default::default()
            };
            cmd_export(&registry, args, dry_run, config)?;
        }

        Commands::Verify { path, config } => cmd_verify(&registry, path, config)?,

        Commands::Check {
            schema,
            file,
            config,
        } => return cmd_check(&registry, &schema, file, config),

        Commands::List => cmd_list(&registry),

        Commands::Show { name } => cmd_show(&registry, &name)?,

        Commands::Init { output, force } => cmd_init(output, force)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Export command implementation.
fn cmd_export(
    registry: &SchemaRegistry,
    args: CliArgs,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);
    let output_path = config.output.path();

    println!("{}", "Generating valibot contract...".cyan());
    let generator = ContractGenerator::new(config);
    let output = generator.generate(registry);
    println!(
        "  Generated {} schema(s)",
        output.schemas.len().to_string().green()
    );

    match FileWriter::new(dry_run).write(&output_path, &output.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is already up-to-date", "✓".green(), path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Verify command implementation.
fn cmd_verify(
    registry: &SchemaRegistry,
    path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let contract_path = path.unwrap_or_else(|| config.output.path());

    println!("{}", "Verifying contract...".cyan());

    if !contract_path.exists() {
        return Err(CliError::Validation(format!(
            "Contract file not found: {}",
            contract_path.display()
        )));
    }

    let existing = std::fs::read_to_string(&contract_path)?;
    let generator = ContractGenerator::new(config);

    if generator.is_up_to_date(registry, &existing) {
        println!("{} Contract is up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Contract is out of date", "✗".red());
        println!("  Run 'recipe-schemas export' to update");
        Err(CliError::Validation("Contract is out of date".to_string()))
    }
}

/// Check command implementation. Prints the `{success, data, errors}`
/// document and exits 1 when validation fails.
fn cmd_check(
    registry: &SchemaRegistry,
    schema: &str,
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<ExitCode, CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;

    let document = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let result = check_document(registry, schema, &document, &config.validator)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(match result {
        ValidationResult::Success(_) => ExitCode::SUCCESS,
        ValidationResult::Failure(_) => ExitCode::FAILURE,
    })
}

/// List command implementation.
fn cmd_list(registry: &SchemaRegistry) {
    println!("{} registered schema(s):", registry.len().to_string().green());
    for entry in registry.entries() {
        println!(
            "  {} {}",
            entry.schema_name.bold(),
            format!("({})", entry.type_name).dimmed()
        );
    }
}

/// Show command implementation.
fn cmd_show(registry: &SchemaRegistry, name: &str) -> Result<(), CliError> {
    let entry = registry.get(name).ok_or_else(|| CliError::UnknownSchema {
        name: name.to_string(),
    })?;
    println!("{}", serde_json::to_string_pretty(entry.schema)?);
    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "recipe-schemas",
            "export",
            "-o",
            "./web/src/lib",
            "--no-types",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                output,
                no_types,
                no_runtime,
                dry_run,
                ..
            } => {
                assert_eq!(output, Some(PathBuf::from("./web/src/lib")));
                assert!(no_types);
                assert!(!no_runtime);
                assert!(dry_run);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["recipe-schemas", "list", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_check_requires_schema() {
        assert!(Cli::try_parse_from(["recipe-schemas", "check", "body.json"]).is_err());

        let cli =
            Cli::try_parse_from(["recipe-schemas", "check", "-s", "LoginSchema"]).unwrap();
        match cli.command {
            Commands::Check { schema, file, .. } => {
                assert_eq!(schema, "LoginSchema");
                assert!(file.is_none());
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_init_default_path() {
        let cli = Cli::try_parse_from(["recipe-schemas", "init"]).unwrap();
        match cli.command {
            Commands::Init { output, force } => {
                assert_eq!(output, PathBuf::from(CONFIG_FILENAME));
                assert!(!force);
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn test_show_unknown_schema() {
        let err = cmd_show(&SchemaRegistry::builtin(), "Nope").unwrap_err();
        assert!(matches!(err, CliError::UnknownSchema { .. }));
    }
}
