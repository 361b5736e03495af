//! # recipe-schemas-cli
//!
//! CLI library for exporting the browser contract and checking documents
//! against the application's schemas.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`check`] - Validating JSON documents against a schema
//! - [`generator`] - Contract module generation from the schema registry
//! - [`writer`] - File output and dry-run support
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types and handling

pub mod check;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod writer;

// Re-export main types for convenience
pub use check::check_document;
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::ContractGenerator;
pub use writer::FileWriter;
