//! Parser module for extracting entity definitions from the Rust AST.
//!
//! This module contains parsers for:
//! - Struct definitions (object entities)
//! - Enum definitions (picklists)
//! - Field types
//! - Attributes

pub mod attributes;
pub mod enum_parser;
pub mod struct_parser;
pub mod type_parser;

#[cfg(feature = "serde-compat")]
pub mod serde_compat;
