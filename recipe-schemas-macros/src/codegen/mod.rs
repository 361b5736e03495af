//! Rust code generation module.
//!
//! This module generates the `EntitySchema` impl blocks and the projected
//! input and partial types.

pub mod impl_block;
pub mod projection;

pub use impl_block::ImplBlockGenerator;
