//! Intermediate Representation (IR) module.
//!
//! The parser lowers attributes and field types into these structures; the
//! code generator turns them into schema-building code and projected types.

pub mod entity;
pub mod types;

pub use entity::{EntityIR, EntityKind, EqualCheckIR, FieldIR, ListIR, ObjectIR, RuleIR, StepIR};
pub use types::FieldType;
