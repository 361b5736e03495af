//! Test module for recipe-schemas
//!
//! Entity behavior, request helpers and the exported contract are tested
//! here; rule and executor internals are tested next to their code.




#[cfg(test)]
pub mod export_tests;
