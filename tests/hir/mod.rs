//! HIR layer tests
//!
//! Tests for the semantic model:
//! - Scope-based name resolution
//! - Incremental document updates against the Stub
//! - Type inference and substitution

pub mod tests_incremental;
pub mod tests_inference;
pub mod tests_name_resolution;
