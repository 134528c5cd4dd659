//! # luna-base
//!
//! Semantic core for Lua language tooling: lossless parsing of Lua with
//! `---@` annotations, incremental cross-document indexing, scope-based name
//! resolution and a structural type system.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Workspace loading into an AnalysisHost
//!   ↓
//! ide       → IDE features (goto, references, type info, symbols)
//!   ↓
//! hir       → Stub, scopes, types, SearchContext (module paths from project)
//!   ↓
//! syntax    → Document trees, node identity, position queries
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (DocumentId, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → ide → project)
// ============================================================================

/// Foundation types: DocumentId, TextRange, line/column conversion
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST over rowan
pub mod parser;

/// Syntax: parsed documents, SyntaxId/ElementId, name lookup at positions
pub mod syntax;

/// High-level IR: Stub, scope tree, types and the search context
pub mod hir;

/// IDE features: goto-definition, find-references, type info, symbols
pub mod ide;

/// Project management: module index, workspace loading
pub mod project;

// Re-export foundation types
pub use base::{DocumentId, LineCol, LineIndex, Position, Span, TextRange, TextSize};

// Re-export the main entry points
pub use hir::{Compilation, CompilationConfig, SearchContext, SearchFeatures};
pub use ide::{Analysis, AnalysisHost};
pub use syntax::LuaSyntaxTree;
