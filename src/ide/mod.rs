//! IDE features: protocol-free APIs for editor request handlers.
//!
//! This module is the interface between the semantic model (HIR) and a
//! language server. Each function corresponds to one editor request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: take a `&Compilation`, return plain data
//! 2. **No protocol types**: results are converted at the server boundary
//! 3. **Composable**: built on top of `SearchContext` queries
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use luna::ide::AnalysisHost;
//!
//! let host = AnalysisHost::default();
//! let id = host.update_document("main.lua", "local x = 1\nprint(x)");
//!
//! let analysis = host.analysis();
//! let target = analysis.goto_definition(id, 1, 6);
//! ```

mod analysis;
mod goto;
mod hierarchy;
mod references;
mod signature_help;
mod symbols;
mod type_info;

pub use analysis::{Analysis, AnalysisHost};
pub use goto::{GotoResult, NavigationTarget, goto_definition};
pub use hierarchy::{TypeHierarchyItem, subtypes, supertypes};
pub use references::{Reference, ReferenceResult, find_references};
pub use signature_help::{SignatureHelp, signature_help};
pub use symbols::{SymbolInfo, workspace_symbols};
pub use type_info::{TypeInfo, type_info};
