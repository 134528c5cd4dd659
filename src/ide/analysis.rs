//! AnalysisHost and Analysis: shared state for IDE features.
//!
//! The `AnalysisHost` owns the one [`Compilation`] behind a read/write lock.
//! Document changes take the write lock; an `Analysis` snapshot holds the
//! read lock so every query in it sees the same state.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::default();
//! host.update_document("main.lua", "local x = 1\nprint(x)");
//!
//! let analysis = host.analysis();
//! let id = analysis.document_id("main.lua").unwrap();
//! let goto = analysis.goto_definition(id, 1, 6);
//! ```

use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::base::DocumentId;
use crate::hir::{Compilation, CompilationConfig};

use super::{
    GotoResult, ReferenceResult, SignatureHelp, SymbolInfo, TypeHierarchyItem, TypeInfo,
};

/// Owns the compilation. Apply changes with `update_document()` and
/// `close_document()`, then query through `analysis()`.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    compilation: RwLock<Compilation>,
}

impl AnalysisHost {
    pub fn new(config: CompilationConfig) -> Self {
        Self {
            compilation: RwLock::new(Compilation::new(config)),
        }
    }

    /// Replace the full text of a document, opening it if needed.
    pub fn update_document(&self, path: impl Into<PathBuf>, text: &str) -> DocumentId {
        self.compilation.write().update_document(path, text)
    }

    /// Close a document and drop everything it contributed.
    pub fn close_document(&self, path: impl AsRef<Path>) -> Option<DocumentId> {
        self.compilation.write().remove_document(path.as_ref())
    }

    /// Run `f` under one write section
    pub fn apply<R>(&self, f: impl FnOnce(&mut Compilation) -> R) -> R {
        f(&mut self.compilation.write())
    }

    /// A consistent read snapshot
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            compilation: self.compilation.read(),
        }
    }
}

/// An immutable snapshot of the analysis state.
///
/// Holds the read lock until dropped; do not keep it across edits.
pub struct Analysis<'a> {
    compilation: RwLockReadGuard<'a, Compilation>,
}

impl Analysis<'_> {
    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    pub fn document_id(&self, path: impl AsRef<Path>) -> Option<DocumentId> {
        self.compilation.document_id(path.as_ref())
    }

    pub fn document_path(&self, document: DocumentId) -> Option<&Path> {
        self.compilation.document(document).map(|doc| doc.path())
    }

    // ==================== Navigation ====================

    /// Go to definition at a position.
    pub fn goto_definition(&self, document: DocumentId, line: u32, col: u32) -> GotoResult {
        super::goto_definition(&self.compilation, document, line, col)
    }

    /// Find all references to the symbol at a position.
    pub fn find_references(
        &self,
        document: DocumentId,
        line: u32,
        col: u32,
        include_declaration: bool,
    ) -> ReferenceResult {
        super::find_references(&self.compilation, document, line, col, include_declaration)
    }

    // ==================== Types ====================

    /// Type of the expression or declaration at a position.
    pub fn type_info(&self, document: DocumentId, line: u32, col: u32) -> Option<TypeInfo> {
        super::type_info(&self.compilation, document, line, col)
    }

    pub fn supertypes(&self, name: &str) -> Vec<TypeHierarchyItem> {
        super::supertypes(&self.compilation, name)
    }

    pub fn subtypes(&self, name: &str) -> Vec<TypeHierarchyItem> {
        super::subtypes(&self.compilation, name)
    }

    pub fn signature_help(&self, document: DocumentId, line: u32, col: u32) -> Option<SignatureHelp> {
        super::signature_help(&self.compilation, document, line, col)
    }

    // ==================== Symbols ====================

    /// Search globals, members and named types by case-insensitive prefix.
    /// Stops early with what it has when `cancel` fires.
    pub fn workspace_symbols(&self, query: &str, cancel: &CancellationToken) -> Vec<SymbolInfo> {
        super::workspace_symbols(&self.compilation, query, cancel)
    }

    /// Module name a document is reachable under, if any
    pub fn module_name(&self, document: DocumentId) -> Option<SmolStr> {
        self.compilation.modules().module_of(document).map(SmolStr::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_host_basic() {
        let host = AnalysisHost::default();
        let id = host.update_document("test.lua", "local x = 1");

        let analysis = host.analysis();
        assert_eq!(analysis.document_id("test.lua"), Some(id));
        assert_eq!(analysis.document_path(id), Some(Path::new("test.lua")));
    }

    #[test]
    fn test_document_close() {
        let host = AnalysisHost::default();
        host.update_document("test.lua", "x = 1");
        assert!(host.close_document("test.lua").is_some());
        assert!(host.close_document("test.lua").is_none());

        let analysis = host.analysis();
        assert!(analysis.document_id("test.lua").is_none());
        assert!(analysis.compilation().stub().globals.is_empty());
    }

    #[test]
    fn test_module_name_of_document() {
        let host = AnalysisHost::new(CompilationConfig::with_root("/ws"));
        let id = host.update_document("/ws/app/main.lua", "return {}");
        assert_eq!(host.analysis().module_name(id).as_deref(), Some("app.main"));
    }
}
