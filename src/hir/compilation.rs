//! The compilation: every open document, its symbols and the shared Stub.
//!
//! Updates are whole-document: the old contribution is removed from every
//! index, the text is reparsed and the new tree indexed. Nothing else is
//! touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base::DocumentId;
use crate::project::module_index::{ModuleIndex, module_name};
use crate::syntax::LuaSyntaxTree;

use super::declaration::{DeclId, Declaration};
use super::index::index_document;
use super::search::{SearchContext, SearchFeatures};
use super::stub::Stub;
use super::symbols::DocumentSymbols;

/// How file paths map to `require` module names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilationConfig {
    pub workspace_roots: Vec<PathBuf>,
    /// `?` stands for the module path with `.` replaced by `/`
    pub module_patterns: Vec<String>,
}

impl Default for CompilationConfig {
    fn default() -> Self {
        Self {
            workspace_roots: Vec::new(),
            module_patterns: vec!["?/init.lua".to_string(), "?.lua".to_string()],
        }
    }
}

impl CompilationConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_roots: vec![root.into()],
            ..Self::default()
        }
    }
}

/// One open document
#[derive(Clone, Debug)]
pub struct Document {
    id: DocumentId,
    path: PathBuf,
    text: Arc<str>,
    version: u32,
    tree: LuaSyntaxTree,
    symbols: DocumentSymbols,
}

impl Document {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bumped on every update of the same path
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn tree(&self) -> &LuaSyntaxTree {
        &self.tree
    }

    pub fn symbols(&self) -> &DocumentSymbols {
        &self.symbols
    }
}

#[derive(Debug, Default)]
pub struct Compilation {
    config: CompilationConfig,
    documents: FxHashMap<DocumentId, Document>,
    ids: FxHashMap<PathBuf, DocumentId>,
    next_id: u32,
    stub: Stub,
    modules: ModuleIndex,
}

impl Compilation {
    pub fn new(config: CompilationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CompilationConfig {
        &self.config
    }

    pub fn stub(&self) -> &Stub {
        &self.stub
    }

    pub fn modules(&self) -> &ModuleIndex {
        &self.modules
    }

    /// Id of an open document
    pub fn document_id(&self, path: &Path) -> Option<DocumentId> {
        self.ids
            .get(path)
            .copied()
            .filter(|id| self.documents.contains_key(id))
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn document_by_path(&self, path: &Path) -> Option<&Document> {
        self.document_id(path).and_then(|id| self.document(id))
    }

    /// Open documents, ordered by id
    pub fn documents(&self) -> Vec<&Document> {
        let mut documents: Vec<&Document> = self.documents.values().collect();
        documents.sort_by_key(|doc| doc.id);
        documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn symbols(&self, id: DocumentId) -> Option<&DocumentSymbols> {
        self.document(id).map(Document::symbols)
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.symbols(id.document)?.declaration(id)
    }

    /// Document providing `require(module)`
    pub fn module_document(&self, module: &str) -> Option<DocumentId> {
        self.modules
            .find(module)
            .filter(|id| self.documents.contains_key(id))
    }

    /// A fresh search context over this compilation
    pub fn search(&self) -> SearchContext<'_> {
        SearchContext::new(self, SearchFeatures::default())
    }

    fn id_for(&mut self, path: &Path) -> DocumentId {
        if let Some(id) = self.ids.get(path) {
            return *id;
        }
        let id = DocumentId::new(self.next_id);
        self.next_id += 1;
        self.ids.insert(path.to_path_buf(), id);
        id
    }

    /// Replace the text of `path`, opening it if needed
    pub fn update_document(&mut self, path: impl Into<PathBuf>, text: &str) -> DocumentId {
        let tree = LuaSyntaxTree::parse(text);
        self.update_parsed(path.into(), Arc::from(text), tree)
    }

    /// Replace the text of `path` with an already parsed tree
    pub fn update_parsed(&mut self, path: PathBuf, text: Arc<str>, tree: LuaSyntaxTree) -> DocumentId {
        let id = self.id_for(&path);
        let version = match self.documents.remove(&id) {
            Some(previous) => {
                self.stub.remove_document(id);
                previous.version + 1
            }
            None => 1,
        };
        let symbols = index_document(id, &tree, &mut self.stub);
        match module_name(&path, &self.config.workspace_roots, &self.config.module_patterns) {
            Some(module) => self.modules.insert(&module, id),
            None => self.modules.remove_document(id),
        }
        debug!(
            document = %id,
            path = %path.display(),
            version,
            declarations = symbols.declarations().len(),
            errors = tree.errors().len(),
            "indexed document"
        );
        self.documents.insert(
            id,
            Document {
                id,
                path,
                text,
                version,
                tree,
                symbols,
            },
        );
        id
    }

    /// Close `path`, dropping its contribution everywhere
    pub fn remove_document(&mut self, path: &Path) -> Option<DocumentId> {
        let id = self.document_id(path)?;
        self.documents.remove(&id);
        self.stub.remove_document(id);
        self.modules.remove_document(id);
        debug!(document = %id, path = %path.display(), "closed document");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::stub::Match;

    #[test]
    fn test_update_bumps_version_and_keeps_id() {
        let mut compilation = Compilation::default();
        let first = compilation.update_document("a.lua", "x = 1");
        let second = compilation.update_document("a.lua", "x = 2");
        assert_eq!(first, second);
        assert_eq!(compilation.document(first).unwrap().version(), 2);
        assert_eq!(compilation.stub().globals.get("x", Match::All).count(), 1);
    }

    #[test]
    fn test_remove_document_drops_stub_entries() {
        let mut compilation = Compilation::default();
        compilation.update_document("a.lua", "x = 1");
        compilation.remove_document(Path::new("a.lua"));
        assert!(compilation.stub().globals.is_empty());
        assert!(compilation.document_id(Path::new("a.lua")).is_none());
    }

    #[test]
    fn test_module_registration() {
        let mut compilation = Compilation::new(CompilationConfig::with_root("/ws"));
        let id = compilation.update_document("/ws/util/str.lua", "return {}");
        assert_eq!(compilation.module_document("util.str"), Some(id));
        compilation.remove_document(Path::new("/ws/util/str.lua"));
        assert_eq!(compilation.module_document("util.str"), None);
    }
}
