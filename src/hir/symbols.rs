//! Per-document symbol table: declarations, the scope tree and the maps from
//! syntax identities to both.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{DocumentId, TextSize};
use crate::parser::SyntaxNode;
use crate::syntax::SyntaxId;

use super::declaration::{DeclId, Declaration, SymbolFeature};
use super::scope::{ScopeId, ScopeTree};

#[derive(Clone, Debug)]
pub struct DocumentSymbols {
    document: DocumentId,
    pub(super) declarations: Vec<Declaration>,
    pub(super) scopes: ScopeTree,
    pub(super) scope_by_node: FxHashMap<SyntaxId, ScopeId>,
    pub(super) decl_by_site: FxHashMap<SyntaxId, DeclId>,
}

impl DocumentSymbols {
    pub(super) fn new(document: DocumentId, start: TextSize) -> Self {
        Self {
            document,
            declarations: Vec::new(),
            scopes: ScopeTree::new(start),
            scope_by_node: FxHashMap::default(),
            decl_by_site: FxHashMap::default(),
        }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        if id.document != self.document {
            return None;
        }
        self.declarations.get(id.index as usize)
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Declaration introduced by the node with identity `site`
    pub fn declaration_at_site(&self, site: &SyntaxId) -> Option<DeclId> {
        self.decl_by_site.get(site).copied()
    }

    /// Scope opened by the node with identity `node`
    pub fn scope_of(&self, node: &SyntaxId) -> Option<ScopeId> {
        self.scope_by_node.get(node).copied()
    }

    /// Innermost scope containing `node`
    pub fn enclosing_scope(&self, node: &SyntaxNode) -> ScopeId {
        node.ancestors()
            .find_map(|ancestor| self.scope_of(&SyntaxId::new(&ancestor)))
            .unwrap_or_else(|| self.scopes.root())
    }

    /// Resolve `name` as seen from `position` inside `scope`.
    ///
    /// Only local and global bindings take part; members and doc-only
    /// declarations are never found by plain name lookup.
    pub fn find_name(&self, scope: ScopeId, position: TextSize, name: &str) -> Option<DeclId> {
        let mut found = None;
        self.scopes.walk_up(scope, position, &mut |id| {
            let Some(decl) = self.declaration(id) else {
                return false;
            };
            let matches = decl.name == name
                && matches!(decl.feature(), SymbolFeature::Local | SymbolFeature::Global);
            if matches {
                found = Some(id);
            }
            matches
        });
        trace!(document = %self.document, name, ?found, "scope walk");
        found
    }

    /// Resolve the name referenced by `node`, anchored at the node's start
    pub fn find_name_from(&self, node: &SyntaxNode, name: &str) -> Option<DeclId> {
        let scope = self.enclosing_scope(node);
        self.find_name(scope, node.text_range().start(), name)
    }
}
