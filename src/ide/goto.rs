//! Go-to-definition implementation.

use smol_str::SmolStr;

use crate::base::{DocumentId, Span};
use crate::hir::{Compilation, DeclKind, Declaration};
use crate::parser::SyntaxNode;

/// Result of a go-to-definition request.
#[derive(Clone, Debug, Default)]
pub struct GotoResult {
    /// The targets to jump to.
    pub targets: Vec<NavigationTarget>,
}

impl GotoResult {
    /// Create an empty result (no targets found).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(target: NavigationTarget) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// Check if any targets were found.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A declaration's location in editor coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTarget {
    pub document: DocumentId,
    /// Span of the declared name
    pub span: Span,
    pub name: SmolStr,
    pub kind: DeclKind,
}

impl NavigationTarget {
    pub fn from_declaration(compilation: &Compilation, decl: &Declaration) -> Option<Self> {
        let document = compilation.document(decl.document())?;
        Some(Self {
            document: decl.document(),
            span: document.tree().span(decl.range),
            name: decl.name.clone(),
            kind: decl.kind,
        })
    }
}

/// The name-bearing node under a cursor
pub(crate) fn name_node_at(
    compilation: &Compilation,
    document: DocumentId,
    line: u32,
    col: u32,
) -> Option<SyntaxNode> {
    compilation.document(document)?.tree().name_node_at(line, col)
}

/// Find the definition of the symbol at the given position.
///
/// # Arguments
/// * `compilation` - The compilation to search
/// * `document` - The document containing the cursor
/// * `line` - Cursor line (0-indexed)
/// * `col` - Cursor column (0-indexed, in bytes)
pub fn goto_definition(compilation: &Compilation, document: DocumentId, line: u32, col: u32) -> GotoResult {
    let Some(node) = name_node_at(compilation, document, line, col) else {
        return GotoResult::empty();
    };
    let mut search = compilation.search();
    search
        .find_declaration(document, &node)
        .and_then(|id| compilation.declaration(id))
        .and_then(|decl| NavigationTarget::from_declaration(compilation, decl))
        .map_or_else(GotoResult::empty, GotoResult::single)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goto_local() {
        let mut compilation = Compilation::default();
        let id = compilation.update_document("main.lua", "local value = 1\nprint(value)");
        let result = goto_definition(&compilation, id, 1, 8);
        assert_eq!(result.targets.len(), 1);
        let target = &result.targets[0];
        assert_eq!(target.name, "value");
        assert_eq!(target.kind, DeclKind::Local);
        assert_eq!(target.span, Span::from_coords(0, 6, 0, 11));
    }

    #[test]
    fn test_goto_nothing_on_keyword() {
        let mut compilation = Compilation::default();
        let id = compilation.update_document("main.lua", "local value = 1");
        assert!(goto_definition(&compilation, id, 0, 2).is_empty());
    }
}
