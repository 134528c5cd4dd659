//! Find references implementation.

use crate::base::{DocumentId, Span};
use crate::hir::Compilation;
use crate::syntax::{ElementId, name_token};

use super::goto::name_node_at;

/// Result of a find-references request.
#[derive(Clone, Debug, Default)]
pub struct ReferenceResult {
    /// All references found, ordered by document and position.
    pub references: Vec<Reference>,
    /// Whether the declaration site itself was requested.
    pub include_declaration: bool,
}

impl ReferenceResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if any references were found.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Get the number of references.
    pub fn len(&self) -> usize {
        self.references.len()
    }
}

/// A reference to a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub document: DocumentId,
    /// Span of the referring name
    pub span: Span,
    /// Whether this is the declaration site (vs a use).
    pub is_definition: bool,
}

/// Find all references to the symbol at the given position.
pub fn find_references(
    compilation: &Compilation,
    document: DocumentId,
    line: u32,
    col: u32,
    include_declaration: bool,
) -> ReferenceResult {
    let Some(node) = name_node_at(compilation, document, line, col) else {
        return ReferenceResult::empty();
    };
    let mut search = compilation.search();
    let Some(decl) = search.find_declaration(document, &node) else {
        return ReferenceResult::empty();
    };
    let Some(site) = compilation.declaration(decl).map(|d| d.element()) else {
        return ReferenceResult::empty();
    };

    let mut references = Vec::new();
    for element in search.find_references(decl) {
        let is_definition = element == site;
        if is_definition && !include_declaration {
            continue;
        }
        if let Some(span) = name_span(compilation, element) {
            references.push(Reference {
                document: element.document,
                span,
                is_definition,
            });
        }
    }
    ReferenceResult {
        references,
        include_declaration,
    }
}

/// Span of the element's name token, or of the whole element
fn name_span(compilation: &Compilation, element: ElementId) -> Option<Span> {
    let tree = compilation.document(element.document)?.tree();
    let root = tree.root();
    let range = element
        .syntax
        .to_node(&root)
        .and_then(|node| name_token(&node))
        .map_or(element.syntax.range(), |token| token.text_range());
    Some(tree.span(range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_with_and_without_declaration() {
        let mut compilation = Compilation::default();
        let id = compilation.update_document("main.lua", "local n = 1\nn = n + 1\nprint(n)");

        let with = find_references(&compilation, id, 2, 6, true);
        assert_eq!(with.len(), 4);
        assert!(with.references[0].is_definition);
        assert_eq!(with.references[0].span, Span::from_coords(0, 6, 0, 7));

        let without = find_references(&compilation, id, 2, 6, false);
        assert_eq!(without.len(), 3);
        assert!(without.references.iter().all(|r| !r.is_definition));
    }

    #[test]
    fn test_member_reference_spans_cover_the_key() {
        let mut compilation = Compilation::default();
        let id = compilation.update_document("main.lua", "local t = { size = 1 }\nprint(t.size)");
        let result = find_references(&compilation, id, 1, 9, true);
        assert_eq!(result.len(), 2);
        assert_eq!(result.references[1].span, Span::from_coords(1, 8, 1, 12));
    }
}
