//! Reference search: every element resolving to a declaration.

use crate::hir::declaration::{DeclId, DeclKind};
use crate::hir::stub::Match;
use crate::syntax::ElementId;

use super::SearchContext;

impl SearchContext<'_> {
    /// Every element resolving to `decl`, its own site included, ordered by
    /// document and offset.
    pub fn find_references(&mut self, decl: DeclId) -> Vec<ElementId> {
        let Some(declaration) = self.declaration(decl) else {
            return Vec::new();
        };
        let local = matches!(declaration.kind, DeclKind::Local | DeclKind::Parameter);
        let candidates: Vec<ElementId> = self
            .stub()
            .names
            .get(declaration.name.as_str(), Match::All)
            .copied()
            .filter(|element| !local || element.document == declaration.document())
            .collect();

        let mut references = vec![declaration.element()];
        for element in candidates {
            let Some(node) = self.node(element) else {
                continue;
            };
            if self.find_declaration(element.document, &node) == Some(decl) {
                references.push(element);
            }
        }
        references.sort_by_key(|element| (element.document, element.syntax.range().start()));
        references.dedup();
        references
    }
}

#[cfg(test)]
mod tests {
    use crate::hir::compilation::Compilation;
    use crate::parser::TextSize;

    #[test]
    fn test_local_references_stay_in_document() {
        let mut compilation = Compilation::default();
        let main = compilation.update_document("main.lua", "local x = 1\nprint(x)\nx = x + 1");
        compilation.update_document("other.lua", "print(x)");
        let decl = compilation
            .symbols(main)
            .unwrap()
            .declarations()
            .iter()
            .find(|d| d.name == "x")
            .unwrap()
            .id;
        let mut search = compilation.search();
        let refs = search.find_references(decl);
        assert_eq!(refs.len(), 4);
        assert!(refs.iter().all(|r| r.document == main));
        assert_eq!(refs[0].syntax.range().start(), TextSize::from(6));
    }

    #[test]
    fn test_global_references_span_documents() {
        let mut compilation = Compilation::default();
        let a = compilation.update_document("a.lua", "count = 0");
        let b = compilation.update_document("b.lua", "print(count)\nlocal y = count");
        let decl = *compilation.stub().globals.first("count").unwrap();
        assert_eq!(decl.document, a);
        let mut search = compilation.search();
        let refs = search.find_references(decl);
        assert_eq!(refs.len(), 3);
        assert_eq!(refs.iter().filter(|r| r.document == b).count(), 2);
    }
}
