//! Stable identities for syntax nodes.

use std::fmt;

use crate::base::{DocumentId, TextRange};
use crate::parser::{SyntaxKind, SyntaxNode};

/// Identity of a node within one version of a document: its kind and range.
///
/// Red nodes are rebuilt for every traversal, so semantic tables key on this
/// value instead of on node pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxId {
    kind: SyntaxKind,
    range: TextRange,
}

impl SyntaxId {
    pub fn new(node: &SyntaxNode) -> Self {
        Self {
            kind: node.kind(),
            range: node.text_range(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Find the node with this identity under `root`.
    pub fn to_node(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        if !root.text_range().contains_range(self.range) {
            return None;
        }
        let start = match root.covering_element(self.range) {
            rowan::NodeOrToken::Node(node) => Some(node),
            rowan::NodeOrToken::Token(token) => token.parent(),
        };
        start
            .into_iter()
            .flat_map(|node| node.ancestors())
            .find(|node| node.kind() == self.kind && node.text_range() == self.range)
            // empty nodes contain no token to start from
            .or_else(|| {
                root.descendants()
                    .find(|node| node.kind() == self.kind && node.text_range() == self.range)
            })
    }
}

/// Identity of a node across the workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub document: DocumentId,
    pub syntax: SyntaxId,
}

impl ElementId {
    pub fn new(document: DocumentId, node: &SyntaxNode) -> Self {
        Self {
            document,
            syntax: SyntaxId::new(node),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn range(&self) -> TextRange {
        self.syntax.range()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}{:?}", self.document, self.syntax.kind, self.syntax.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;
    use crate::parser::parse;

    #[test]
    fn test_to_node_finds_exact_kind() {
        let root = parse("print(a.b)").syntax();
        for node in root.descendants() {
            let id = SyntaxId::new(&node);
            assert_eq!(id.to_node(&root), Some(node));
        }
    }

    #[test]
    fn test_to_node_on_other_tree_by_identity() {
        let first = parse("local x = 1").syntax();
        let second = parse("local x = 1").syntax();
        let name = first
            .descendants()
            .find(|n| n.kind() == SyntaxKind::LOCAL_NAME)
            .unwrap();
        let found = SyntaxId::new(&name).to_node(&second).unwrap();
        assert_eq!(found.text().to_string(), "x");
    }

    #[test]
    fn test_element_ids_key_hash_sets_and_sort_by_offset() {
        let root = parse("print(a.b)").syntax();
        let document = DocumentId::new(0);
        let mut ids: Vec<ElementId> = root.descendants().map(|n| ElementId::new(document, &n)).collect();
        let distinct: rustc_hash::FxHashSet<ElementId> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), ids.len());

        ids.reverse();
        ids.sort_by_key(|id| (id.document, id.range().start()));
        assert!(ids.windows(2).all(|w| w[0].range().start() <= w[1].range().start()));
        assert_eq!(ids[0].range().start(), TextSize::new(0));
    }
}
