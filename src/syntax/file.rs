//! Syntax tree wrapper for parsed Lua documents.
//!
//! This module provides the position queries the semantic layer needs on top
//! of the rowan parse result.

use rowan::{GreenNode, TokenAtOffset};

use crate::base::{LineCol, LineIndex, Span, TextRange, TextSize};
use crate::parser::{AstNode, Parse, SourceFile, SyntaxError, SyntaxKind, SyntaxNode, SyntaxToken, parse};

use super::name::name_token;

/// A parsed document.
///
/// Only the green tree is stored; it is `Send + Sync` and cheap to clone.
/// Red `SyntaxNode` roots are built on demand by [`LuaSyntaxTree::root`].
#[derive(Debug, Clone)]
pub struct LuaSyntaxTree {
    green: GreenNode,
    errors: Vec<SyntaxError>,
    line_index: LineIndex,
}

// Two trees are equal if they were built from the same text
impl PartialEq for LuaSyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.green == other.green
    }
}

impl Eq for LuaSyntaxTree {}

impl LuaSyntaxTree {
    /// Parse source text into a tree
    pub fn parse(text: &str) -> Self {
        let Parse { green, errors } = parse(text);
        Self {
            green,
            errors,
            line_index: LineIndex::new(text),
        }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Build a fresh root node for traversal
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Get the root source file AST node
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.root())
    }

    /// Get parse errors
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Check if parsing had errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Byte offset of a zero-based line/column position
    pub fn offset_at(&self, line: u32, col: u32) -> Option<TextSize> {
        self.line_index.offset(LineCol::new(line, col))
    }

    /// Convert a text range into an editor span
    pub fn span(&self, range: TextRange) -> Span {
        let (start, end) = self.line_index.range_to_line_cols(range);
        Span::new(start.into(), end.into())
    }

    /// The significant token at `offset` under `root`.
    ///
    /// Between two tokens, a name token wins over punctuation so that a
    /// cursor placed right after an identifier still hits it.
    pub fn token_at(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
        let is_name = |t: &SyntaxToken| {
            matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOC_NAME | SyntaxKind::DOT_DOT_DOT)
        };
        match root.token_at_offset(offset) {
            TokenAtOffset::None => None,
            TokenAtOffset::Single(token) => Some(token),
            TokenAtOffset::Between(left, right) => {
                if is_name(&right) || !is_name(&left) {
                    Some(right)
                } else {
                    Some(left)
                }
            }
        }
    }

    /// Deepest node covering a line/column position
    pub fn node_at(&self, line: u32, col: u32) -> Option<SyntaxNode> {
        let offset = self.offset_at(line, col)?;
        let root = self.root();
        Self::token_at(&root, offset)?.parent()
    }

    /// Nearest name-bearing node whose name token sits at the position
    pub fn name_node_at(&self, line: u32, col: u32) -> Option<SyntaxNode> {
        let offset = self.offset_at(line, col)?;
        let root = self.root();
        let token = Self::token_at(&root, offset)?;
        token
            .parent_ancestors()
            .find(|node| name_token(node).is_some_and(|name| name == token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_keeps_text_and_errors() {
        let tree = LuaSyntaxTree::parse("local a = 1\nlocal = 2");
        assert_eq!(tree.root().text().to_string(), "local a = 1\nlocal = 2");
        assert!(tree.has_errors());
        assert_eq!(tree.line_index().line_count(), 2);
    }

    #[test]
    fn test_name_node_at_index_key() {
        let tree = LuaSyntaxTree::parse("local t = {}\nprint(t.field)");
        let node = tree.name_node_at(1, 9).unwrap();
        assert_eq!(node.kind(), SyntaxKind::INDEX_EXPR);
        assert_eq!(node.text().to_string(), "t.field");

        let prefix = tree.name_node_at(1, 6).unwrap();
        assert_eq!(prefix.kind(), SyntaxKind::NAME_EXPR);
    }

    #[test]
    fn test_name_node_at_end_of_identifier() {
        let tree = LuaSyntaxTree::parse("foo(1)");
        let node = tree.name_node_at(0, 3).unwrap();
        assert_eq!(node.text().to_string(), "foo");
    }

    #[test]
    fn test_name_node_at_doc_names() {
        let tree = LuaSyntaxTree::parse("---@class Foo: Bar\nlocal Foo = {}");
        assert_eq!(tree.name_node_at(0, 11).unwrap().kind(), SyntaxKind::DOC_TAG_CLASS);
        assert_eq!(tree.name_node_at(0, 16).unwrap().kind(), SyntaxKind::DOC_NAME_TYPE);
    }

    #[test]
    fn test_span_conversion() {
        let tree = LuaSyntaxTree::parse("a = 1\nbb = 2");
        let span = tree.span(TextRange::new(TextSize::new(6), TextSize::new(8)));
        assert_eq!(span, Span::from_coords(1, 0, 1, 2));
    }

    #[test]
    fn test_missing_line_yields_none() {
        let tree = LuaSyntaxTree::parse("x = 1");
        assert!(tree.node_at(5, 0).is_none());
    }
}
