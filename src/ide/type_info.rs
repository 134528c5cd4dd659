//! Type information at cursor position.
//!
//! Expressions report their inferred type. Declaration sites (local names,
//! parameters, doc names) report the declared or inferred type of what they
//! declare.

use crate::base::DocumentId;
use crate::hir::{Compilation, DeclKind, LuaType};
use crate::parser::{AstNode, Expr, SyntaxKind};
use crate::syntax::name_text;

use super::goto::name_node_at;

/// Type of the name under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// The name as written in source.
    pub name: String,
    pub ty: LuaType,
    /// Kind of the declaration the name resolves to, if any.
    pub kind: Option<DeclKind>,
    /// Whether the name is captured from an enclosing function.
    pub is_upvalue: bool,
}

impl TypeInfo {
    /// Display form of the type, e.g. `string|nil`
    pub fn rendered(&self) -> String {
        self.ty.to_string()
    }

    pub fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }
}

/// Get type information at a specific position.
///
/// # Arguments
/// * `compilation` - The compilation to search
/// * `document` - The document containing the cursor
/// * `line` - Cursor line (0-indexed)
/// * `col` - Cursor column (0-indexed, in bytes)
pub fn type_info(compilation: &Compilation, document: DocumentId, line: u32, col: u32) -> Option<TypeInfo> {
    let node = name_node_at(compilation, document, line, col)?;
    let name = name_text(&node)?;
    let mut search = compilation.search();
    let decl = search.find_declaration(document, &node);

    let ty = match Expr::cast(node.clone()) {
        Some(expr) => search.infer(document, &expr),
        None => decl.map_or(LuaType::Unknown, |id| search.decl_type(id)),
    };
    let is_upvalue = node.kind() == SyntaxKind::NAME_EXPR
        && decl.is_some_and(|id| search.is_upvalue(document, &node, id));
    let kind = decl
        .and_then(|id| compilation.declaration(id))
        .map(|d| d.kind);

    Some(TypeInfo {
        name,
        ty,
        kind,
        is_upvalue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_at(text: &str, line: u32, col: u32) -> TypeInfo {
        let mut compilation = Compilation::default();
        let id = compilation.update_document("main.lua", text);
        type_info(&compilation, id, line, col).unwrap()
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(info_at("local s = 'x'\nprint(s)", 1, 6).rendered(), "string");
        assert_eq!(info_at("local n = 1.5\nprint(n)", 1, 6).rendered(), "number");
        assert_eq!(info_at("local i = 3\nprint(i)", 0, 6).rendered(), "integer");
    }

    #[test]
    fn test_upvalue_detection() {
        let text = "local count = 0\nlocal function bump()\n  count = count + 1\nend";
        let info = info_at(text, 2, 10);
        assert!(info.is_upvalue);
        assert_eq!(info.kind, Some(DeclKind::Local));
        assert!(!info_at("local a = 1\nprint(a)", 1, 6).is_upvalue);
    }

    #[test]
    fn test_nullable_doc_type() {
        let info = info_at("---@type string?\nlocal name\nprint(name)", 2, 6);
        assert_eq!(info.rendered(), "string|nil");
        assert!(info.is_nullable());
    }
}
