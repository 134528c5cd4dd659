//! Name tokens of name-bearing nodes.

use crate::parser::{
    AstNode, DocFuncParam, DocGenericDecl, DocGenericType, DocNameType, DocTableField, DocTagAlias,
    DocTagClass, DocTagEnum, DocTagField, DocTagInterface, DocTagOperator, DocTagParam, IndexExpr,
    LocalName, NameExpr, ParamDef, SyntaxKind, SyntaxNode, SyntaxToken, TableField,
};

/// The token naming `node`, for every node kind that introduces or refers to
/// a name. Returns `None` for all other nodes.
pub fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    let node = node.clone();
    match node.kind() {
        SyntaxKind::NAME_EXPR => NameExpr::cast(node)?.name_token(),
        SyntaxKind::INDEX_EXPR => IndexExpr::cast(node)?.name_token(),
        SyntaxKind::LOCAL_NAME => LocalName::cast(node)?.name_token(),
        SyntaxKind::PARAM_DEF => ParamDef::cast(node)?.name_token(),
        SyntaxKind::TABLE_FIELD => TableField::cast(node)?.name_token(),
        SyntaxKind::DOC_NAME_TYPE => DocNameType::cast(node)?.name_token(),
        SyntaxKind::DOC_GENERIC_TYPE => DocGenericType::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_CLASS => DocTagClass::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_INTERFACE => DocTagInterface::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_ALIAS => DocTagAlias::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_ENUM => DocTagEnum::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_OPERATOR => DocTagOperator::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_FIELD => DocTagField::cast(node)?.name_token(),
        SyntaxKind::DOC_TAG_PARAM => DocTagParam::cast(node)?.name_token(),
        SyntaxKind::DOC_TABLE_FIELD => DocTableField::cast(node)?.name_token(),
        SyntaxKind::DOC_GENERIC_DECL => DocGenericDecl::cast(node)?.name_token(),
        SyntaxKind::DOC_FUNC_PARAM => DocFuncParam::cast(node)?.name_token(),
        _ => None,
    }
}

/// Text of the node's name token
pub fn name_text(node: &SyntaxNode) -> Option<String> {
    name_token(node).map(|t| t.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn names_of(input: &str, kind: SyntaxKind) -> Vec<String> {
        parse(input)
            .syntax()
            .descendants()
            .filter(|n| n.kind() == kind)
            .filter_map(|n| name_text(&n))
            .collect()
    }

    #[test]
    fn test_lua_names() {
        assert_eq!(names_of("a.b.c = 1", SyntaxKind::INDEX_EXPR), vec!["c", "b"]);
        assert_eq!(names_of("local function f(x, ...) end", SyntaxKind::PARAM_DEF), vec!["x", "..."]);
        assert_eq!(names_of("t = { k = 1, 2 }", SyntaxKind::TABLE_FIELD), vec!["k"]);
    }

    #[test]
    fn test_doc_names() {
        let input = "---@alias Id integer\n---@param id? Id\nlocal function f(id) end";
        assert_eq!(names_of(input, SyntaxKind::DOC_TAG_ALIAS), vec!["Id"]);
        assert_eq!(names_of(input, SyntaxKind::DOC_TAG_PARAM), vec!["id"]);
        assert_eq!(names_of(input, SyntaxKind::DOC_NAME_TYPE), vec!["integer", "Id"]);
    }
}
