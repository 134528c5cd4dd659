//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Lua syntax nodes and the
//! `---@` annotation tags. Each struct wraps a SyntaxNode and provides methods
//! to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! ast_enum {
    ($name:ident { $($variant:ident($ty:ident) = $kind:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($ty)),+
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some(Self::$variant($ty(node))),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(n) => &n.0),+
                }
            }
        }
    };
}

// ============================================================================
// Token helpers
// ============================================================================

fn direct_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|e| e.into_token())
}

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    direct_tokens(node).find(|t| t.kind() == kind)
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    first_token(node, kind).is_some()
}

/// Children of type `N` that come after the first `kind` token.
fn children_after<N: AstNode>(node: &SyntaxNode, kind: SyntaxKind) -> Vec<N> {
    node.children_with_tokens()
        .skip_while(|e| e.kind() != kind)
        .filter_map(|e| e.into_node())
        .filter_map(N::cast)
        .collect()
}

/// Children of type `N` that come before the first `kind` token.
fn children_before<N: AstNode>(node: &SyntaxNode, kind: SyntaxKind) -> Vec<N> {
    node.children_with_tokens()
        .take_while(|e| e.kind() != kind)
        .filter_map(|e| e.into_node())
        .filter_map(N::cast)
        .collect()
}

// ============================================================================
// Root, blocks and statements
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(Block, BLOCK);

impl Block {
    pub fn stats(&self) -> impl Iterator<Item = Stat> + '_ {
        self.0.children().filter_map(Stat::cast)
    }

    pub fn doc_comments(&self) -> impl Iterator<Item = DocComment> + '_ {
        self.0.children().filter_map(DocComment::cast)
    }

    pub fn return_stat(&self) -> Option<ReturnStat> {
        self.0.children().find_map(ReturnStat::cast)
    }
}

ast_enum!(Stat {
    Local(LocalStat) = LOCAL_STAT,
    Assign(AssignStat) = ASSIGN_STAT,
    Call(CallStat) = CALL_STAT,
    Func(FuncStat) = FUNC_STAT,
    LocalFunc(LocalFuncStat) = LOCAL_FUNC_STAT,
    Do(DoStat) = DO_STAT,
    While(WhileStat) = WHILE_STAT,
    Repeat(RepeatStat) = REPEAT_STAT,
    If(IfStat) = IF_STAT,
    For(ForStat) = FOR_STAT,
    ForRange(ForRangeStat) = FOR_RANGE_STAT,
    Return(ReturnStat) = RETURN_STAT,
    Break(BreakStat) = BREAK_STAT,
    Goto(GotoStat) = GOTO_STAT,
    Label(LabelStat) = LABEL_STAT,
    Empty(EmptyStat) = EMPTY_STAT,
});

impl Stat {
    /// Annotation comment directly preceding this statement in its block.
    pub fn doc_comment(&self) -> Option<DocComment> {
        preceding_doc_comment(self.syntax())
    }
}

/// The DOC_COMMENT sibling immediately before `node`, if nothing but trivia
/// separates them.
pub fn preceding_doc_comment(node: &SyntaxNode) -> Option<DocComment> {
    let mut element = node.prev_sibling_or_token();
    while let Some(current) = element {
        match current {
            rowan::NodeOrToken::Token(token) if token.kind().is_trivia() => {
                element = token.prev_sibling_or_token();
            }
            rowan::NodeOrToken::Node(node) => return DocComment::cast(node),
            rowan::NodeOrToken::Token(_) => return None,
        }
    }
    None
}

ast_node!(LocalStat, LOCAL_STAT);

impl LocalStat {
    pub fn local_names(&self) -> impl Iterator<Item = LocalName> + '_ {
        self.0.children().filter_map(LocalName::cast)
    }

    pub fn values(&self) -> Vec<Expr> {
        children_after(&self.0, SyntaxKind::EQ)
    }
}

ast_node!(LocalName, LOCAL_NAME);

impl LocalName {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn attribute(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTRIBUTE)
            .and_then(|n| first_token(&n, SyntaxKind::IDENT))
            .map(|t| t.text().to_string())
    }
}

ast_node!(AssignStat, ASSIGN_STAT);

impl AssignStat {
    pub fn targets(&self) -> Vec<Expr> {
        children_before(&self.0, SyntaxKind::EQ)
    }

    pub fn values(&self) -> Vec<Expr> {
        children_after(&self.0, SyntaxKind::EQ)
    }
}

ast_node!(CallStat, CALL_STAT);

impl CallStat {
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(FuncStat, FUNC_STAT);

impl FuncStat {
    /// `a.b:c` in `function a.b:c() end`
    pub fn name(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn closure(&self) -> Option<ClosureExpr> {
        self.0.children().find_map(ClosureExpr::cast)
    }

    pub fn is_method(&self) -> bool {
        match self.name() {
            Some(Expr::Index(index)) => index.is_colon(),
            _ => false,
        }
    }
}

ast_node!(LocalFuncStat, LOCAL_FUNC_STAT);

impl LocalFuncStat {
    pub fn local_name(&self) -> Option<LocalName> {
        self.0.children().find_map(LocalName::cast)
    }

    pub fn closure(&self) -> Option<ClosureExpr> {
        self.0.children().find_map(ClosureExpr::cast)
    }
}

ast_node!(DoStat, DO_STAT);
ast_node!(WhileStat, WHILE_STAT);
ast_node!(IfStat, IF_STAT);
ast_node!(BreakStat, BREAK_STAT);
ast_node!(GotoStat, GOTO_STAT);
ast_node!(LabelStat, LABEL_STAT);
ast_node!(EmptyStat, EMPTY_STAT);

ast_node!(RepeatStat, REPEAT_STAT);

impl RepeatStat {
    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn condition(&self) -> Option<Expr> {
        children_after(&self.0, SyntaxKind::UNTIL_KW).into_iter().next()
    }
}

ast_node!(ForStat, FOR_STAT);

impl ForStat {
    pub fn var(&self) -> Option<LocalName> {
        self.0.children().find_map(LocalName::cast)
    }

    /// Start, limit and optional step.
    pub fn exprs(&self) -> Vec<Expr> {
        children_after(&self.0, SyntaxKind::EQ)
    }

    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(ForRangeStat, FOR_RANGE_STAT);

impl ForRangeStat {
    pub fn vars(&self) -> impl Iterator<Item = LocalName> + '_ {
        self.0.children().filter_map(LocalName::cast)
    }

    pub fn exprs(&self) -> Vec<Expr> {
        children_after(&self.0, SyntaxKind::IN_KW)
    }

    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(ReturnStat, RETURN_STAT);

impl ReturnStat {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_enum!(Expr {
    Name(NameExpr) = NAME_EXPR,
    Index(IndexExpr) = INDEX_EXPR,
    Call(CallExpr) = CALL_EXPR,
    Paren(ParenExpr) = PAREN_EXPR,
    Literal(LiteralExpr) = LITERAL_EXPR,
    Table(TableExpr) = TABLE_EXPR,
    Closure(ClosureExpr) = CLOSURE_EXPR,
    Binary(BinaryExpr) = BINARY_EXPR,
    Unary(UnaryExpr) = UNARY_EXPR,
});

ast_node!(NameExpr, NAME_EXPR);

impl NameExpr {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

/// The key of an index expression or table field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKeySyntax {
    Name(SyntaxToken),
    Expr(Expr),
}

impl IndexExpr {
    pub fn prefix(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// `a.b` / `a:b` name, or the bracketed expression in `a[k]`.
    pub fn key(&self) -> Option<IndexKeySyntax> {
        if let Some(name) = first_token(&self.0, SyntaxKind::IDENT) {
            return Some(IndexKeySyntax::Name(name));
        }
        children_after(&self.0, SyntaxKind::L_BRACKET)
            .into_iter()
            .next()
            .map(IndexKeySyntax::Expr)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn is_colon(&self) -> bool {
        has_token(&self.0, SyntaxKind::COLON)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn args(&self) -> Vec<Expr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::CALL_ARG_LIST)
            .map(|list| list.children().filter_map(Expr::cast).collect())
            .unwrap_or_default()
    }

    /// `obj:method(...)` passes `obj` implicitly.
    pub fn is_colon_call(&self) -> bool {
        matches!(self.callee(), Some(Expr::Index(index)) if index.is_colon())
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(LiteralExpr, LITERAL_EXPR);

/// Literal kinds recognized by inference
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Nil,
    Bool,
    Integer(i64),
    Float,
    String(String),
    VarArgs,
}

impl LiteralExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0).find(|t| !t.kind().is_trivia())
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        let token = self.token()?;
        Some(match token.kind() {
            SyntaxKind::NIL_KW => LiteralKind::Nil,
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => LiteralKind::Bool,
            SyntaxKind::DOT_DOT_DOT => LiteralKind::VarArgs,
            SyntaxKind::STRING => LiteralKind::String(unquote(token.text()).to_string()),
            SyntaxKind::NUMBER => parse_integer(token.text())
                .map(LiteralKind::Integer)
                .unwrap_or(LiteralKind::Float),
            _ => return None,
        })
    }
}

/// Strip quotes or long brackets; escapes are left as written.
pub fn unquote(text: &str) -> &str {
    if let Some(inner) = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| text.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
    {
        return inner;
    }
    let level = text
        .strip_prefix('[')
        .map(|rest| rest.bytes().take_while(|&b| b == b'=').count());
    match level {
        Some(level) if text.len() >= 2 * level + 4 => {
            let inner = &text[level + 2..text.len() - level - 2];
            inner.strip_prefix('\n').unwrap_or(inner)
        }
        _ => text,
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    text.parse().ok()
}

ast_node!(TableExpr, TABLE_EXPR);

impl TableExpr {
    pub fn fields(&self) -> impl Iterator<Item = TableField> + '_ {
        self.0.children().filter_map(TableField::cast)
    }
}

ast_node!(TableField, TABLE_FIELD);

impl TableField {
    /// `name = value`
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }

    /// `[key] = value`
    pub fn key_expr(&self) -> Option<Expr> {
        if !has_token(&self.0, SyntaxKind::L_BRACKET) {
            return None;
        }
        self.0.children().find_map(Expr::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        if has_token(&self.0, SyntaxKind::EQ) {
            children_after(&self.0, SyntaxKind::EQ).into_iter().next()
        } else {
            self.0.children().find_map(Expr::cast)
        }
    }

    pub fn is_positional(&self) -> bool {
        !has_token(&self.0, SyntaxKind::EQ)
    }

    pub fn doc_comment(&self) -> Option<DocComment> {
        preceding_doc_comment(&self.0)
    }
}

ast_node!(ClosureExpr, CLOSURE_EXPR);

impl ClosureExpr {
    pub fn params(&self) -> Vec<ParamDef> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::PARAM_LIST)
            .map(|list| list.children().filter_map(ParamDef::cast).collect())
            .unwrap_or_default()
    }

    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(ParamDef, PARAM_DEF);

impl ParamDef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0)
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT_DOT_DOT))
    }

    pub fn is_vararg(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT_DOT_DOT)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxKind> {
        direct_tokens(&self.0)
            .map(|t| t.kind())
            .find(|k| !k.is_trivia() && !k.is_doc_token())
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn op(&self) -> Option<SyntaxKind> {
        direct_tokens(&self.0)
            .map(|t| t.kind())
            .find(|k| !k.is_trivia())
    }
}

// ============================================================================
// Doc comments and tags
// ============================================================================

ast_node!(DocComment, DOC_COMMENT);

impl DocComment {
    pub fn tags(&self) -> impl Iterator<Item = DocTag> + '_ {
        self.0.children().filter_map(DocTag::cast)
    }

    /// The statement or table field this comment documents.
    pub fn owner(&self) -> Option<SyntaxNode> {
        let mut element = self.0.next_sibling_or_token();
        while let Some(current) = element {
            match current {
                rowan::NodeOrToken::Token(token) if token.kind().is_trivia() => {
                    element = token.next_sibling_or_token();
                }
                rowan::NodeOrToken::Node(node)
                    if node.kind().is_stat() || node.kind() == SyntaxKind::TABLE_FIELD =>
                {
                    return Some(node);
                }
                _ => return None,
            }
        }
        None
    }
}

ast_enum!(DocTag {
    Class(DocTagClass) = DOC_TAG_CLASS,
    Interface(DocTagInterface) = DOC_TAG_INTERFACE,
    Alias(DocTagAlias) = DOC_TAG_ALIAS,
    Enum(DocTagEnum) = DOC_TAG_ENUM,
    Field(DocTagField) = DOC_TAG_FIELD,
    Type(DocTagType) = DOC_TAG_TYPE,
    Param(DocTagParam) = DOC_TAG_PARAM,
    Return(DocTagReturn) = DOC_TAG_RETURN,
    Generic(DocTagGeneric) = DOC_TAG_GENERIC,
    Operator(DocTagOperator) = DOC_TAG_OPERATOR,
    Other(DocTagOther) = DOC_TAG_OTHER,
});

/// The declared name of a tag: the DOC_NAME after the tag keyword.
fn tag_name(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_tokens(node)
        .filter(|t| t.kind() == SyntaxKind::DOC_NAME)
        .nth(1)
}

fn generic_decls(node: &SyntaxNode) -> Vec<DocGenericDecl> {
    node.children()
        .find(|n| n.kind() == SyntaxKind::DOC_GENERIC_DECL_LIST)
        .map(|list| list.children().filter_map(DocGenericDecl::cast).collect())
        .unwrap_or_default()
}

ast_node!(DocTagClass, DOC_TAG_CLASS);
ast_node!(DocTagInterface, DOC_TAG_INTERFACE);

macro_rules! class_like {
    ($name:ident) => {
        impl $name {
            pub fn name_token(&self) -> Option<SyntaxToken> {
                tag_name(&self.0)
            }

            pub fn generic_decls(&self) -> Vec<DocGenericDecl> {
                generic_decls(&self.0)
            }

            pub fn supers(&self) -> Vec<DocType> {
                children_after(&self.0, SyntaxKind::DOC_COLON)
            }
        }
    };
}

class_like!(DocTagClass);
class_like!(DocTagInterface);

ast_node!(DocTagAlias, DOC_TAG_ALIAS);

impl DocTagAlias {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        tag_name(&self.0)
    }

    pub fn generic_decls(&self) -> Vec<DocGenericDecl> {
        generic_decls(&self.0)
    }

    pub fn ty(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocTagEnum, DOC_TAG_ENUM);

impl DocTagEnum {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        tag_name(&self.0)
    }
}

ast_node!(DocTagField, DOC_TAG_FIELD);

/// Key of a `---@field` or doc table field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocFieldKey {
    Name(SyntaxToken),
    Type(DocType),
}

impl DocTagField {
    pub fn key(&self) -> Option<DocFieldKey> {
        if has_token(&self.0, SyntaxKind::DOC_L_BRACKET) {
            return self.0.children().find_map(DocType::cast).map(DocFieldKey::Type);
        }
        self.name_token().map(DocFieldKey::Name)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        if has_token(&self.0, SyntaxKind::DOC_L_BRACKET) {
            return None;
        }
        // keyword, optional visibility, then the field name
        self.0
            .children_with_tokens()
            .take_while(|e| !e.as_node().is_some_and(|n| DocType::can_cast(n.kind())))
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::DOC_NAME)
            .skip(1)
            .last()
    }

    pub fn visibility(&self) -> Option<String> {
        let names: Vec<_> = self
            .0
            .children_with_tokens()
            .take_while(|e| !e.as_node().is_some_and(|n| DocType::can_cast(n.kind())))
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::DOC_NAME)
            .collect();
        let bracketed = has_token(&self.0, SyntaxKind::DOC_L_BRACKET);
        match (names.len(), bracketed) {
            (3, false) | (2, true) => Some(names[1].text().to_string()),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOC_QUESTION)
    }

    pub fn ty(&self) -> Option<DocType> {
        let types: Vec<DocType> = self.0.children().filter_map(DocType::cast).collect();
        let skip = usize::from(has_token(&self.0, SyntaxKind::DOC_L_BRACKET));
        types.into_iter().nth(skip)
    }
}

ast_node!(DocTagType, DOC_TAG_TYPE);

impl DocTagType {
    pub fn types(&self) -> impl Iterator<Item = DocType> + '_ {
        self.0.children().filter_map(DocType::cast)
    }
}

ast_node!(DocTagParam, DOC_TAG_PARAM);

impl DocTagParam {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0)
            .filter(|t| matches!(t.kind(), SyntaxKind::DOC_NAME | SyntaxKind::DOC_DOTS))
            .nth(1)
    }

    pub fn is_nullable(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOC_QUESTION)
    }

    pub fn ty(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocTagReturn, DOC_TAG_RETURN);

impl DocTagReturn {
    pub fn types(&self) -> impl Iterator<Item = DocType> + '_ {
        self.0.children().filter_map(DocType::cast)
    }
}

ast_node!(DocTagGeneric, DOC_TAG_GENERIC);

impl DocTagGeneric {
    pub fn decls(&self) -> impl Iterator<Item = DocGenericDecl> + '_ {
        self.0.children().filter_map(DocGenericDecl::cast)
    }
}

ast_node!(DocTagOperator, DOC_TAG_OPERATOR);

impl DocTagOperator {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        tag_name(&self.0)
    }

    pub fn operand(&self) -> Option<DocType> {
        children_before::<DocType>(&self.0, SyntaxKind::DOC_R_PAREN)
            .into_iter()
            .next()
            .filter(|_| has_token(&self.0, SyntaxKind::DOC_L_PAREN))
    }

    pub fn result(&self) -> Option<DocType> {
        children_after(&self.0, SyntaxKind::DOC_COLON).into_iter().next()
    }
}

ast_node!(DocTagOther, DOC_TAG_OTHER);

ast_node!(DocGenericDecl, DOC_GENERIC_DECL);

impl DocGenericDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::DOC_NAME)
    }

    pub fn constraint(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

// ============================================================================
// Doc types
// ============================================================================

ast_enum!(DocType {
    Name(DocNameType) = DOC_NAME_TYPE,
    Generic(DocGenericType) = DOC_GENERIC_TYPE,
    Array(DocArrayType) = DOC_ARRAY_TYPE,
    Union(DocUnionType) = DOC_UNION_TYPE,
    Nullable(DocNullableType) = DOC_NULLABLE_TYPE,
    Func(DocFuncType) = DOC_FUNC_TYPE,
    Table(DocTableType) = DOC_TABLE_TYPE,
    Paren(DocParenType) = DOC_PAREN_TYPE,
    Literal(DocLiteralType) = DOC_LITERAL_TYPE,
});

ast_node!(DocNameType, DOC_NAME_TYPE);

impl DocNameType {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::DOC_NAME)
    }
}

ast_node!(DocGenericType, DOC_GENERIC_TYPE);

impl DocGenericType {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::DOC_NAME)
    }

    pub fn args(&self) -> impl Iterator<Item = DocType> + '_ {
        self.0.children().filter_map(DocType::cast)
    }
}

ast_node!(DocArrayType, DOC_ARRAY_TYPE);

impl DocArrayType {
    pub fn element(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocUnionType, DOC_UNION_TYPE);

impl DocUnionType {
    pub fn members(&self) -> impl Iterator<Item = DocType> + '_ {
        self.0.children().filter_map(DocType::cast)
    }
}

ast_node!(DocNullableType, DOC_NULLABLE_TYPE);

impl DocNullableType {
    pub fn inner(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocFuncType, DOC_FUNC_TYPE);

impl DocFuncType {
    pub fn params(&self) -> impl Iterator<Item = DocFuncParam> + '_ {
        self.0.children().filter_map(DocFuncParam::cast)
    }

    pub fn returns(&self) -> Vec<DocType> {
        children_after(&self.0, SyntaxKind::DOC_COLON)
    }
}

ast_node!(DocFuncParam, DOC_FUNC_PARAM);

impl DocFuncParam {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0)
            .find(|t| matches!(t.kind(), SyntaxKind::DOC_NAME | SyntaxKind::DOC_DOTS))
    }

    pub fn is_nullable(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOC_QUESTION)
    }

    pub fn ty(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocTableType, DOC_TABLE_TYPE);

impl DocTableType {
    pub fn fields(&self) -> impl Iterator<Item = DocTableField> + '_ {
        self.0.children().filter_map(DocTableField::cast)
    }
}

ast_node!(DocTableField, DOC_TABLE_FIELD);

impl DocTableField {
    pub fn key(&self) -> Option<DocFieldKey> {
        if has_token(&self.0, SyntaxKind::DOC_L_BRACKET) {
            return self.0.children().find_map(DocType::cast).map(DocFieldKey::Type);
        }
        first_token(&self.0, SyntaxKind::DOC_NAME).map(DocFieldKey::Name)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        match self.key()? {
            DocFieldKey::Name(token) => Some(token),
            DocFieldKey::Type(_) => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOC_QUESTION)
    }

    pub fn ty(&self) -> Option<DocType> {
        children_after(&self.0, SyntaxKind::DOC_COLON).into_iter().next()
    }
}

ast_node!(DocParenType, DOC_PAREN_TYPE);

impl DocParenType {
    pub fn inner(&self) -> Option<DocType> {
        self.0.children().find_map(DocType::cast)
    }
}

ast_node!(DocLiteralType, DOC_LITERAL_TYPE);

impl DocLiteralType {
    pub fn token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0)
            .find(|t| matches!(t.kind(), SyntaxKind::DOC_STRING | SyntaxKind::DOC_INTEGER))
    }
}
