//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree:
//! Lua 5.4 statements and expressions plus the `---@` annotation dialect.

/// All syntax kinds (tokens and nodes) for Lua and its doc annotations
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (statements, expressions, doc tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,  // name
    NUMBER, // 42, 3.14, 0xff
    STRING, // "a", 'a', [[a]]

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    AND_KW,
    BREAK_KW,
    DO_KW,
    ELSE_KW,
    ELSEIF_KW,
    END_KW,
    FALSE_KW,
    FOR_KW,
    FUNCTION_KW,
    GOTO_KW,
    IF_KW,
    IN_KW,
    LOCAL_KW,
    NIL_KW,
    NOT_KW,
    OR_KW,
    REPEAT_KW,
    RETURN_KW,
    THEN_KW,
    TRUE_KW,
    UNTIL_KW,
    WHILE_KW,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    PLUS,         // +
    MINUS,        // -
    STAR,         // *
    SLASH,        // /
    SLASH_SLASH,  // //
    PERCENT,      // %
    CARET,        // ^
    HASH,         // #
    AMP,          // &
    TILDE,        // ~
    PIPE,         // |
    LT_LT,        // <<
    GT_GT,        // >>
    EQ_EQ,        // ==
    TILDE_EQ,     // ~=
    LT_EQ,        // <=
    GT_EQ,        // >=
    LT,           // <
    GT,           // >
    EQ,           // =
    L_PAREN,      // (
    R_PAREN,      // )
    L_BRACE,      // {
    R_BRACE,      // }
    L_BRACKET,    // [
    R_BRACKET,    // ]
    COLON_COLON,  // ::
    SEMICOLON,    // ;
    COLON,        // :
    COMMA,        // ,
    DOT,          // .
    DOT_DOT,      // ..
    DOT_DOT_DOT,  // ...

    // =========================================================================
    // DOC TOKENS (inside `---@` comment lines)
    // =========================================================================
    DOC_START,       // ---@
    DOC_WHITESPACE,
    DOC_NAME,
    DOC_INTEGER,
    DOC_STRING,
    DOC_PIPE,        // |
    DOC_LT,          // <
    DOC_GT,          // >
    DOC_COMMA,       // ,
    DOC_COLON,       // :
    DOC_L_BRACKET,   // [
    DOC_R_BRACKET,   // ]
    DOC_L_PAREN,     // (
    DOC_R_PAREN,     // )
    DOC_L_BRACE,     // {
    DOC_R_BRACE,     // }
    DOC_QUESTION,    // ?
    DOC_DOTS,        // ...
    DOC_DESCRIPTION, // `@ text` / `# text` trailing description

    // =========================================================================
    // NODES - Chunk and statements
    // =========================================================================
    SOURCE_FILE,
    BLOCK,
    LOCAL_STAT,
    LOCAL_NAME,
    ATTRIBUTE,
    ASSIGN_STAT,
    CALL_STAT,
    FUNC_STAT,
    LOCAL_FUNC_STAT,
    DO_STAT,
    WHILE_STAT,
    REPEAT_STAT,
    IF_STAT,
    ELSEIF_CLAUSE,
    ELSE_CLAUSE,
    FOR_STAT,
    FOR_RANGE_STAT,
    RETURN_STAT,
    BREAK_STAT,
    GOTO_STAT,
    LABEL_STAT,
    EMPTY_STAT,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    NAME_EXPR,
    INDEX_EXPR,
    CALL_EXPR,
    CALL_ARG_LIST,
    PAREN_EXPR,
    LITERAL_EXPR,
    TABLE_EXPR,
    TABLE_FIELD,
    CLOSURE_EXPR,
    PARAM_LIST,
    PARAM_DEF,
    BINARY_EXPR,
    UNARY_EXPR,

    // =========================================================================
    // NODES - Doc comments
    // =========================================================================
    DOC_COMMENT,
    DOC_TAG_CLASS,
    DOC_TAG_INTERFACE,
    DOC_TAG_ALIAS,
    DOC_TAG_ENUM,
    DOC_TAG_FIELD,
    DOC_TAG_TYPE,
    DOC_TAG_PARAM,
    DOC_TAG_RETURN,
    DOC_TAG_GENERIC,
    DOC_TAG_OPERATOR,
    DOC_TAG_OTHER,
    DOC_GENERIC_DECL_LIST,
    DOC_GENERIC_DECL,

    // =========================================================================
    // NODES - Doc types
    // =========================================================================
    DOC_NAME_TYPE,
    DOC_GENERIC_TYPE,
    DOC_ARRAY_TYPE,
    DOC_UNION_TYPE,
    DOC_NULLABLE_TYPE,
    DOC_FUNC_TYPE,
    DOC_FUNC_PARAM,
    DOC_TABLE_TYPE,
    DOC_TABLE_FIELD,
    DOC_PAREN_TYPE,
    DOC_LITERAL_TYPE,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AND_KW as u16) && (self as u16) <= (Self::WHILE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::PLUS as u16) && (self as u16) <= (Self::DOT_DOT_DOT as u16)
    }

    /// Check if this token was produced by the doc-comment sub-lexer
    pub fn is_doc_token(self) -> bool {
        (self as u16) >= (Self::DOC_START as u16) && (self as u16) <= (Self::DOC_DESCRIPTION as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER | Self::STRING | Self::NIL_KW | Self::TRUE_KW | Self::FALSE_KW | Self::DOT_DOT_DOT
        )
    }

    /// Nodes that begin a statement
    pub fn is_stat(self) -> bool {
        (self as u16) >= (Self::LOCAL_STAT as u16) && (self as u16) <= (Self::EMPTY_STAT as u16)
            && !matches!(self, Self::LOCAL_NAME | Self::ATTRIBUTE | Self::ELSEIF_CLAUSE | Self::ELSE_CLAUSE)
    }

    /// Expression nodes
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            Self::NAME_EXPR
                | Self::INDEX_EXPR
                | Self::CALL_EXPR
                | Self::PAREN_EXPR
                | Self::LITERAL_EXPR
                | Self::TABLE_EXPR
                | Self::CLOSURE_EXPR
                | Self::BINARY_EXPR
                | Self::UNARY_EXPR
        )
    }

    /// Doc type nodes
    pub fn is_doc_type(self) -> bool {
        (self as u16) >= (Self::DOC_NAME_TYPE as u16) && (self as u16) <= (Self::DOC_LITERAL_TYPE as u16)
            && !matches!(self, Self::DOC_FUNC_PARAM | Self::DOC_TABLE_FIELD)
    }

    /// Doc tag nodes
    pub fn is_doc_tag(self) -> bool {
        (self as u16) >= (Self::DOC_TAG_CLASS as u16) && (self as u16) <= (Self::DOC_TAG_OTHER as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LuaLanguage {}

impl rowan::Language for LuaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<LuaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<LuaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<LuaLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<LuaLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(!SyntaxKind::DOC_START.is_trivia());
        assert!(SyntaxKind::UNTIL_KW.is_keyword());
        assert!(SyntaxKind::DOT_DOT_DOT.is_punct());
        assert!(SyntaxKind::DOC_DESCRIPTION.is_doc_token());
        assert!(SyntaxKind::REPEAT_STAT.is_stat());
        assert!(!SyntaxKind::LOCAL_NAME.is_stat());
        assert!(SyntaxKind::DOC_UNION_TYPE.is_doc_type());
        assert!(!SyntaxKind::DOC_TABLE_FIELD.is_doc_type());
    }

    #[test]
    fn test_raw_roundtrip() {
        let raw: rowan::SyntaxKind = SyntaxKind::FOR_RANGE_STAT.into();
        assert_eq!(SyntaxKind::from(raw), SyntaxKind::FOR_RANGE_STAT);
    }
}
