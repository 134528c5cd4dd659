//! Recursive descent parser for Lua
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Lua source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

const UNARY_PRIORITY: u8 = 12;

/// Left/right binding power of a binary operator.
fn binary_priority(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;
    Some(match kind {
        OR_KW => (1, 1),
        AND_KW => (2, 2),
        LT | GT | LT_EQ | GT_EQ | TILDE_EQ | EQ_EQ => (3, 3),
        PIPE => (4, 4),
        TILDE => (5, 5),
        AMP => (6, 6),
        LT_LT | GT_GT => (7, 7),
        // right associative
        DOT_DOT => (9, 8),
        PLUS | MINUS => (10, 10),
        STAR | SLASH | SLASH_SLASH | PERCENT => (11, 11),
        CARET => (14, 13),
        _ => return None,
    })
}

fn is_unary_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NOT_KW | SyntaxKind::MINUS | SyntaxKind::HASH | SyntaxKind::TILDE
    )
}

fn is_block_end(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::END_KW | SyntaxKind::ELSE_KW | SyntaxKind::ELSEIF_KW | SyntaxKind::UNTIL_KW
    )
}

fn can_start_expr(kind: SyntaxKind) -> bool {
    kind.is_literal()
        || is_unary_op(kind)
        || matches!(
            kind,
            SyntaxKind::IDENT | SyntaxKind::L_BRACE | SyntaxKind::L_PAREN | SyntaxKind::FUNCTION_KW
        )
}

/// Tokens skipped by lookahead: plain trivia and annotation lines.
fn is_skippable(kind: SyntaxKind) -> bool {
    kind.is_trivia() || kind.is_doc_token()
}

/// The parser state
pub(super) struct Parser<'a> {
    pub(super) tokens: &'a [Token<'a>],
    pub(super) pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub(super) fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(super) fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    pub(super) fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    pub(super) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth_pos(&self, n: usize) -> Option<usize> {
        (self.pos..self.tokens.len())
            .filter(|&idx| !is_skippable(self.tokens[idx].kind))
            .nth(n)
    }

    /// Look ahead, skipping trivia and annotation lines
    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_pos(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn peek_eof(&self) -> bool {
        self.nth_pos(0).is_none()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(super) fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume the next significant token if it has the given kind.
    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == kind {
            self.skip_trivia();
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    /// Skip whitespace and plain comments.
    pub(super) fn skip_plain_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    /// Skip trivia; annotation lines met on the way become DOC_COMMENT nodes.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_plain_trivia();
            if self.at(SyntaxKind::DOC_START) {
                self.parse_doc_comment();
            } else {
                break;
            }
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(super) fn error(&mut self, message: impl Into<String>) {
        let range = self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| !t.kind.is_trivia() && t.kind != SyntaxKind::DOC_WHITESPACE)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            });
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Wrap the current token in an ERROR node.
    fn error_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    // =========================================================================
    // Grammar rules - statements
    // =========================================================================

    /// SourceFile = Block
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        self.parse_block(true);
        self.finish_node();
    }

    /// Block = (DocComment | Statement)*
    ///
    /// The top-level block runs to end of input; a stray `end` or `until`
    /// is reported and skipped there.
    fn parse_block(&mut self, top_level: bool) {
        self.skip_plain_trivia();
        self.start_node(SyntaxKind::BLOCK);

        loop {
            self.skip_plain_trivia();
            if self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::DOC_START) {
                self.parse_doc_comment();
                continue;
            }
            if is_block_end(self.current_kind()) {
                if !top_level {
                    break;
                }
                self.error_bump(format!("unexpected {:?}", self.current_kind()));
                continue;
            }

            let pos_before = self.pos;
            self.parse_statement();
            // If we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_bump(format!("unexpected {:?}", self.current_kind()));
            }
        }

        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STAT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::LOCAL_KW if self.nth(1) == SyntaxKind::FUNCTION_KW => {
                self.parse_local_function()
            }
            SyntaxKind::LOCAL_KW => self.parse_local_stat(),
            SyntaxKind::FUNCTION_KW => self.parse_function_stat(),
            SyntaxKind::IF_KW => self.parse_if_stat(),
            SyntaxKind::WHILE_KW => self.parse_while_stat(),
            SyntaxKind::DO_KW => self.parse_do_stat(),
            SyntaxKind::FOR_KW => self.parse_for_stat(),
            SyntaxKind::REPEAT_KW => self.parse_repeat_stat(),
            SyntaxKind::RETURN_KW => self.parse_return_stat(),
            SyntaxKind::BREAK_KW => {
                self.start_node(SyntaxKind::BREAK_STAT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::GOTO_KW => {
                self.start_node(SyntaxKind::GOTO_STAT);
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.finish_node();
            }
            SyntaxKind::COLON_COLON => {
                self.start_node(SyntaxKind::LABEL_STAT);
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.expect(SyntaxKind::COLON_COLON);
                self.finish_node();
            }
            _ => self.parse_expr_stat(),
        }
    }

    /// LocalStat = 'local' LocalName (',' LocalName)* ('=' ExprList)?
    fn parse_local_stat(&mut self) {
        self.start_node(SyntaxKind::LOCAL_STAT);
        self.bump(); // local

        loop {
            self.parse_local_name(true);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr_list();
        }

        self.finish_node();
    }

    /// LocalName = IDENT Attribute?
    fn parse_local_name(&mut self, allow_attribute: bool) {
        self.skip_trivia();
        self.start_node(SyntaxKind::LOCAL_NAME);
        self.expect(SyntaxKind::IDENT);
        if allow_attribute && self.peek() == SyntaxKind::LT {
            self.skip_trivia();
            self.start_node(SyntaxKind::ATTRIBUTE);
            self.bump();
            self.expect(SyntaxKind::IDENT);
            self.expect(SyntaxKind::GT);
            self.finish_node();
        }
        self.finish_node();
    }

    /// LocalFuncStat = 'local' 'function' LocalName FuncBody
    fn parse_local_function(&mut self) {
        self.start_node(SyntaxKind::LOCAL_FUNC_STAT);
        self.bump(); // local
        self.eat(SyntaxKind::FUNCTION_KW);
        self.parse_local_name(false);
        self.parse_closure(false);
        self.finish_node();
    }

    /// FuncStat = 'function' FuncName FuncBody
    fn parse_function_stat(&mut self) {
        self.start_node(SyntaxKind::FUNC_STAT);
        self.bump(); // function
        self.parse_function_name();
        self.parse_closure(false);
        self.finish_node();
    }

    /// FuncName = IDENT ('.' IDENT)* (':' IDENT)?
    fn parse_function_name(&mut self) {
        self.skip_trivia();
        let checkpoint = self.checkpoint();
        self.start_node(SyntaxKind::NAME_EXPR);
        self.expect(SyntaxKind::IDENT);
        self.finish_node();

        loop {
            let kind = self.peek();
            if !matches!(kind, SyntaxKind::DOT | SyntaxKind::COLON) {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
            self.eat(kind);
            self.expect(SyntaxKind::IDENT);
            self.finish_node();
            if kind == SyntaxKind::COLON {
                break;
            }
        }
    }

    /// Closure = 'function'? ParamList Block 'end'
    ///
    /// Function statements start the closure at the parameter list;
    /// function expressions include the keyword.
    fn parse_closure(&mut self, with_keyword: bool) {
        self.skip_trivia();
        self.start_node(SyntaxKind::CLOSURE_EXPR);
        if with_keyword {
            self.bump(); // function
        }
        self.parse_param_list();
        self.parse_block(false);
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    /// ParamList = '(' (ParamDef (',' ParamDef)*)? ')'
    fn parse_param_list(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::PARAM_LIST);
        self.expect(SyntaxKind::L_PAREN);
        if self.peek() != SyntaxKind::R_PAREN {
            loop {
                self.skip_trivia();
                if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::DOT_DOT_DOT) {
                    self.start_node(SyntaxKind::PARAM_DEF);
                    self.bump();
                    self.finish_node();
                } else {
                    self.error("expected parameter");
                    break;
                }
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// IfStat = 'if' Expr 'then' Block ElseifClause* ElseClause? 'end'
    fn parse_if_stat(&mut self) {
        self.start_node(SyntaxKind::IF_STAT);
        self.bump(); // if
        self.parse_expr();
        self.expect(SyntaxKind::THEN_KW);
        self.parse_block(false);

        while self.at(SyntaxKind::ELSEIF_KW) {
            self.start_node(SyntaxKind::ELSEIF_CLAUSE);
            self.bump();
            self.parse_expr();
            self.expect(SyntaxKind::THEN_KW);
            self.parse_block(false);
            self.finish_node();
        }
        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_block(false);
            self.finish_node();
        }

        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    fn parse_while_stat(&mut self) {
        self.start_node(SyntaxKind::WHILE_STAT);
        self.bump(); // while
        self.parse_expr();
        self.expect(SyntaxKind::DO_KW);
        self.parse_block(false);
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    fn parse_do_stat(&mut self) {
        self.start_node(SyntaxKind::DO_STAT);
        self.bump(); // do
        self.parse_block(false);
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    /// ForStat = 'for' LocalName '=' ExprList 'do' Block 'end'
    /// ForRangeStat = 'for' LocalName (',' LocalName)* 'in' ExprList 'do' Block 'end'
    fn parse_for_stat(&mut self) {
        let numeric = self.nth(2) == SyntaxKind::EQ;
        self.start_node(if numeric {
            SyntaxKind::FOR_STAT
        } else {
            SyntaxKind::FOR_RANGE_STAT
        });
        self.bump(); // for
        self.parse_local_name(false);

        if numeric {
            self.expect(SyntaxKind::EQ);
        } else {
            while self.eat(SyntaxKind::COMMA) {
                self.parse_local_name(false);
            }
            self.expect(SyntaxKind::IN_KW);
        }
        self.parse_expr_list();

        self.expect(SyntaxKind::DO_KW);
        self.parse_block(false);
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    /// RepeatStat = 'repeat' Block 'until' Expr
    fn parse_repeat_stat(&mut self) {
        self.start_node(SyntaxKind::REPEAT_STAT);
        self.bump(); // repeat
        self.parse_block(false);
        self.expect(SyntaxKind::UNTIL_KW);
        self.parse_expr();
        self.finish_node();
    }

    /// ReturnStat = 'return' ExprList? ';'?
    fn parse_return_stat(&mut self) {
        self.start_node(SyntaxKind::RETURN_STAT);
        self.bump(); // return
        if can_start_expr(self.peek()) {
            self.parse_expr_list();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// AssignStat = SuffixedExpr (',' SuffixedExpr)* '=' ExprList
    /// CallStat = SuffixedExpr
    fn parse_expr_stat(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_suffixed_expr();

        if matches!(self.peek(), SyntaxKind::EQ | SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::ASSIGN_STAT);
            while self.eat(SyntaxKind::COMMA) {
                self.parse_suffixed_expr();
            }
            self.expect(SyntaxKind::EQ);
            self.parse_expr_list();
            self.finish_node();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::CALL_STAT);
            self.finish_node();
        }
    }

    // =========================================================================
    // Grammar rules - expressions
    // =========================================================================

    fn parse_expr_list(&mut self) {
        self.parse_expr();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_expr();
        }
    }

    fn parse_expr(&mut self) {
        self.parse_sub_expr(0);
    }

    /// Precedence climbing over unary and binary operators.
    fn parse_sub_expr(&mut self, limit: u8) {
        self.skip_trivia();
        let checkpoint = self.checkpoint();

        if is_unary_op(self.current_kind()) {
            self.start_node(SyntaxKind::UNARY_EXPR);
            self.bump();
            self.parse_sub_expr(UNARY_PRIORITY);
            self.finish_node();
        } else {
            self.parse_simple_expr();
        }

        while let Some((left, right)) = binary_priority(self.peek()) {
            if left <= limit {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
            self.skip_trivia();
            self.bump(); // operator
            self.parse_sub_expr(right);
            self.finish_node();
        }
    }

    fn parse_simple_expr(&mut self) {
        match self.current_kind() {
            kind if kind.is_literal() => {
                self.start_node(SyntaxKind::LITERAL_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.parse_table_expr(),
            SyntaxKind::FUNCTION_KW => self.parse_closure(true),
            _ => self.parse_suffixed_expr(),
        }
    }

    /// PrimaryExpr = IDENT | '(' Expr ')'
    fn parse_primary_expr(&mut self) {
        self.skip_trivia();
        match self.current_kind() {
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            kind => {
                let recoverable = !self.at_eof()
                    && !kind.is_keyword()
                    && !matches!(
                        kind,
                        SyntaxKind::R_PAREN | SyntaxKind::R_BRACE | SyntaxKind::R_BRACKET
                    );
                if recoverable {
                    self.error_bump("expected expression");
                } else {
                    self.error("expected expression");
                }
            }
        }
    }

    /// SuffixedExpr = PrimaryExpr ('.' IDENT | '[' Expr ']' | ':' IDENT CallArgs | CallArgs)*
    fn parse_suffixed_expr(&mut self) {
        self.skip_trivia();
        let checkpoint = self.checkpoint();
        self.parse_primary_expr();

        loop {
            match self.peek() {
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.eat(SyntaxKind::DOT);
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.eat(SyntaxKind::L_BRACKET);
                    self.parse_expr();
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                }
                SyntaxKind::COLON => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.eat(SyntaxKind::COLON);
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.parse_call_args();
                    self.finish_node();
                }
                SyntaxKind::L_PAREN | SyntaxKind::STRING | SyntaxKind::L_BRACE => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.parse_call_args();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// CallArgs = '(' ExprList? ')' | STRING | TableExpr
    fn parse_call_args(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::CALL_ARG_LIST);
        match self.current_kind() {
            SyntaxKind::STRING => {
                self.start_node(SyntaxKind::LITERAL_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.parse_table_expr(),
            _ => {
                self.expect(SyntaxKind::L_PAREN);
                if self.peek() != SyntaxKind::R_PAREN {
                    self.parse_expr_list();
                }
                self.expect(SyntaxKind::R_PAREN);
            }
        }
        self.finish_node();
    }

    /// TableExpr = '{' (TableField ((',' | ';') TableField)* (',' | ';')?)? '}'
    fn parse_table_expr(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TABLE_EXPR);
        self.bump(); // {

        loop {
            if self.peek() == SyntaxKind::R_BRACE || self.peek_eof() {
                break;
            }
            self.parse_table_field();
            if !(self.eat(SyntaxKind::COMMA) || self.eat(SyntaxKind::SEMICOLON)) {
                break;
            }
        }

        // Annotation lines before the closing brace stay inside the table.
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// TableField = '[' Expr ']' '=' Expr | IDENT '=' Expr | Expr
    fn parse_table_field(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TABLE_FIELD);
        match self.current_kind() {
            SyntaxKind::L_BRACKET => {
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::R_BRACKET);
                self.expect(SyntaxKind::EQ);
                self.parse_expr();
            }
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::EQ => {
                self.bump();
                self.eat(SyntaxKind::EQ);
                self.parse_expr();
            }
            _ => self.parse_expr(),
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxNode;

    fn parse_ok(input: &str) -> SyntaxNode {
        let parse = parse(input);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
        let root = parse.syntax();
        assert_eq!(root.text().to_string(), input);
        root
    }

    fn find(root: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
        root.descendants().filter(|n| n.kind() == kind).collect()
    }

    #[test]
    fn test_parse_local_stat() {
        let root = parse_ok("local a, b <const> = 1, 'x'");
        assert_eq!(find(&root, SyntaxKind::LOCAL_NAME).len(), 2);
        assert_eq!(find(&root, SyntaxKind::ATTRIBUTE).len(), 1);
        assert_eq!(find(&root, SyntaxKind::LITERAL_EXPR).len(), 2);
    }

    #[test]
    fn test_parse_method_definition_and_call() {
        let root = parse_ok("function Obj.inner:method(a, ...) return self end\nObj.inner:method(1)");
        let func = &find(&root, SyntaxKind::FUNC_STAT)[0];
        let name = func.first_child().unwrap();
        assert_eq!(name.kind(), SyntaxKind::INDEX_EXPR);
        assert_eq!(name.text().to_string(), "Obj.inner:method");
        assert_eq!(find(&root, SyntaxKind::PARAM_DEF).len(), 2);

        let call = &find(&root, SyntaxKind::CALL_EXPR)[0];
        assert_eq!(call.first_child().unwrap().kind(), SyntaxKind::INDEX_EXPR);
    }

    #[test]
    fn test_parse_binary_precedence() {
        let root = parse_ok("x = 1 + 2 * 3 .. 'a' .. 'b'");
        let top = find(&root, SyntaxKind::BINARY_EXPR)[0].clone();
        // `..` binds weakest here and is right associative
        let op = top
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
            .unwrap();
        assert_eq!(op.kind(), SyntaxKind::DOT_DOT);
        assert_eq!(top.last_child().unwrap().kind(), SyntaxKind::BINARY_EXPR);
    }

    #[test]
    fn test_parse_control_flow() {
        let input = "for i = 1, 10 do end\nfor k, v in pairs(t) do end\nrepeat local x = 1 until x\nwhile true do break end\nif a then elseif b then else end";
        let root = parse_ok(input);
        assert_eq!(find(&root, SyntaxKind::FOR_STAT).len(), 1);
        assert_eq!(find(&root, SyntaxKind::FOR_RANGE_STAT).len(), 1);
        assert_eq!(find(&root, SyntaxKind::REPEAT_STAT).len(), 1);
        assert_eq!(find(&root, SyntaxKind::ELSEIF_CLAUSE).len(), 1);
        assert_eq!(find(&root, SyntaxKind::ELSE_CLAUSE).len(), 1);
    }

    #[test]
    fn test_parse_table_constructor() {
        let root = parse_ok("local t = { a = 1, [2] = 'b'; 3, f = function() end }");
        assert_eq!(find(&root, SyntaxKind::TABLE_FIELD).len(), 4);
        assert_eq!(find(&root, SyntaxKind::CLOSURE_EXPR).len(), 1);
    }

    #[test]
    fn test_doc_lines_group_before_statement() {
        let root = parse_ok("---@class Foo\n---@field x number\nlocal Foo = {}\n");
        let block = find(&root, SyntaxKind::BLOCK)[0].clone();
        let kinds: Vec<_> = block.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::DOC_COMMENT, SyntaxKind::LOCAL_STAT]);
        assert_eq!(find(&root, SyntaxKind::DOC_TAG_CLASS).len(), 1);
        assert_eq!(find(&root, SyntaxKind::DOC_TAG_FIELD).len(), 1);
    }

    #[test]
    fn test_blank_line_splits_doc_comments() {
        let root = parse_ok("---@class A\n\n---@class B\nlocal b = {}");
        assert_eq!(find(&root, SyntaxKind::DOC_COMMENT).len(), 2);
    }

    #[test]
    fn test_recovers_from_garbage() {
        let parse = parse("local = = 5\nend\nlocal y = 1");
        assert!(!parse.ok());
        let root = parse.syntax();
        assert_eq!(root.text().to_string(), "local = = 5\nend\nlocal y = 1");
        assert_eq!(find(&root, SyntaxKind::LOCAL_STAT).len(), 2);
    }

    #[test]
    fn test_unterminated_function_does_not_hang() {
        let parse = parse("function f(a, b\n  return {");
        assert!(!parse.ok());
        assert_eq!(parse.syntax().text().to_string(), "function f(a, b\n  return {");
    }
}
