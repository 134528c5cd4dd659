//! Grammar rules for `---@` annotation lines
//!
//! ```text
//! DocComment  = DocLine+
//! DocLine     = '---@' Tag ... DOC_DESCRIPTION?
//! class       = Name GenericDecls? (':' Type (',' Type)*)?
//! alias       = Name GenericDecls? Type
//! field       = Visibility? (Name | '[' Type ']') '?'? Type
//! param       = (Name | '...') '?'? Type
//! return      = Type Name? (',' Type Name?)*
//! generic     = GenericDecl (',' GenericDecl)*
//! operator    = Name ('(' Type? ')')? (':' Type)?
//! Type        = Postfix ('|' Postfix)*
//! Postfix     = Primary ('[]' | '?')*
//! Primary     = Name ('<' Type (',' Type)* '>')? | FunType | TableType
//!             | '(' Type ')' | STRING | INTEGER
//! ```

use super::lexer::Token;
use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

fn tag_kind(name: &str) -> SyntaxKind {
    match name {
        "class" => SyntaxKind::DOC_TAG_CLASS,
        "interface" => SyntaxKind::DOC_TAG_INTERFACE,
        "alias" => SyntaxKind::DOC_TAG_ALIAS,
        "enum" => SyntaxKind::DOC_TAG_ENUM,
        "field" => SyntaxKind::DOC_TAG_FIELD,
        "type" => SyntaxKind::DOC_TAG_TYPE,
        "param" => SyntaxKind::DOC_TAG_PARAM,
        "return" => SyntaxKind::DOC_TAG_RETURN,
        "generic" => SyntaxKind::DOC_TAG_GENERIC,
        "operator" => SyntaxKind::DOC_TAG_OPERATOR,
        _ => SyntaxKind::DOC_TAG_OTHER,
    }
}

fn is_visibility(name: &str) -> bool {
    matches!(name, "public" | "private" | "protected" | "package")
}

fn can_start_doc_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::DOC_NAME
            | SyntaxKind::DOC_L_BRACE
            | SyntaxKind::DOC_L_PAREN
            | SyntaxKind::DOC_STRING
            | SyntaxKind::DOC_INTEGER
    )
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Doc token inspection (never crosses the end of the line)
    // =========================================================================

    fn doc_nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|t| t.kind.is_doc_token() && t.kind != SyntaxKind::DOC_START)
            .filter(|t| t.kind != SyntaxKind::DOC_WHITESPACE)
            .nth(n)
    }

    fn doc_peek(&self) -> SyntaxKind {
        self.doc_nth(0).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn doc_skip_ws(&mut self) {
        while self.at(SyntaxKind::DOC_WHITESPACE) {
            self.bump();
        }
    }

    fn doc_eat(&mut self, kind: SyntaxKind) -> bool {
        if self.doc_peek() == kind {
            self.doc_skip_ws();
            self.bump();
            true
        } else {
            false
        }
    }

    fn doc_expect(&mut self, kind: SyntaxKind) -> bool {
        if self.doc_eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    // =========================================================================
    // Comment and tags
    // =========================================================================

    /// Groups consecutive annotation lines into one DOC_COMMENT node.
    pub(super) fn parse_doc_comment(&mut self) {
        self.start_node(SyntaxKind::DOC_COMMENT);
        loop {
            self.parse_doc_line();
            if !self.doc_comment_continues() {
                break;
            }
            self.skip_plain_trivia();
        }
        self.finish_node();
    }

    /// A blank line or any code ends the group; plain comments do not.
    fn doc_comment_continues(&self) -> bool {
        for token in &self.tokens[self.pos..] {
            match token.kind {
                SyntaxKind::WHITESPACE if token.text.matches('\n').count() > 1 => return false,
                SyntaxKind::WHITESPACE | SyntaxKind::COMMENT => continue,
                SyntaxKind::DOC_START => return true,
                _ => return false,
            }
        }
        false
    }

    fn parse_doc_line(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump(); // ---@

        let kind = if self.at(SyntaxKind::DOC_NAME) {
            tag_kind(self.current_text())
        } else {
            SyntaxKind::DOC_TAG_OTHER
        };
        self.start_node_at(checkpoint, kind);
        if self.at(SyntaxKind::DOC_NAME) {
            self.bump(); // tag name
        }

        match kind {
            SyntaxKind::DOC_TAG_CLASS | SyntaxKind::DOC_TAG_INTERFACE => self.parse_doc_class(),
            SyntaxKind::DOC_TAG_ALIAS => self.parse_doc_alias(),
            SyntaxKind::DOC_TAG_ENUM => {
                self.doc_expect(SyntaxKind::DOC_NAME);
            }
            SyntaxKind::DOC_TAG_FIELD => self.parse_doc_field(),
            SyntaxKind::DOC_TAG_TYPE => {
                self.parse_doc_type();
                while self.doc_eat(SyntaxKind::DOC_COMMA) {
                    self.parse_doc_type();
                }
            }
            SyntaxKind::DOC_TAG_PARAM => self.parse_doc_param(),
            SyntaxKind::DOC_TAG_RETURN => self.parse_doc_return(),
            SyntaxKind::DOC_TAG_GENERIC => loop {
                self.parse_doc_generic_decl();
                if !self.doc_eat(SyntaxKind::DOC_COMMA) {
                    break;
                }
            },
            SyntaxKind::DOC_TAG_OPERATOR => self.parse_doc_operator(),
            _ => {}
        }

        // Description and anything the tag grammar left over
        while self.current_kind().is_doc_token() && !self.at(SyntaxKind::DOC_START) {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_doc_class(&mut self) {
        self.doc_expect(SyntaxKind::DOC_NAME);
        if self.doc_peek() == SyntaxKind::DOC_LT {
            self.parse_doc_generic_decl_list();
        }
        if self.doc_eat(SyntaxKind::DOC_COLON) {
            self.parse_doc_type();
            while self.doc_eat(SyntaxKind::DOC_COMMA) {
                self.parse_doc_type();
            }
        }
    }

    fn parse_doc_alias(&mut self) {
        self.doc_expect(SyntaxKind::DOC_NAME);
        if self.doc_peek() == SyntaxKind::DOC_LT {
            self.parse_doc_generic_decl_list();
        }
        if can_start_doc_type(self.doc_peek()) {
            self.parse_doc_type();
        }
    }

    fn parse_doc_field(&mut self) {
        let has_visibility = self
            .doc_nth(0)
            .is_some_and(|t| t.kind == SyntaxKind::DOC_NAME && is_visibility(t.text))
            && self.doc_nth(1).is_some_and(|t| {
                matches!(t.kind, SyntaxKind::DOC_NAME | SyntaxKind::DOC_L_BRACKET)
            });
        if has_visibility {
            self.doc_eat(SyntaxKind::DOC_NAME);
        }

        if self.doc_eat(SyntaxKind::DOC_L_BRACKET) {
            self.parse_doc_type();
            self.doc_expect(SyntaxKind::DOC_R_BRACKET);
        } else {
            self.doc_expect(SyntaxKind::DOC_NAME);
        }
        self.doc_eat(SyntaxKind::DOC_QUESTION);
        self.parse_doc_type();
    }

    fn parse_doc_param(&mut self) {
        if !self.doc_eat(SyntaxKind::DOC_DOTS) {
            self.doc_expect(SyntaxKind::DOC_NAME);
        }
        self.doc_eat(SyntaxKind::DOC_QUESTION);
        self.parse_doc_type();
    }

    fn parse_doc_return(&mut self) {
        loop {
            self.parse_doc_type();
            self.doc_eat(SyntaxKind::DOC_NAME); // return name
            if !self.doc_eat(SyntaxKind::DOC_COMMA) {
                break;
            }
        }
    }

    fn parse_doc_operator(&mut self) {
        self.doc_expect(SyntaxKind::DOC_NAME);
        if self.doc_eat(SyntaxKind::DOC_L_PAREN) {
            if self.doc_peek() != SyntaxKind::DOC_R_PAREN {
                self.parse_doc_type();
            }
            self.doc_expect(SyntaxKind::DOC_R_PAREN);
        }
        if self.doc_eat(SyntaxKind::DOC_COLON) {
            self.parse_doc_type();
        }
    }

    /// GenericDecls = '<' GenericDecl (',' GenericDecl)* '>'
    fn parse_doc_generic_decl_list(&mut self) {
        self.doc_skip_ws();
        self.start_node(SyntaxKind::DOC_GENERIC_DECL_LIST);
        self.bump(); // <
        loop {
            self.parse_doc_generic_decl();
            if !self.doc_eat(SyntaxKind::DOC_COMMA) {
                break;
            }
        }
        self.doc_expect(SyntaxKind::DOC_GT);
        self.finish_node();
    }

    /// GenericDecl = Name (':' Type)?
    fn parse_doc_generic_decl(&mut self) {
        self.doc_skip_ws();
        self.start_node(SyntaxKind::DOC_GENERIC_DECL);
        self.doc_expect(SyntaxKind::DOC_NAME);
        if self.doc_eat(SyntaxKind::DOC_COLON) {
            self.parse_doc_type();
        }
        self.finish_node();
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_doc_type(&mut self) {
        self.doc_skip_ws();
        let checkpoint = self.checkpoint();
        self.parse_doc_postfix_type();
        if self.doc_peek() == SyntaxKind::DOC_PIPE {
            self.start_node_at(checkpoint, SyntaxKind::DOC_UNION_TYPE);
            while self.doc_eat(SyntaxKind::DOC_PIPE) {
                self.parse_doc_postfix_type();
            }
            self.finish_node();
        }
    }

    fn parse_doc_postfix_type(&mut self) {
        self.doc_skip_ws();
        let checkpoint = self.checkpoint();
        if !self.parse_doc_primary_type() {
            return;
        }

        // Postfix operators attach without whitespace: `T[]`, `T?`
        loop {
            let next = self.tokens.get(self.pos + 1).map(|t| t.kind);
            match self.current_kind() {
                SyntaxKind::DOC_L_BRACKET if next == Some(SyntaxKind::DOC_R_BRACKET) => {
                    self.start_node_at(checkpoint, SyntaxKind::DOC_ARRAY_TYPE);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::DOC_QUESTION => {
                    self.start_node_at(checkpoint, SyntaxKind::DOC_NULLABLE_TYPE);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_doc_primary_type(&mut self) -> bool {
        match self.current_kind() {
            SyntaxKind::DOC_NAME if self.current_text() == "fun" => self.parse_doc_func_type(),
            SyntaxKind::DOC_NAME => {
                let checkpoint = self.checkpoint();
                self.bump();
                if self.at(SyntaxKind::DOC_LT) {
                    self.start_node_at(checkpoint, SyntaxKind::DOC_GENERIC_TYPE);
                    self.bump();
                    self.parse_doc_type();
                    while self.doc_eat(SyntaxKind::DOC_COMMA) {
                        self.parse_doc_type();
                    }
                    self.doc_expect(SyntaxKind::DOC_GT);
                } else {
                    self.start_node_at(checkpoint, SyntaxKind::DOC_NAME_TYPE);
                }
                self.finish_node();
            }
            SyntaxKind::DOC_L_BRACE => self.parse_doc_table_type(),
            SyntaxKind::DOC_L_PAREN => {
                self.start_node(SyntaxKind::DOC_PAREN_TYPE);
                self.bump();
                self.parse_doc_type();
                self.doc_expect(SyntaxKind::DOC_R_PAREN);
                self.finish_node();
            }
            SyntaxKind::DOC_STRING | SyntaxKind::DOC_INTEGER => {
                self.start_node(SyntaxKind::DOC_LITERAL_TYPE);
                self.bump();
                self.finish_node();
            }
            _ => {
                self.error("expected type");
                return false;
            }
        }
        true
    }

    /// FunType = 'fun' ('(' (FuncParam (',' FuncParam)*)? ')')? (':' Type)?
    fn parse_doc_func_type(&mut self) {
        self.start_node(SyntaxKind::DOC_FUNC_TYPE);
        self.bump(); // fun
        if self.doc_eat(SyntaxKind::DOC_L_PAREN) {
            if self.doc_peek() != SyntaxKind::DOC_R_PAREN {
                loop {
                    self.parse_doc_func_param();
                    if !self.doc_eat(SyntaxKind::DOC_COMMA) {
                        break;
                    }
                }
            }
            self.doc_expect(SyntaxKind::DOC_R_PAREN);
        }
        if self.doc_eat(SyntaxKind::DOC_COLON) {
            self.parse_doc_type();
        }
        self.finish_node();
    }

    /// FuncParam = (Name | '...') '?'? (':' Type)?
    fn parse_doc_func_param(&mut self) {
        self.doc_skip_ws();
        self.start_node(SyntaxKind::DOC_FUNC_PARAM);
        if !self.doc_eat(SyntaxKind::DOC_DOTS) {
            self.doc_expect(SyntaxKind::DOC_NAME);
        }
        self.doc_eat(SyntaxKind::DOC_QUESTION);
        if self.doc_eat(SyntaxKind::DOC_COLON) {
            self.parse_doc_type();
        }
        self.finish_node();
    }

    /// TableType = '{' (TableField (',' TableField)*)? '}'
    fn parse_doc_table_type(&mut self) {
        self.start_node(SyntaxKind::DOC_TABLE_TYPE);
        self.bump(); // {
        if self.doc_peek() != SyntaxKind::DOC_R_BRACE {
            loop {
                self.parse_doc_table_field();
                if !self.doc_eat(SyntaxKind::DOC_COMMA) {
                    break;
                }
            }
        }
        self.doc_expect(SyntaxKind::DOC_R_BRACE);
        self.finish_node();
    }

    /// TableField = (Name | '[' Type ']') '?'? ':' Type
    fn parse_doc_table_field(&mut self) {
        self.doc_skip_ws();
        self.start_node(SyntaxKind::DOC_TABLE_FIELD);
        if self.doc_eat(SyntaxKind::DOC_L_BRACKET) {
            self.parse_doc_type();
            self.doc_expect(SyntaxKind::DOC_R_BRACKET);
        } else {
            self.doc_expect(SyntaxKind::DOC_NAME);
        }
        self.doc_eat(SyntaxKind::DOC_QUESTION);
        self.doc_expect(SyntaxKind::DOC_COLON);
        self.parse_doc_type();
        self.finish_node();
    }
}
