//! Logos-based lexer for Lua
//!
//! Fast tokenization using the logos crate. Comment lines starting with
//! `---@` are split again by a second logos tokenizer so the annotation
//! dialect reaches the parser as ordinary tokens.

use std::collections::VecDeque;

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizers
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
    pending: VecDeque<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
            pending: VecDeque::new(),
        }
    }

    fn split_doc_line(&mut self, text: &'a str, offset: TextSize) {
        let (start, rest) = text.split_at(DOC_PREFIX.len());
        self.pending.push_back(Token {
            kind: SyntaxKind::DOC_START,
            text: start,
            offset,
        });

        let mut doc = DocToken::lexer(rest);
        let mut doc_offset = offset + TextSize::of(start);
        while let Some(token) = doc.next() {
            let kind = match token {
                Ok(t) => t.into(),
                Err(()) => {
                    // Anything we cannot tokenize is description text up to the line end.
                    doc.bump(doc.remainder().len());
                    SyntaxKind::DOC_DESCRIPTION
                }
            };
            let text = doc.slice();
            self.pending.push_back(Token {
                kind,
                text,
                offset: doc_offset,
            });
            doc_offset += TextSize::of(text);
        }
    }
}

const DOC_PREFIX: &str = "---@";

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(LogosToken::Comment) if text.starts_with(DOC_PREFIX) => {
                self.split_doc_line(text, offset);
                return self.pending.pop_front();
            }
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

// =============================================================================
// Long brackets: `[[ ]]`, `[==[ ]==]` for strings and `--[[ ]]` comments
// =============================================================================

/// Level of a long bracket opening at the start of `s` (`[[` is level 0).
fn long_bracket_level(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let level = bytes[1..].iter().take_while(|&&b| b == b'=').count();
    (bytes.get(1 + level) == Some(&b'[')).then_some(level)
}

/// Length up to and including the closing bracket of the given level.
fn long_bracket_close(s: &str, level: usize) -> Option<usize> {
    let close = format!("]{}]", "=".repeat(level));
    s.find(&close).map(|idx| idx + close.len())
}

fn lex_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let rest = lex.remainder();
    if let Some(level) = long_bracket_level(rest) {
        let open = level + 2;
        let len = long_bracket_close(&rest[open..], level)
            .map(|end| open + end)
            .unwrap_or(rest.len());
        lex.bump(len);
        return true;
    }
    let line_len = rest.find('\n').unwrap_or(rest.len());
    lex.bump(line_len);
    true
}

fn lex_long_string(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let level = lex.slice().len() - 2;
    match long_bracket_close(lex.remainder(), level) {
        Some(end) => {
            lex.bump(end);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("--", lex_comment)]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+(\.[0-9a-fA-F]*)?([pP][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\(.|\n))*""#)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#)]
    #[regex(r"\[=*\[", lex_long_string)]
    String,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("and")]
    AndKw,
    #[token("break")]
    BreakKw,
    #[token("do")]
    DoKw,
    #[token("else")]
    ElseKw,
    #[token("elseif")]
    ElseifKw,
    #[token("end")]
    EndKw,
    #[token("false")]
    FalseKw,
    #[token("for")]
    ForKw,
    #[token("function")]
    FunctionKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("in")]
    InKw,
    #[token("local")]
    LocalKw,
    #[token("nil")]
    NilKw,
    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,
    #[token("repeat")]
    RepeatKw,
    #[token("return")]
    ReturnKw,
    #[token("then")]
    ThenKw,
    #[token("true")]
    TrueKw,
    #[token("until")]
    UntilKw,
    #[token("while")]
    WhileKw,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    DotDotDot,
    #[token("..")]
    DotDot,
    #[token("::")]
    ColonColon,
    #[token("//")]
    SlashSlash,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("==")]
    EqEq,
    #[token("~=")]
    TildeEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,
            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,
            AndKw => SyntaxKind::AND_KW,
            BreakKw => SyntaxKind::BREAK_KW,
            DoKw => SyntaxKind::DO_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            ElseifKw => SyntaxKind::ELSEIF_KW,
            EndKw => SyntaxKind::END_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            ForKw => SyntaxKind::FOR_KW,
            FunctionKw => SyntaxKind::FUNCTION_KW,
            GotoKw => SyntaxKind::GOTO_KW,
            IfKw => SyntaxKind::IF_KW,
            InKw => SyntaxKind::IN_KW,
            LocalKw => SyntaxKind::LOCAL_KW,
            NilKw => SyntaxKind::NIL_KW,
            NotKw => SyntaxKind::NOT_KW,
            OrKw => SyntaxKind::OR_KW,
            RepeatKw => SyntaxKind::REPEAT_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            ThenKw => SyntaxKind::THEN_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            UntilKw => SyntaxKind::UNTIL_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            DotDotDot => SyntaxKind::DOT_DOT_DOT,
            DotDot => SyntaxKind::DOT_DOT,
            ColonColon => SyntaxKind::COLON_COLON,
            SlashSlash => SyntaxKind::SLASH_SLASH,
            LtLt => SyntaxKind::LT_LT,
            GtGt => SyntaxKind::GT_GT,
            EqEq => SyntaxKind::EQ_EQ,
            TildeEq => SyntaxKind::TILDE_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Caret => SyntaxKind::CARET,
            Hash => SyntaxKind::HASH,
            Amp => SyntaxKind::AMP,
            Tilde => SyntaxKind::TILDE,
            Pipe => SyntaxKind::PIPE,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Eq => SyntaxKind::EQ,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
        }
    }
}

fn lex_doc_description(lex: &mut logos::Lexer<DocToken>) {
    lex.bump(lex.remainder().len());
}

/// Tokens of a `---@` annotation line (the part after the prefix)
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum DocToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.]*")]
    Name,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r#""[^"\n]*""#)]
    #[regex(r#"'[^'\n]*'"#)]
    String,

    #[token("|")]
    Pipe,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("?")]
    Question,
    #[token("...")]
    Dots,

    #[token("@", lex_doc_description)]
    #[token("#", lex_doc_description)]
    Description,
}

impl From<DocToken> for SyntaxKind {
    fn from(token: DocToken) -> Self {
        match token {
            DocToken::Whitespace => SyntaxKind::DOC_WHITESPACE,
            DocToken::Name => SyntaxKind::DOC_NAME,
            DocToken::Integer => SyntaxKind::DOC_INTEGER,
            DocToken::String => SyntaxKind::DOC_STRING,
            DocToken::Pipe => SyntaxKind::DOC_PIPE,
            DocToken::Lt => SyntaxKind::DOC_LT,
            DocToken::Gt => SyntaxKind::DOC_GT,
            DocToken::Comma => SyntaxKind::DOC_COMMA,
            DocToken::Colon => SyntaxKind::DOC_COLON,
            DocToken::LBracket => SyntaxKind::DOC_L_BRACKET,
            DocToken::RBracket => SyntaxKind::DOC_R_BRACKET,
            DocToken::LParen => SyntaxKind::DOC_L_PAREN,
            DocToken::RParen => SyntaxKind::DOC_R_PAREN,
            DocToken::LBrace => SyntaxKind::DOC_L_BRACE,
            DocToken::RBrace => SyntaxKind::DOC_R_BRACE,
            DocToken::Question => SyntaxKind::DOC_QUESTION,
            DocToken::Dots => SyntaxKind::DOC_DOTS,
            DocToken::Description => SyntaxKind::DOC_DESCRIPTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_local_statement() {
        let tokens: Vec<_> = Lexer::new("local x = 1").collect();
        assert_eq!(tokens.len(), 7); // local, ws, x, ws, =, ws, 1
        assert_eq!(tokens[0].kind, SyntaxKind::LOCAL_KW);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[4].kind, SyntaxKind::EQ);
        assert_eq!(tokens[6].kind, SyntaxKind::NUMBER);
    }

    #[test]
    fn test_lex_offsets_are_contiguous() {
        let input = "a.b:c(\"s\")";
        let mut expected = TextSize::new(0);
        for token in Lexer::new(input) {
            assert_eq!(token.offset, expected);
            expected += TextSize::of(token.text);
        }
        assert_eq!(expected, TextSize::of(input));
    }

    #[test]
    fn test_lex_line_and_long_comments() {
        assert_eq!(
            kinds("-- hi\nx"),
            vec![SyntaxKind::COMMENT, SyntaxKind::WHITESPACE, SyntaxKind::IDENT]
        );
        let tokens = tokenize("--[==[ a ]] b ]==]x");
        assert_eq!(tokens[0].kind, SyntaxKind::COMMENT);
        assert_eq!(tokens[0].text, "--[==[ a ]] b ]==]");
        assert_eq!(tokens[1].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_lex_long_string_and_numbers() {
        let tokens = tokenize("[[a]b]] 0x1F 3.5e2 .5");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], SyntaxKind::STRING);
        assert_eq!(tokens[0].text, "[[a]b]]");
        assert_eq!(kinds[2], SyntaxKind::NUMBER);
        assert_eq!(kinds[4], SyntaxKind::NUMBER);
        assert_eq!(kinds[6], SyntaxKind::NUMBER);
    }

    #[test]
    fn test_lex_multi_char_punct() {
        assert_eq!(
            kinds("...~=..::"),
            vec![
                SyntaxKind::DOT_DOT_DOT,
                SyntaxKind::TILDE_EQ,
                SyntaxKind::DOT_DOT,
                SyntaxKind::COLON_COLON
            ]
        );
    }

    #[test]
    fn test_lex_doc_line_is_split() {
        let tokens = tokenize("---@class Foo: Bar\nlocal");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::DOC_START,
                SyntaxKind::DOC_NAME,
                SyntaxKind::DOC_WHITESPACE,
                SyntaxKind::DOC_NAME,
                SyntaxKind::DOC_COLON,
                SyntaxKind::DOC_WHITESPACE,
                SyntaxKind::DOC_NAME,
                SyntaxKind::WHITESPACE,
                SyntaxKind::LOCAL_KW,
            ]
        );
        assert_eq!(tokens[3].text, "Foo");
        assert_eq!(tokens[3].offset, TextSize::new(10));
    }

    #[test]
    fn test_lex_plain_triple_dash_is_comment() {
        assert_eq!(kinds("--- just words"), vec![SyntaxKind::COMMENT]);
    }

    #[test]
    fn test_lex_doc_description_swallows_rest() {
        let tokens = tokenize("---@field a number @the a field");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, SyntaxKind::DOC_DESCRIPTION);
        assert_eq!(last.text, "@the a field");
    }
}
