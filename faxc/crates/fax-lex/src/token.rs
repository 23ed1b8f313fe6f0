//! Token data model.

use fax_util::span::Span;

/// The class a token belongs to.
///
/// `Keyword` is reclassified from `Identifier` at scan time (see [`KEYWORDS`]) rather than being
/// recognized by its own pattern — the source text `if` and `if_condition` both start out matching
/// the identifier pattern, and only a keyword-table lookup afterward tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    Float,
    String,
    Char,
    Keyword,
    Identifier,
    Operator,
    Delimiter,
}

/// One lexical token: its class, its exact source text, and where it came from.
///
/// `lexeme` has quote characters already stripped for `String`/`Char` tokens (§4.1 rule 2/3); it
/// is the literal spelling for every other kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn span(&self, len: usize) -> Span {
        Span::new(0, len, self.line, self.column)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == text
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == text
    }

    pub fn is_delimiter(&self, text: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.lexeme == text
    }
}

/// The source language's reserved words. Anything matching the identifier pattern that also
/// appears here is reclassified from `Identifier` to `Keyword`.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "return", "function", "int", "float", "bool", "string", "void",
    "true", "false", "print",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}
