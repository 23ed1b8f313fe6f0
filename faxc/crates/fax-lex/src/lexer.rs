//! Lexical scanner.
//!
//! Turns source text into a flat token stream plus a list of lex errors. Scanning never aborts: an
//! unrecognized character produces one error and the cursor advances past it, so one bad byte
//! doesn't hide every diagnostic after it.

use crate::token::{is_keyword, Token, TokenKind};
use fax_util::span::Span;

const OPERATOR_CHARS: &str = "+-*/=<>!&|";
const DELIMITER_CHARS: &str = "(){}[];,.:";

/// A scan-time error: an unrecognized character or an unterminated quoted literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl LexError {
    fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        LexError {
            message: message.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
    }
}

/// Scans `source` into tokens, following the precedence-ordered token classes of the scanner
/// contract: number, string, char, whitespace, comment, identifier/keyword, operator, delimiter.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while let Some(c) = self.peek() {
            let (line, column) = self.position();
            if c.is_ascii_digit() {
                self.scan_number(line, column);
            } else if c == '"' {
                self.scan_quoted(line, column, '"', TokenKind::String);
            } else if c == '\'' {
                self.scan_quoted(line, column, '\'', TokenKind::Char);
            } else if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else if c == '\n' {
                self.advance_newline();
            } else if c == '/' && self.peek_at(1) == Some('/') {
                self.scan_line_comment();
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.scan_block_comment(line, column);
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.scan_identifier(line, column);
            } else if OPERATOR_CHARS.contains(c) {
                self.scan_operator(line, column);
            } else if DELIMITER_CHARS.contains(c) {
                self.advance();
                self.tokens
                    .push(Token::new(TokenKind::Delimiter, c.to_string(), line, column));
            } else {
                self.errors.push(LexError::new(
                    format!("unexpected character '{}'", c),
                    line,
                    column,
                ));
                self.advance();
            }
        }
        (self.tokens, self.errors)
    }

    fn position(&self) -> (u32, u32) {
        (self.line, (self.pos - self.line_start + 1) as u32)
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.bytes.get(self.pos + offset).map(|&b| b as char)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn advance_newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.line_start = self.pos;
    }

    fn scan_number(&mut self, line: u32, column: u32) {
        let start = self.pos;
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_float = true;
            self.advance();
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.advance();
            }
        }
        let lexeme = self.slice(start, self.pos);
        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    /// Scans a `quote`-delimited literal. A closed literal becomes one token; an unterminated one
    /// (hits a newline or end-of-input before the closing quote) never becomes a token at all — it
    /// is reported as a single `unexpected character` error for the opening quote, and scanning
    /// resumes from the character right after that quote, so the literal's would-be body still
    /// gets tokenized on its own terms rather than being swallowed.
    fn scan_quoted(&mut self, line: u32, column: u32, quote: char, kind: TokenKind) {
        self.advance(); // opening quote
        let start = self.pos;
        let mut cursor = start;
        loop {
            match self.bytes.get(cursor).map(|&b| b as char) {
                None => {
                    self.errors.push(LexError::new(
                        format!("unexpected character '{}'", quote),
                        line,
                        column,
                    ));
                    self.pos = start;
                    return;
                }
                Some(c) if c == quote => {
                    let lexeme = self.slice(start, cursor);
                    self.pos = cursor + 1;
                    self.tokens.push(Token::new(kind, lexeme, line, column));
                    return;
                }
                Some('\n') => {
                    self.errors.push(LexError::new(
                        format!("unexpected character '{}'", quote),
                        line,
                        column,
                    ));
                    self.pos = start;
                    return;
                }
                Some('\\') => cursor += 2,
                Some(_) => cursor += 1,
            }
        }
    }

    fn scan_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn scan_block_comment(&mut self, line: u32, column: u32) {
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    self.errors.push(LexError::new(
                        "unterminated block comment",
                        line,
                        column,
                    ));
                    return;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some('\n') => self.advance_newline(),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_identifier(&mut self, line: u32, column: u32) {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_alphanumeric() || c == '_')
            .unwrap_or(false)
        {
            self.advance();
        }
        let lexeme = self.slice(start, self.pos);
        let kind = if is_keyword(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    fn scan_operator(&mut self, line: u32, column: u32) {
        let start = self.pos;
        while self
            .peek()
            .map(|c| OPERATOR_CHARS.contains(c))
            .unwrap_or(false)
        {
            self.advance();
        }
        let lexeme = self.slice(start, self.pos);
        self.tokens
            .push(Token::new(TokenKind::Operator, lexeme, line, column));
    }

    fn slice(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.bytes[start..end]).into_owned()
    }
}

pub use Span as TokenSpan;
