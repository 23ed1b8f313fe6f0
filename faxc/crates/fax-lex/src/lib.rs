//! Lexical scanner for the source language.

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexError};
pub use token::{Token, TokenKind, KEYWORDS};
