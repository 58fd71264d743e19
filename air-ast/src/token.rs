//! Lexical tokens.

use serde::{Deserialize, Serialize};

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Identifier (may contain `-` and `_` after the first character).
    Ident,
    /// Type keyword (`str`, `int`, `float`, `bool`, `date`, `datetime`,
    /// `enum`, `list`, `map`, `any`).
    TypeKeyword,
    /// Double-quoted string literal (value is the unescaped content).
    Str,
    /// Integer or decimal number literal.
    Number,
    /// `true` or `false`.
    Bool,
    /// Block introducer (`@app`, `@state`, ...; value is the keyword
    /// without the `@`).
    AtKeyword,
    /// Symbolic operator: one of `> | + ? * ! ~ ^ $`.
    Op,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    Hash,
    Dot,
    Slash,
    Newline,
    Eof,
}

/// A single lexical token with its source location.
///
/// Tokens are immutable and produced once per source document. `line` and
/// `col` are 1-based; `offset` is the byte offset into the source, kept
/// for diagnostic span construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
    pub col: u32,
    pub offset: u32,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: u32, col: u32, offset: u32) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            col,
            offset,
        }
    }

    /// The EOF sentinel. Reading past the end of a token stream yields
    /// this token repeatedly.
    pub fn eof(line: u32, col: u32, offset: u32) -> Self {
        Self::new(TokenKind::Eof, "", line, col, offset)
    }

    /// Check kind, and value when `value` is given.
    pub fn matches(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.kind == kind && value.is_none_or(|v| self.value == v)
    }

    /// True for the symbolic operator `op`.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.value == op
    }
}
