//! Token stream with lookahead and backtracking.

use air_ast::{Token, TokenKind};

use crate::error::{ParseError, Result};

/// Cursor over a pre-lexed token sequence.
///
/// Reading past the final token repeatedly yields the EOF token, so
/// every parser can use `!is_eof()` as a uniform loop guard without
/// special-casing stream exhaustion. `save()`/`restore()` snapshots the
/// cursor position for speculative parsing; snapshots never cross block
/// boundaries.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
}

impl TokenStream {
    /// Build a stream from lexer output.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(tok) if tok.kind == TokenKind::Eof => tok.clone(),
            Some(tok) => {
                let eof = Token::eof(tok.line, tok.col + tok.value.len() as u32, tok.offset);
                tokens.push(eof.clone());
                eof
            }
            None => {
                let eof = Token::eof(1, 1, 0);
                tokens.push(eof.clone());
                eof
            }
        };
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Look ahead without consuming. `peek(0)` is the current token.
    pub fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof)
    }

    /// The current token.
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Consume and return the current token. At EOF this keeps returning
    /// the EOF token without advancing further.
    pub fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check the current token without consuming.
    pub fn is(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.current().matches(kind, value)
    }

    /// Probe-and-consume: advance past the current token when it
    /// matches, otherwise leave the stream untouched.
    pub fn eat(&mut self, kind: TokenKind, value: Option<&str>) -> Option<Token> {
        if self.is(kind, value) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume the current token, failing with a located parse error
    /// when it does not match.
    pub fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> Result<Token> {
        if self.is(kind, value) {
            Ok(self.advance())
        } else {
            let what = match value {
                Some(v) => format!("'{v}'"),
                None => format!("{kind:?}").to_lowercase(),
            };
            Err(ParseError::expected(&what, self.current()))
        }
    }

    pub fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Skip any run of newline tokens.
    pub fn skip_newlines(&mut self) {
        while self.is(TokenKind::Newline, None) {
            self.advance();
        }
    }

    /// Skip sibling separators: newlines and commas are equivalent at
    /// every list level.
    pub fn skip_separators(&mut self) {
        while self.is(TokenKind::Newline, None) || self.is(TokenKind::Comma, None) {
            self.advance();
        }
    }

    /// Snapshot the cursor for speculative parsing.
    pub fn save(&self) -> usize {
        self.pos
    }

    /// Rewind to a snapshot taken with [`save`](Self::save).
    pub fn restore(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len());
        self.pos = pos;
    }
}
