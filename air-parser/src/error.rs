//! Parse error types.

use air_ast::Token;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Category of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed raw token (unterminated string, stray character).
    Lexical,
    /// A specific token was expected and something else was found.
    UnexpectedToken,
    /// Input ended while a construct was incomplete.
    UnexpectedEof,
    /// Tokens are present but violate the grammar structurally.
    InvalidSyntax,
    /// The document does not begin with `@app:name`.
    MissingApp,
    /// Unrecognized `@keyword` at top level.
    UnknownBlock,
    /// UI nesting exceeded the resource bound.
    MaxDepth,
}

/// A parse error with source location.
///
/// Both lexical and structural failures surface through this type; the
/// whole `parse()` call fails on the first one. `line`/`col` are 1-based
/// and point at the offending token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {line}:{col}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: u32,
    pub col: u32,
    pub offset: u32,
    /// Text of the offending token, when there is one.
    pub token: Option<String>,
}

impl ParseError {
    fn at(kind: ParseErrorKind, message: String, line: u32, col: u32, offset: u32) -> Self {
        Self {
            kind,
            message,
            line,
            col,
            offset,
            token: None,
        }
    }

    /// Lexical error at an absolute position.
    pub fn lexical(message: impl Into<String>, line: u32, col: u32, offset: u32) -> Self {
        Self::at(ParseErrorKind::Lexical, message.into(), line, col, offset)
    }

    /// A specific token was expected; `found` is the token actually seen.
    pub fn expected(what: &str, found: &Token) -> Self {
        let kind = if found.kind == air_ast::TokenKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        };
        let message = if found.value.is_empty() {
            format!("expected {what}, found end of input")
        } else {
            format!("expected {what}, found '{}'", found.value)
        };
        Self {
            kind,
            message,
            line: found.line,
            col: found.col,
            offset: found.offset,
            token: Some(found.value.clone()),
        }
    }

    /// An out-of-place token in the given context.
    pub fn unexpected(found: &Token, context: &str) -> Self {
        let kind = if found.kind == air_ast::TokenKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        };
        let message = if found.value.is_empty() {
            format!("unexpected end of input {context}")
        } else {
            format!("unexpected '{}' {context}", found.value)
        };
        Self {
            kind,
            message,
            line: found.line,
            col: found.col,
            offset: found.offset,
            token: Some(found.value.clone()),
        }
    }

    /// Structural grammar violation at a token.
    pub fn invalid(message: impl Into<String>, at: &Token) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            message: message.into(),
            line: at.line,
            col: at.col,
            offset: at.offset,
            token: Some(at.value.clone()),
        }
    }

    /// The distinguished "missing `@app`" failure, raised before any
    /// block parsing begins.
    pub fn missing_app(at: &Token) -> Self {
        Self {
            kind: ParseErrorKind::MissingApp,
            message: "document must begin with '@app:name'".to_string(),
            line: at.line,
            col: at.col,
            offset: at.offset,
            token: Some(at.value.clone()),
        }
    }

    /// Unknown `@keyword` at top level.
    pub fn unknown_block(at: &Token) -> Self {
        Self {
            kind: ParseErrorKind::UnknownBlock,
            message: format!("unknown block '@{}'", at.value),
            line: at.line,
            col: at.col,
            offset: at.offset,
            token: Some(at.value.clone()),
        }
    }

    /// UI nesting bound exceeded.
    pub fn max_depth(at: &Token) -> Self {
        Self {
            kind: ParseErrorKind::MaxDepth,
            message: "max nesting depth exceeded".to_string(),
            line: at.line,
            col: at.col,
            offset: at.offset,
            token: Some(at.value.clone()),
        }
    }

    /// Attach the source text for pretty diagnostic rendering.
    pub fn with_source(self, source: impl Into<String>, filename: impl Into<String>) -> SourceParseError {
        let len = self.token.as_ref().map_or(1, |t| t.len().max(1));
        let filename: String = filename.into();
        SourceParseError {
            src: NamedSource::new(filename, source.into()),
            span: SourceSpan::new((self.offset as usize).into(), len),
            message: self.message,
        }
    }
}

/// A [`ParseError`] paired with its source document, rendered by miette
/// with a labeled span.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(air::parse_error))]
pub struct SourceParseError {
    #[source_code]
    src: NamedSource<String>,
    #[label("{message}")]
    span: SourceSpan,
    message: String,
}
