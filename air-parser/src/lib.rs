//! Recursive-descent parser for AIR documents.
//!
//! Turns AIR source text into the typed AST defined by `air-ast`. The
//! pipeline is lexer, token stream, then one parser per block kind.
//! Parsing is strict about block structure (an unknown top-level
//! `@keyword` is a hard error) but permissive about unrecognized
//! decorations inside recognized blocks: a document written against a
//! future dialect should still parse where it can.

mod blocks;
pub mod error;
pub mod lexer;
pub mod stream;
pub mod types;
pub mod ui;

use air_ast::{AirAst, TokenKind};

pub use crate::error::{ParseError, ParseErrorKind, Result, SourceParseError};
pub use crate::stream::TokenStream;

/// Parse a complete AIR document into an AST.
///
/// Fails on the first error, which carries the 1-based line and column
/// of the offending token. The same source text always produces the
/// same AST or the same error.
pub fn parse(source: &str) -> Result<AirAst> {
    let tokens = lexer::lex(source)?;
    let mut stream = TokenStream::new(tokens);

    stream.skip_newlines();
    if !stream.is(TokenKind::AtKeyword, Some("app")) {
        return Err(ParseError::missing_app(stream.current()));
    }
    stream.advance();
    stream.expect(TokenKind::Colon, None)?;
    let name = match stream.current().kind {
        TokenKind::Ident | TokenKind::TypeKeyword | TokenKind::Bool => stream.advance().value,
        _ => return Err(ParseError::expected("an application name", stream.current())),
    };

    let mut blocks = Vec::new();
    loop {
        stream.skip_newlines();
        if stream.is_eof() {
            break;
        }
        let keyword = stream.expect(TokenKind::AtKeyword, None)?;
        blocks.push(blocks::parse_block(&mut stream, &keyword)?);
    }

    Ok(AirAst::new(name, blocks))
}

/// Parse a named document, attaching the source text to any error for
/// pretty diagnostic rendering.
pub fn parse_named(source: &str, filename: &str) -> std::result::Result<AirAst, SourceParseError> {
    parse(source).map_err(|err| err.with_source(source, filename))
}

#[cfg(test)]
mod tests {
    use air_ast::{AirBlock, AIR_VERSION};

    use super::*;

    const TODO_APP: &str = "\
# simple todo application
@app:todo-app
@state{todos:[{title:str, done:bool(false)}], filter:enum(all|active|done)}
@ui(header > input:new_todo | add, todo-list(*todo_item), footer)
@api(crud:/todos > todos)
@db{ Todo{id:int:primary:auto, title:str:required, done:bool(false)} }
@persist(todos, local)
";

    #[test]
    fn test_parse_full_document() {
        let ast = parse(TODO_APP).unwrap();
        assert_eq!(ast.version, AIR_VERSION);
        assert_eq!(ast.app.name, "todo-app");
        assert_eq!(ast.app.blocks.len(), 5);
        let keywords: Vec<_> = ast.app.blocks.iter().map(|b| b.keyword()).collect();
        assert_eq!(keywords, vec!["state", "ui", "api", "db", "persist"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = parse(TODO_APP).unwrap();
        let b = parse(TODO_APP).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_missing_app_is_distinguished() {
        let err = parse("@state{x:int}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingApp);
        let err = parse("").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingApp);
    }

    #[test]
    fn test_leading_comments_and_blank_lines() {
        let ast = parse("# header\n\n# more\n@app:t\n@state{x:int}").unwrap();
        assert_eq!(ast.app.name, "t");
        assert_eq!(ast.app.blocks.len(), 1);
    }

    #[test]
    fn test_unknown_block_error_points_at_keyword() {
        let err = parse("@app:t\n@unknown(foo)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownBlock);
        assert_eq!((err.line, err.col), (2, 1));
        assert!(err.message.contains("@unknown"));
    }

    #[test]
    fn test_app_name_with_hyphens() {
        let ast = parse("@app:my-cool-app").unwrap();
        assert_eq!(ast.app.name, "my-cool-app");
    }

    #[test]
    fn test_blocks_in_any_order_and_repeated() {
        let ast = parse("@app:t\n@ui(a)\n@state{x:int}\n@ui(b)").unwrap();
        let ui_count = ast
            .app
            .blocks
            .iter()
            .filter(|b| matches!(b, AirBlock::Ui(_)))
            .count();
        assert_eq!(ui_count, 2);
    }

    #[test]
    fn test_error_is_first_failure() {
        // The bad route on line 3 is reported even though line 4 is
        // also malformed.
        let err = parse("@app:t\n@api(\nFETCH:/x > h\nGET /y > h\n)").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_parse_named_renders_source() {
        let err = parse_named("@app:t\n@unknown(x)", "app.air").unwrap_err();
        assert!(err.to_string().contains("@unknown"));
    }

    #[test]
    fn test_single_line_document() {
        let ast = parse("@app:mini@state{x:int}").unwrap();
        assert_eq!(ast.app.name, "mini");
        assert_eq!(ast.app.blocks.len(), 1);
    }
}
