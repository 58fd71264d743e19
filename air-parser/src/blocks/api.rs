//! `@api` route declarations.

use air_ast::{ApiBlock, ApiRoute, HttpMethod, TokenKind};

use crate::blocks::{capture_expr, open_block};
use crate::error::{ParseError, Result};
use crate::stream::TokenStream;
use crate::types::parse_field_list;

/// Parse an `@api` block: one `METHOD:/path[(params)] > handler` route
/// per line or comma-separated entry.
pub fn parse_api(stream: &mut TokenStream) -> Result<ApiBlock> {
    let closer = open_block(stream)?;
    let mut routes = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        routes.push(parse_route(stream, closer)?);
    }
    stream.expect(closer, None)?;
    Ok(ApiBlock { routes })
}

fn parse_route(stream: &mut TokenStream, closer: TokenKind) -> Result<ApiRoute> {
    let method_tok = stream.expect(TokenKind::Ident, None)?;
    let method = HttpMethod::parse(&method_tok.value).ok_or_else(|| {
        ParseError::invalid(
            format!("unknown HTTP method '{}'", method_tok.value),
            &method_tok,
        )
    })?;
    stream.expect(TokenKind::Colon, None)?;
    let path = parse_route_path(stream)?;

    let params = if stream.eat(TokenKind::OpenParen, None).is_some() {
        let params = parse_field_list(stream, TokenKind::CloseParen)?;
        stream.expect(TokenKind::CloseParen, None)?;
        params
    } else {
        Vec::new()
    };

    stream.expect(TokenKind::Op, Some(">"))?;
    let handler = capture_expr(stream, closer);
    if handler.is_empty() {
        return Err(ParseError::expected("a handler expression", stream.current()));
    }

    Ok(ApiRoute {
        method,
        path,
        params,
        handler,
    })
}

/// Assemble a route path from its token run. `:name` segments denote
/// path parameters and are kept verbatim.
pub(crate) fn parse_route_path(stream: &mut TokenStream) -> Result<String> {
    stream.expect(TokenKind::Slash, None)?;
    let mut path = String::from("/");
    loop {
        match stream.current().kind {
            TokenKind::Slash
            | TokenKind::Ident
            | TokenKind::TypeKeyword
            | TokenKind::Number
            | TokenKind::Dot => {
                path.push_str(&stream.advance().value);
            }
            TokenKind::Colon if stream.peek(1).kind == TokenKind::Ident => {
                stream.advance();
                path.push(':');
            }
            _ => break,
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn api(source: &str) -> ApiBlock {
        let mut stream = TokenStream::new(lex(source).unwrap());
        stream.advance(); // @api
        parse_api(&mut stream).unwrap()
    }

    #[test]
    fn test_simple_routes() {
        let block = api("@api(GET:/todos > db.todos.all, POST:/todos > db.todos.create)");
        assert_eq!(block.routes.len(), 2);
        assert_eq!(block.routes[0].method, HttpMethod::Get);
        assert_eq!(block.routes[0].path, "/todos");
        assert_eq!(block.routes[0].handler, "db.todos.all");
        assert_eq!(block.routes[1].method, HttpMethod::Post);
    }

    #[test]
    fn test_path_params() {
        let block = api("@api(DELETE:/todos/:id > db.todos.remove)");
        assert_eq!(block.routes[0].path, "/todos/:id");
        assert_eq!(block.routes[0].method, HttpMethod::Delete);
    }

    #[test]
    fn test_declared_params() {
        let block = api("@api(POST:/login(email:str, password:str) > auth.login)");
        let route = &block.routes[0];
        assert_eq!(route.params.len(), 2);
        assert_eq!(route.params[0].name, "email");
        assert_eq!(route.params[1].name, "password");
    }

    #[test]
    fn test_crud_shorthand_parses_as_method() {
        let block = api("@api(crud:/todos > todos)");
        assert_eq!(block.routes[0].method, HttpMethod::Crud);
    }

    #[test]
    fn test_handler_keeps_call_arguments() {
        let block = api("@api(GET:/report > stats.build(range, db.todos))");
        assert_eq!(block.routes[0].handler, "stats.build(range,db.todos)");
    }

    #[test]
    fn test_unknown_method_is_error() {
        let mut stream = TokenStream::new(lex("@api(FETCH:/x > h)").unwrap());
        stream.advance();
        let err = parse_api(&mut stream).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::InvalidSyntax);
        assert!(err.message.contains("FETCH"));
    }

    #[test]
    fn test_missing_handler_is_error() {
        let mut stream = TokenStream::new(lex("@api(GET:/todos >)").unwrap());
        stream.advance();
        assert!(parse_api(&mut stream).is_err());
    }

    #[test]
    fn test_newline_separated_routes() {
        let block = api("@api{\nGET:/a > h.a\nPOST:/b > h.b\n}");
        assert_eq!(block.routes.len(), 2);
    }
}
