//! Cross-cutting policy blocks: `@auth`, `@nav`, and `@persist`.

use air_ast::{AuthBlock, NavBlock, NavRoute, PersistBlock, TokenKind};

use crate::blocks::{capture_arg, open_block};
use crate::error::{ParseError, Result};
use crate::stream::TokenStream;

/// Storage flags that are never persisted keys.
const PERSIST_FLAGS: &[&str] = &["local", "session", "sync", "encrypted"];

/// Parse an `@auth` block. Entries are `required`, `role:NAME`,
/// `role:enum(a,b,c)`, and `redirect:/path`; anything else is skipped.
pub fn parse_auth(stream: &mut TokenStream) -> Result<AuthBlock> {
    let closer = open_block(stream)?;
    let mut auth = AuthBlock::default();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let entry = stream.current().clone();
        match entry.value.as_str() {
            "required" if entry.kind == TokenKind::Ident => {
                stream.advance();
                auth.required = true;
            }
            "role" | "roles" if entry.kind == TokenKind::Ident => {
                stream.advance();
                stream.expect(TokenKind::Colon, None)?;
                parse_roles(stream, &mut auth.roles)?;
            }
            "redirect" if entry.kind == TokenKind::Ident => {
                stream.advance();
                stream.expect(TokenKind::Colon, None)?;
                auth.redirect = Some(parse_nav_path(stream)?);
            }
            _ => {
                stream.advance();
            }
        }
    }
    stream.expect(closer, None)?;
    Ok(auth)
}

fn parse_roles(stream: &mut TokenStream, roles: &mut Vec<String>) -> Result<()> {
    if stream.eat(TokenKind::TypeKeyword, Some("enum")).is_some() {
        stream.expect(TokenKind::OpenParen, None)?;
        loop {
            stream.skip_separators();
            if stream.is(TokenKind::CloseParen, None) {
                break;
            }
            roles.push(stream.expect(TokenKind::Ident, None)?.value);
        }
        stream.expect(TokenKind::CloseParen, None)?;
    } else {
        roles.push(stream.expect(TokenKind::Ident, None)?.value);
    }
    Ok(())
}

/// Parse a `@nav` block. A route is either a bare path (`/`, `/#hero`,
/// `/settings`) or a conditional redirect `path>?cond>target[:fallback]`.
pub fn parse_nav(stream: &mut TokenStream) -> Result<NavBlock> {
    let closer = open_block(stream)?;
    let mut routes = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let path = parse_nav_path(stream)?;
        if stream.eat(TokenKind::Op, Some(">")).is_none() {
            routes.push(NavRoute::bare(path));
            continue;
        }
        stream.expect(TokenKind::Op, Some("?"))?;
        let condition = stream.expect(TokenKind::Ident, None)?.value;
        stream.expect(TokenKind::Op, Some(">"))?;
        let target = stream.expect(TokenKind::Ident, None)?.value;
        let fallback = if stream.eat(TokenKind::Colon, None).is_some() {
            Some(stream.expect(TokenKind::Ident, None)?.value)
        } else {
            None
        };
        routes.push(NavRoute {
            path,
            condition: Some(condition),
            target: Some(target),
            fallback,
        });
    }
    stream.expect(closer, None)?;
    Ok(NavBlock { routes })
}

/// Assemble a navigation path: `/`, `/#anchor`, `/a/b`, `/page-name`.
pub(crate) fn parse_nav_path(stream: &mut TokenStream) -> Result<String> {
    stream.expect(TokenKind::Slash, None)?;
    let mut path = String::from("/");
    loop {
        match stream.current().kind {
            TokenKind::Slash
            | TokenKind::Hash
            | TokenKind::Ident
            | TokenKind::TypeKeyword
            | TokenKind::Number
            | TokenKind::Dot => {
                path.push_str(&stream.advance().value);
            }
            _ => break,
        }
    }
    Ok(path)
}

/// Parse a `@persist` block. Arguments are collected raw and then
/// classified: storage flags and durations (`7d`, `30m`) become
/// options, everything else is a persisted state key.
pub fn parse_persist(stream: &mut TokenStream) -> Result<PersistBlock> {
    let closer = open_block(stream)?;
    let mut args = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let arg = capture_arg(stream, closer);
        if arg.is_empty() {
            return Err(ParseError::expected("a persist entry", stream.current()));
        }
        args.push(arg);
    }
    stream.expect(closer, None)?;

    let mut block = PersistBlock {
        keys: Vec::new(),
        options: Vec::new(),
    };
    for arg in args {
        if PERSIST_FLAGS.contains(&arg.as_str()) || is_duration(&arg) {
            block.options.push(arg);
        } else {
            block.keys.push(arg);
        }
    }
    Ok(block)
}

/// Duration shape: one or more digits followed by a d/h/m/s unit.
fn is_duration(s: &str) -> bool {
    let Some(unit) = s.chars().last() else {
        return false;
    };
    if !matches!(unit, 'd' | 'h' | 'm' | 's') {
        return false;
    }
    let digits = &s[..s.len() - 1];
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
