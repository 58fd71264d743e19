//! One parser per top-level block kind.
//!
//! Each parser consumes the token span of its block and produces a
//! typed [`AirBlock`] variant. Structural violations raise a located
//! parse error; unknown-but-harmless trailing tokens inside a
//! recognized block are tolerated by design.

mod api;
mod db;
mod policy;
mod services;

use air_ast::{AirBlock, Hook, HookBlock, StateBlock, StyleBlock, Token, TokenKind, UiBlock};
use indexmap::IndexMap;

use crate::error::{ParseError, Result};
use crate::stream::TokenStream;
use crate::types::parse_field_list;
use crate::ui::parse_ui_nodes;

/// Dispatch on the `@keyword` token that introduced the block.
///
/// An unknown keyword at top level is a hard parse error pointing at
/// that token.
pub fn parse_block(stream: &mut TokenStream, keyword: &Token) -> Result<AirBlock> {
    match keyword.value.as_str() {
        "state" => parse_state(stream).map(AirBlock::State),
        "style" => parse_style(stream).map(AirBlock::Style),
        "ui" => parse_ui(stream).map(AirBlock::Ui),
        "api" => api::parse_api(stream).map(AirBlock::Api),
        "auth" => policy::parse_auth(stream).map(AirBlock::Auth),
        "nav" => policy::parse_nav(stream).map(AirBlock::Nav),
        "persist" => policy::parse_persist(stream).map(AirBlock::Persist),
        "hook" => parse_hook(stream).map(AirBlock::Hook),
        "db" => db::parse_db(stream).map(AirBlock::Db),
        "cron" => services::parse_cron(stream).map(AirBlock::Cron),
        "webhook" => services::parse_webhook(stream).map(AirBlock::Webhook),
        "queue" => services::parse_queue(stream).map(AirBlock::Queue),
        "email" => services::parse_email(stream).map(AirBlock::Email),
        "env" => services::parse_env(stream).map(AirBlock::Env),
        "handler" => services::parse_handler(stream).map(AirBlock::Handler),
        "deploy" => services::parse_deploy(stream).map(AirBlock::Deploy),
        _ => Err(ParseError::unknown_block(keyword)),
    }
}

/// Consume the block opener and return the matching closer. Both
/// `@block(...)` and `@block{...}` forms are accepted everywhere.
pub(crate) fn open_block(stream: &mut TokenStream) -> Result<TokenKind> {
    if stream.eat(TokenKind::OpenParen, None).is_some() {
        Ok(TokenKind::CloseParen)
    } else if stream.eat(TokenKind::OpenBrace, None).is_some() {
        Ok(TokenKind::CloseBrace)
    } else {
        Err(ParseError::expected("'(' or '{'", stream.current()))
    }
}

/// Token text as it contributes to a raw capture (the lexer strips the
/// `@` sigil from at-keywords; restore it here).
pub(crate) fn raw_text(tok: &Token) -> String {
    match tok.kind {
        TokenKind::AtKeyword => format!("@{}", tok.value),
        TokenKind::Str => format!("\"{}\"", tok.value),
        _ => tok.value.clone(),
    }
}

/// Capture a handler expression verbatim: everything up to the next
/// newline, top-level comma, or unmatched closing delimiter.
/// Parenthesis depth is tracked so embedded calls are preserved.
pub(crate) fn capture_expr(stream: &mut TokenStream, closer: TokenKind) -> String {
    let mut depth = 0usize;
    let mut out = String::new();
    loop {
        let tok = stream.current();
        match tok.kind {
            TokenKind::Newline | TokenKind::Eof => break,
            TokenKind::Comma if depth == 0 => break,
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen if depth == 0 => break,
            TokenKind::CloseParen => depth -= 1,
            kind if kind == closer && depth == 0 => break,
            _ => {}
        }
        let tok = stream.advance();
        out.push_str(&raw_text(&tok));
    }
    out
}

/// Capture one raw argument: token text up to the next separator or
/// the block closer.
pub(crate) fn capture_arg(stream: &mut TokenStream, closer: TokenKind) -> String {
    let mut out = String::new();
    while !stream.is(TokenKind::Comma, None)
        && !stream.is(TokenKind::Newline, None)
        && !stream.is(closer, None)
        && !stream.is_eof()
    {
        let tok = stream.advance();
        out.push_str(&raw_text(&tok));
    }
    out
}

fn parse_state(stream: &mut TokenStream) -> Result<StateBlock> {
    let closer = open_block(stream)?;
    let fields = parse_field_list(stream, closer)?;
    stream.expect(closer, None)?;
    Ok(StateBlock { fields })
}

fn parse_style(stream: &mut TokenStream) -> Result<StyleBlock> {
    let closer = open_block(stream)?;
    let mut properties = IndexMap::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let name = if stream.is(TokenKind::Ident, None) || stream.is(TokenKind::TypeKeyword, None)
        {
            stream.advance()
        } else {
            return Err(ParseError::expected("a style property name", stream.current()));
        };
        stream.expect(TokenKind::Colon, None)?;
        let value = capture_arg(stream, closer);
        properties.insert(name.value, value);
    }
    stream.expect(closer, None)?;
    Ok(StyleBlock { properties })
}

fn parse_ui(stream: &mut TokenStream) -> Result<UiBlock> {
    let closer = open_block(stream)?;
    let nodes = parse_ui_nodes(stream, closer)?;
    stream.expect(closer, None)?;
    Ok(UiBlock { nodes })
}

fn parse_hook(stream: &mut TokenStream) -> Result<HookBlock> {
    let closer = open_block(stream)?;
    let mut hooks = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let event = stream.expect(TokenKind::Ident, None)?;
        stream.expect(TokenKind::Op, Some(">"))?;
        let action = capture_expr(stream, closer);
        hooks.push(Hook {
            event: event.value,
            action,
        });
    }
    stream.expect(closer, None)?;
    Ok(HookBlock { hooks })
}
