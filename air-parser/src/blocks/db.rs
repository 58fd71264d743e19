//! `@db` models, relations, and indexes.

use air_ast::{DbBlock, DbIndex, DbModel, DbRelation, TokenKind};

use crate::blocks::open_block;
use crate::error::{ParseError, Result};
use crate::stream::TokenStream;
use crate::types::parse_db_field_list;

/// Parse a `@db` block: model definitions plus `@relation` and
/// `@index` annotations, which are only meaningful here.
pub fn parse_db(stream: &mut TokenStream) -> Result<DbBlock> {
    let closer = open_block(stream)?;
    let mut block = DbBlock::default();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        if stream.is(TokenKind::AtKeyword, None) {
            let keyword = stream.advance();
            match keyword.value.as_str() {
                "relation" => block.relations.push(parse_relation(stream)?),
                "index" => block.indexes.push(parse_index(stream)?),
                // Unrecognized annotations are skipped with their payload.
                _ => skip_annotation(stream),
            }
        } else {
            block.models.push(parse_model(stream)?);
        }
    }
    stream.expect(closer, None)?;
    Ok(block)
}

fn parse_model(stream: &mut TokenStream) -> Result<DbModel> {
    let name = stream.expect(TokenKind::Ident, None)?;
    stream.expect(TokenKind::OpenBrace, None)?;
    let fields = parse_db_field_list(stream, TokenKind::CloseBrace)?;
    stream.expect(TokenKind::CloseBrace, None)?;

    if fields.iter().filter(|f| f.primary).count() > 1 {
        return Err(ParseError::invalid(
            format!("model '{}' declares more than one primary key", name.value),
            &name,
        ));
    }
    Ok(DbModel {
        name: name.value,
        fields,
    })
}

/// `@relation(From.field > To[.field][:on_delete])`
fn parse_relation(stream: &mut TokenStream) -> Result<DbRelation> {
    stream.expect(TokenKind::OpenParen, None)?;
    let from_model = stream.expect(TokenKind::Ident, None)?.value;
    stream.expect(TokenKind::Dot, None)?;
    let from_field = stream.expect(TokenKind::Ident, None)?.value;
    stream.expect(TokenKind::Op, Some(">"))?;
    let to_model = stream.expect(TokenKind::Ident, None)?.value;

    let to_field = if stream.eat(TokenKind::Dot, None).is_some() {
        Some(stream.expect(TokenKind::Ident, None)?.value)
    } else {
        None
    };

    // Speculative: `:cascade` style on-delete suffix.
    let mut on_delete = None;
    let mark = stream.save();
    if stream.eat(TokenKind::Colon, None).is_some() {
        match stream.eat(TokenKind::Ident, None) {
            Some(tok) => on_delete = Some(tok.value),
            None => stream.restore(mark),
        }
    }

    skip_to_close_paren(stream);
    stream.expect(TokenKind::CloseParen, None)?;
    Ok(DbRelation {
        from_model,
        from_field,
        to_model,
        to_field,
        on_delete,
    })
}

/// `@index(Model.field)` or `@index(Model(field, field))`
fn parse_index(stream: &mut TokenStream) -> Result<DbIndex> {
    stream.expect(TokenKind::OpenParen, None)?;
    let model = stream.expect(TokenKind::Ident, None)?.value;
    let mut fields = Vec::new();
    if stream.eat(TokenKind::Dot, None).is_some() {
        fields.push(stream.expect(TokenKind::Ident, None)?.value);
    } else if stream.eat(TokenKind::OpenParen, None).is_some() {
        loop {
            stream.skip_separators();
            if stream.is(TokenKind::CloseParen, None) {
                break;
            }
            fields.push(stream.expect(TokenKind::Ident, None)?.value);
        }
        stream.expect(TokenKind::CloseParen, None)?;
    }
    if fields.is_empty() {
        return Err(ParseError::expected("an index field", stream.current()));
    }
    skip_to_close_paren(stream);
    stream.expect(TokenKind::CloseParen, None)?;
    Ok(DbIndex { model, fields })
}

/// Drop trailing decorations up to the annotation's closing paren.
fn skip_to_close_paren(stream: &mut TokenStream) {
    let mut depth = 0usize;
    loop {
        match stream.current().kind {
            TokenKind::Eof => break,
            TokenKind::CloseParen if depth == 0 => break,
            TokenKind::CloseParen => {
                depth -= 1;
                stream.advance();
            }
            TokenKind::OpenParen => {
                depth += 1;
                stream.advance();
            }
            _ => {
                stream.advance();
            }
        }
    }
}

fn skip_annotation(stream: &mut TokenStream) {
    if stream.eat(TokenKind::OpenParen, None).is_some() {
        skip_to_close_paren(stream);
        stream.eat(TokenKind::CloseParen, None);
    }
}
