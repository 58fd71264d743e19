//! Recursive parser for the value-type sub-language.

use air_ast::{AirDbField, AirField, AirType, TokenKind};

use crate::error::{ParseError, Result};
use crate::stream::TokenStream;

/// Parse one type expression.
///
/// Handles, in priority order: `?T` (optional), `[T]` (array), `{...}`
/// (inline object), `#Name` (entity reference), the closed keyword set,
/// and the inline-enum shorthand `a|b|c`. A primitive keyword followed
/// by `(literal)` attaches a default value.
pub fn parse_type(stream: &mut TokenStream) -> Result<AirType> {
    if stream.current().is_op("?") {
        stream.advance();
        return Ok(AirType::Optional {
            of: Box::new(parse_type(stream)?),
        });
    }

    if stream.eat(TokenKind::OpenBracket, None).is_some() {
        stream.skip_separators();
        let inner = parse_type(stream)?;
        stream.skip_separators();
        stream.expect(TokenKind::CloseBracket, None)?;
        return Ok(AirType::Array {
            of: Box::new(inner),
        });
    }

    if stream.eat(TokenKind::OpenBrace, None).is_some() {
        let fields = parse_field_list(stream, TokenKind::CloseBrace)?;
        stream.expect(TokenKind::CloseBrace, None)?;
        return Ok(AirType::Object { fields });
    }

    if stream.eat(TokenKind::Hash, None).is_some() {
        let entity = stream.expect(TokenKind::Ident, None)?;
        return Ok(AirType::Ref {
            entity: entity.value,
        });
    }

    if stream.is(TokenKind::TypeKeyword, None) {
        return parse_keyword_type(stream);
    }

    // Inline enum shorthand: an identifier immediately followed by `|`.
    if stream.is(TokenKind::Ident, None) {
        let mark = stream.save();
        let first = stream.advance();
        if stream.current().is_op("|") {
            let mut values = vec![first.value];
            while stream.current().is_op("|") {
                stream.advance();
                let next = stream.expect(TokenKind::Ident, None)?;
                values.push(next.value);
            }
            return Ok(AirType::Enum { values });
        }
        stream.restore(mark);
    }

    Err(ParseError::expected("a type", stream.current()))
}

fn parse_keyword_type(stream: &mut TokenStream) -> Result<AirType> {
    let keyword = stream.advance();
    match keyword.value.as_str() {
        "str" => Ok(AirType::Str {
            default: parse_default_literal(stream)?.map(|t| t.value),
        }),
        "int" => {
            let default = match parse_default_literal(stream)? {
                Some(lit) => Some(
                    lit.value
                        .parse::<i64>()
                        .map_err(|_| ParseError::invalid("invalid integer default", &lit))?,
                ),
                None => None,
            };
            Ok(AirType::Int { default })
        }
        "float" => {
            let default = match parse_default_literal(stream)? {
                Some(lit) => Some(
                    lit.value
                        .parse::<f64>()
                        .map_err(|_| ParseError::invalid("invalid float default", &lit))?,
                ),
                None => None,
            };
            Ok(AirType::Float { default })
        }
        "bool" => {
            let default = match parse_default_literal(stream)? {
                Some(lit) => Some(
                    lit.value
                        .parse::<bool>()
                        .map_err(|_| ParseError::invalid("invalid boolean default", &lit))?,
                ),
                None => None,
            };
            Ok(AirType::Bool { default })
        }
        "date" => Ok(AirType::Date),
        "datetime" => Ok(AirType::Datetime),
        "enum" => {
            stream.expect(TokenKind::OpenParen, None)?;
            let mut values = Vec::new();
            loop {
                stream.skip_separators();
                // Commas and pipes are interchangeable value separators.
                if stream.current().is_op("|") {
                    stream.advance();
                    continue;
                }
                if stream.is(TokenKind::CloseParen, None) || stream.is_eof() {
                    break;
                }
                let tok = stream.advance();
                match tok.kind {
                    TokenKind::Ident
                    | TokenKind::TypeKeyword
                    | TokenKind::Str
                    | TokenKind::Number
                    | TokenKind::Bool => values.push(tok.value),
                    _ => return Err(ParseError::unexpected(&tok, "in enum value list")),
                }
            }
            let close = stream.expect(TokenKind::CloseParen, None)?;
            if values.is_empty() {
                return Err(ParseError::invalid("enum requires at least one value", &close));
            }
            Ok(AirType::Enum { values })
        }
        // `list(T)` and bare `list` desugar to arrays.
        "list" => {
            if stream.eat(TokenKind::OpenParen, None).is_some() {
                let inner = parse_type(stream)?;
                stream.expect(TokenKind::CloseParen, None)?;
                Ok(AirType::Array {
                    of: Box::new(inner),
                })
            } else {
                Ok(AirType::Array {
                    of: Box::new(AirType::str()),
                })
            }
        }
        // `map` desugars to an empty object.
        "map" => Ok(AirType::Object { fields: vec![] }),
        // Lossy legacy shim: `any` carries no structure and lowers to str.
        "any" => Ok(AirType::str()),
        _ => Err(ParseError::unexpected(&keyword, "in type position")),
    }
}

/// `(literal)` after a primitive keyword; absent parens mean no default.
fn parse_default_literal(stream: &mut TokenStream) -> Result<Option<air_ast::Token>> {
    if stream.eat(TokenKind::OpenParen, None).is_none() {
        return Ok(None);
    }
    let lit = stream.advance();
    match lit.kind {
        TokenKind::Str | TokenKind::Number | TokenKind::Bool | TokenKind::Ident => {}
        _ => return Err(ParseError::unexpected(&lit, "as default literal")),
    }
    stream.expect(TokenKind::CloseParen, None)?;
    Ok(Some(lit))
}

/// Field names may shadow type keywords (`date:date` is legal).
fn expect_field_name(stream: &mut TokenStream) -> Result<air_ast::Token> {
    if stream.is(TokenKind::Ident, None) || stream.is(TokenKind::TypeKeyword, None) {
        Ok(stream.advance())
    } else {
        Err(ParseError::expected("a field name", stream.current()))
    }
}

/// Parse `name : type` pairs up to (not consuming) `terminator`.
///
/// Trailing commas and newline separators are tolerated; a dangling
/// comma before the terminator stops the loop cleanly.
pub fn parse_field_list(stream: &mut TokenStream, terminator: TokenKind) -> Result<Vec<AirField>> {
    let mut fields: Vec<AirField> = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(terminator, None) || stream.is_eof() {
            break;
        }
        let name = expect_field_name(stream)?;
        stream.expect(TokenKind::Colon, None)?;
        let ty = parse_type(stream)?;
        if fields.iter().any(|f| f.name == name.value) {
            return Err(ParseError::invalid(
                format!("duplicate field '{}'", name.value),
                &name,
            ));
        }
        fields.push(AirField::new(name.value, ty));
    }
    Ok(fields)
}

/// Parse `name : type [: modifier]*` db fields up to `terminator`.
///
/// Modifiers are consumed as a `:`-prefixed chain with speculative
/// backtracking: an unrecognized modifier restores the stream position
/// and the chain stops without error.
pub fn parse_db_field_list(
    stream: &mut TokenStream,
    terminator: TokenKind,
) -> Result<Vec<AirDbField>> {
    let mut fields: Vec<AirDbField> = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(terminator, None) || stream.is_eof() {
            break;
        }
        let name = expect_field_name(stream)?;
        stream.expect(TokenKind::Colon, None)?;
        let ty = parse_type(stream)?;
        let mut field = AirDbField::new(name.value, ty);

        while stream.is(TokenKind::Colon, None) {
            let mark = stream.save();
            stream.advance();
            if !stream.is(TokenKind::Ident, None) {
                stream.restore(mark);
                break;
            }
            match stream.current().value.as_str() {
                "primary" => {
                    field.primary = true;
                    stream.advance();
                }
                "required" => {
                    field.required = true;
                    stream.advance();
                }
                "auto" => {
                    field.auto = true;
                    stream.advance();
                }
                "default" => {
                    stream.advance();
                    match parse_default_literal(stream)? {
                        Some(lit) => field.default = Some(lit.value),
                        None => {
                            stream.restore(mark);
                            break;
                        }
                    }
                }
                _ => {
                    stream.restore(mark);
                    break;
                }
            }
        }
        // Unrecognized trailing decorations are skipped up to the next
        // separator (forward-compatible extension point).
        while !stream.is(TokenKind::Comma, None)
            && !stream.is(TokenKind::Newline, None)
            && !stream.is(terminator, None)
            && !stream.is_eof()
        {
            stream.advance();
        }
        fields.push(field);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(lex(source).unwrap())
    }

    fn ty(source: &str) -> AirType {
        parse_type(&mut stream(source)).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(ty("str"), AirType::str());
        assert_eq!(ty("int"), AirType::int());
        assert_eq!(ty("date"), AirType::Date);
        assert_eq!(ty("datetime"), AirType::Datetime);
    }

    #[test]
    fn test_optional_wraps_one_inner() {
        assert_eq!(
            ty("?str"),
            AirType::Optional {
                of: Box::new(AirType::str())
            }
        );
    }

    #[test]
    fn test_array_of_object_composition() {
        let parsed = ty("[{id:int,text:str,done:bool}]");
        let AirType::Array { of } = parsed else {
            panic!("expected array");
        };
        let AirType::Object { fields } = *of else {
            panic!("expected object inner");
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[2].ty, AirType::bool());
    }

    #[test]
    fn test_entity_ref() {
        assert_eq!(
            ty("#User"),
            AirType::Ref {
                entity: "User".into()
            }
        );
    }

    #[test]
    fn test_enum_pipe_separated_values() {
        assert_eq!(ty("enum(all|active|done)"), ty("enum(all,active,done)"));
    }

    #[test]
    fn test_enum_preserves_declaration_order() {
        assert_eq!(
            ty("enum(all,active,done)"),
            AirType::Enum {
                values: vec!["all".into(), "active".into(), "done".into()]
            }
        );
    }

    #[test]
    fn test_empty_enum_rejected() {
        let err = parse_type(&mut stream("enum()")).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_inline_enum_shorthand() {
        assert_eq!(
            ty("admin|user|guest"),
            AirType::Enum {
                values: vec!["admin".into(), "user".into(), "guest".into()]
            }
        );
    }

    #[test]
    fn test_list_and_map_desugar() {
        assert_eq!(
            ty("list(int)"),
            AirType::Array {
                of: Box::new(AirType::int())
            }
        );
        assert_eq!(
            ty("list"),
            AirType::Array {
                of: Box::new(AirType::str())
            }
        );
        assert_eq!(ty("map"), AirType::Object { fields: vec![] });
        assert_eq!(ty("any"), AirType::str());
    }

    #[test]
    fn test_primitive_defaults() {
        assert_eq!(
            ty("int(0)"),
            AirType::Int { default: Some(0) }
        );
        assert_eq!(
            ty("str(draft)"),
            AirType::Str {
                default: Some("draft".into())
            }
        );
        assert_eq!(
            ty("bool(true)"),
            AirType::Bool {
                default: Some(true)
            }
        );
    }

    #[test]
    fn test_bad_int_default_is_invalid_syntax() {
        let err = parse_type(&mut stream("int(oops)")).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_field_list_separator_equivalence() {
        let mut single = stream("name:str,age:int}");
        let mut multi = stream("name:str\nage:int\n}");
        let a = parse_field_list(&mut single, TokenKind::CloseBrace).unwrap();
        let b = parse_field_list(&mut multi, TokenKind::CloseBrace).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_field_list_tolerates_trailing_comma() {
        let fields = parse_field_list(&mut stream("name:str,}"), TokenKind::CloseBrace).unwrap();
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err =
            parse_field_list(&mut stream("a:str,a:int}"), TokenKind::CloseBrace).unwrap_err();
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn test_db_modifier_chain() {
        let fields = parse_db_field_list(
            &mut stream("id:int:primary:auto, email:str:required, bio:str}"),
            TokenKind::CloseBrace,
        )
        .unwrap();
        assert!(fields[0].primary && fields[0].auto && !fields[0].required);
        assert!(fields[1].required);
        assert!(!fields[2].primary && !fields[2].required && !fields[2].auto);
    }

    #[test]
    fn test_db_unknown_modifier_stops_chain_without_error() {
        // `indexed` is not a known modifier; the chain stops early and
        // the leftover decoration is skipped up to the separator.
        let fields = parse_db_field_list(
            &mut stream("id:int:primary:indexed, name:str}"),
            TokenKind::CloseBrace,
        )
        .unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields[0].primary);
        assert_eq!(fields[1].name, "name");
    }

    #[test]
    fn test_db_default_modifier() {
        let fields = parse_db_field_list(
            &mut stream("role:str:default(user)}"),
            TokenKind::CloseBrace,
        )
        .unwrap();
        assert_eq!(fields[0].default.as_deref(), Some("user"));
    }

    #[test]
    fn test_inline_enum_in_db_field() {
        let fields =
            parse_db_field_list(&mut stream("role:admin|user}"), TokenKind::CloseBrace).unwrap();
        assert_eq!(
            fields[0].ty,
            AirType::Enum {
                values: vec!["admin".into(), "user".into()]
            }
        );
    }
}
