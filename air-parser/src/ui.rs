//! Operator-precedence parser for the UI tree.
//!
//! Six levels, lowest to highest binding: compose `+`, flow `>`, pipe
//! `|`, bind `:`, prefix (`* ! ~ ^ ? #` and right-associative `$`),
//! atom. Every binary level is a left-associative loop delegating to
//! the next-higher level.

use air_ast::{AirUiNode, ScopeKind, Token, TokenKind, UiOp, UiPrefixOp};

use crate::blocks::raw_text;
use crate::error::{ParseError, Result};
use crate::stream::TokenStream;

/// Resource bound against pathological or adversarial input, not a
/// language restriction.
pub const MAX_UI_DEPTH: usize = 500;

/// Parse UI expressions up to (not consuming) `terminator`.
///
/// Newlines and commas are both valid sibling separators, so a
/// single-line and a multi-line body parse identically.
pub fn parse_ui_nodes(stream: &mut TokenStream, terminator: TokenKind) -> Result<Vec<AirUiNode>> {
    let mut nodes = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(terminator, None) || stream.is_eof() {
            break;
        }
        nodes.push(parse_ui_expr(stream, 0)?);
    }
    Ok(nodes)
}

/// Parse one UI expression at the lowest precedence level.
pub fn parse_ui_expr(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    if depth > MAX_UI_DEPTH {
        return Err(ParseError::max_depth(stream.current()));
    }
    parse_compose(stream, depth)
}

fn parse_compose(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let mut left = parse_flow(stream, depth)?;
    while stream.current().is_op("+") {
        stream.advance();
        stream.skip_newlines();
        let right = parse_flow(stream, depth)?;
        left = binary(UiOp::Compose, left, right);
    }
    Ok(left)
}

fn parse_flow(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let mut left = parse_pipe(stream, depth)?;
    while stream.current().is_op(">") {
        stream.advance();
        stream.skip_newlines();
        let right = parse_pipe(stream, depth)?;
        left = binary(UiOp::Flow, left, right);
    }
    Ok(left)
}

fn parse_pipe(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let mut left = parse_bind(stream, depth)?;
    while stream.current().is_op("|") {
        stream.advance();
        stream.skip_newlines();
        let right = parse_bind(stream, depth)?;
        left = binary(UiOp::Pipe, left, right);
    }
    Ok(left)
}

fn parse_bind(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let mut left = parse_prefix(stream, depth)?;
    let mut bound = false;
    while stream.is(TokenKind::Colon, None) {
        stream.advance();
        let right = parse_prefix(stream, depth)?;
        left = binary(UiOp::Bind, left, right);
        bound = true;
    }
    // A paren group after a bind chain such as `grid:3(...)` is that
    // node's children, not a new sibling.
    if bound && stream.is(TokenKind::OpenParen, None) {
        let children = parse_children(stream, depth)?;
        left = attach_children(left, children);
    }
    Ok(left)
}

/// Attach children to the result of a bind chain. A plain element takes
/// them directly; anything else gets a synthetic wrapper element so the
/// children are never silently dropped.
fn attach_children(node: AirUiNode, new_children: Vec<AirUiNode>) -> AirUiNode {
    match node {
        AirUiNode::Element { name, mut children } => {
            children.extend(new_children);
            AirUiNode::Element { name, children }
        }
        other => AirUiNode::Element {
            name: "group".to_string(),
            children: std::iter::once(other).chain(new_children).collect(),
        },
    }
}

fn parse_prefix(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    if depth > MAX_UI_DEPTH {
        return Err(ParseError::max_depth(stream.current()));
    }
    let op = match stream.current() {
        tok if tok.is_op("*") => UiPrefixOp::Repeat,
        tok if tok.is_op("!") => UiPrefixOp::Action,
        tok if tok.is_op("~") => UiPrefixOp::Stream,
        tok if tok.is_op("^") => UiPrefixOp::Hoist,
        tok if tok.is_op("?") => UiPrefixOp::Conditional,
        tok if tok.is_op("$") => UiPrefixOp::Binding,
        tok if tok.kind == TokenKind::Hash => UiPrefixOp::Ref,
        _ => return parse_atom(stream, depth),
    };
    stream.advance();
    let operand = parse_prefix(stream, depth + 1)?;
    Ok(AirUiNode::Unary {
        op,
        operand: Box::new(operand),
    })
}

fn parse_atom(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    match stream.current().kind {
        TokenKind::Str => {
            let tok = stream.advance();
            Ok(AirUiNode::Text { value: tok.value })
        }
        TokenKind::Number | TokenKind::Bool => {
            let tok = stream.advance();
            Ok(AirUiNode::Value { value: tok.value })
        }
        TokenKind::OpenBrace => {
            let raw = capture_balanced(stream, TokenKind::OpenBrace, TokenKind::CloseBrace)?;
            Ok(AirUiNode::Value { value: raw })
        }
        TokenKind::OpenBracket => {
            let raw = capture_balanced(stream, TokenKind::OpenBracket, TokenKind::CloseBracket)?;
            Ok(AirUiNode::Value { value: raw })
        }
        TokenKind::AtKeyword => parse_scoped(stream, depth),
        TokenKind::Slash => parse_path(stream),
        TokenKind::Ident | TokenKind::TypeKeyword => parse_element(stream, depth),
        TokenKind::OpenParen => {
            // Bare paren group: single child collapses, several wrap.
            let mut children = parse_children(stream, depth)?;
            if children.len() == 1 {
                Ok(children.remove(0))
            } else {
                Ok(AirUiNode::Element {
                    name: "group".to_string(),
                    children,
                })
            }
        }
        _ => Err(ParseError::unexpected(
            stream.current(),
            "in UI expression",
        )),
    }
}

/// `@page:name(...)` / `@section:name(...)`.
fn parse_scoped(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let keyword = stream.advance();
    let scope = match keyword.value.as_str() {
        "page" => ScopeKind::Page,
        "section" => ScopeKind::Section,
        _ => return Err(ParseError::unexpected(&keyword, "in UI expression")),
    };
    stream.expect(TokenKind::Colon, None)?;
    let name = stream.expect(TokenKind::Ident, None)?;
    let children = if stream.is(TokenKind::OpenParen, None) {
        parse_children(stream, depth)?
    } else {
        Vec::new()
    };
    Ok(AirUiNode::Scoped {
        scope,
        name: name.value,
        children,
    })
}

/// Bare path atom such as `/signup` or `/#hero`.
fn parse_path(stream: &mut TokenStream) -> Result<AirUiNode> {
    let mut path = String::new();
    while matches!(
        stream.current().kind,
        TokenKind::Slash | TokenKind::Hash | TokenKind::Dot | TokenKind::Ident | TokenKind::Number
    ) {
        path.push_str(&stream.advance().value);
    }
    Ok(AirUiNode::Element {
        name: path,
        children: Vec::new(),
    })
}

/// Dot-chained identifier with optional parenthesized children.
fn parse_element(stream: &mut TokenStream, depth: usize) -> Result<AirUiNode> {
    let first = stream.advance();
    let mut name = first.value;
    while stream.is(TokenKind::Dot, None) {
        stream.advance();
        let part = if stream.is(TokenKind::Ident, None) || stream.is(TokenKind::TypeKeyword, None)
        {
            stream.advance()
        } else {
            return Err(ParseError::expected("an identifier after '.'", stream.current()));
        };
        name.push('.');
        name.push_str(&part.value);
    }
    let children = if stream.is(TokenKind::OpenParen, None) {
        parse_children(stream, depth)?
    } else {
        Vec::new()
    };
    Ok(AirUiNode::Element { name, children })
}

fn parse_children(stream: &mut TokenStream, depth: usize) -> Result<Vec<AirUiNode>> {
    stream.expect(TokenKind::OpenParen, None)?;
    let mut children = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(TokenKind::CloseParen, None) || stream.is_eof() {
            break;
        }
        children.push(parse_ui_expr(stream, depth + 1)?);
    }
    stream.expect(TokenKind::CloseParen, None)?;
    Ok(children)
}

/// Raw-capture a balanced `{...}` or `[...]` literal, delimiters
/// included. Newlines inside collapse to single spaces.
fn capture_balanced(stream: &mut TokenStream, open: TokenKind, close: TokenKind) -> Result<String> {
    let start: Token = stream.expect(open, None)?;
    let mut raw = start.value.clone();
    let mut level = 1usize;
    while level > 0 {
        if stream.is_eof() {
            return Err(ParseError::expected("a closing delimiter", stream.current()));
        }
        let tok = stream.advance();
        if tok.kind == open {
            level += 1;
        } else if tok.kind == close {
            level -= 1;
        }
        if tok.kind == TokenKind::Newline {
            raw.push(' ');
        } else {
            raw.push_str(&raw_text(&tok));
        }
    }
    Ok(raw)
}

fn binary(op: UiOp, left: AirUiNode, right: AirUiNode) -> AirUiNode {
    AirUiNode::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(lex(source).unwrap())
    }

    fn expr(source: &str) -> AirUiNode {
        parse_ui_expr(&mut stream(source), 0).unwrap()
    }

    #[test]
    fn test_precedence_ordering() {
        // compose is loosest, then flow, then pipe, then bind.
        let node = expr("a + b > c | d:e");
        let AirUiNode::Binary { op: UiOp::Compose, right, .. } = node else {
            panic!("expected compose at the root");
        };
        let AirUiNode::Binary { op: UiOp::Flow, right, .. } = *right else {
            panic!("expected flow under compose");
        };
        let AirUiNode::Binary { op: UiOp::Pipe, right, .. } = *right else {
            panic!("expected pipe under flow");
        };
        assert!(matches!(*right, AirUiNode::Binary { op: UiOp::Bind, .. }));
    }

    #[test]
    fn test_left_associativity() {
        let node = expr("a > b > c");
        let AirUiNode::Binary { op: UiOp::Flow, left, right } = node else {
            panic!("expected flow");
        };
        assert!(matches!(*left, AirUiNode::Binary { op: UiOp::Flow, .. }));
        assert_eq!(right.element_name(), Some("c"));
    }

    #[test]
    fn test_separator_equivalence() {
        let single = expr("nav(overview,users,settings)");
        let multi = expr("nav(overview\nusers\nsettings)");
        assert_eq!(single, multi);
        let AirUiNode::Element { name, children } = single else {
            panic!("expected element");
        };
        assert_eq!(name, "nav");
        let names: Vec<_> = children.iter().filter_map(|c| c.element_name()).collect();
        assert_eq!(names, ["overview", "users", "settings"]);
    }

    #[test]
    fn test_bind_modifier_with_children() {
        let node = expr("grid:3(a,b)");
        let AirUiNode::Element { name, children } = node else {
            panic!("expected synthetic wrapper element");
        };
        assert_eq!(name, "group");
        assert_eq!(children.len(), 3);
        // The bound node survives as the first child.
        assert!(matches!(
            children[0],
            AirUiNode::Binary { op: UiOp::Bind, .. }
        ));
        assert_eq!(children[1].element_name(), Some("a"));
    }

    #[test]
    fn test_prefix_operators() {
        let node = expr("*todo");
        assert!(matches!(
            node,
            AirUiNode::Unary { op: UiPrefixOp::Repeat, .. }
        ));
        let node = expr("!submit");
        assert!(matches!(
            node,
            AirUiNode::Unary { op: UiPrefixOp::Action, .. }
        ));
        let node = expr("$user");
        assert!(matches!(
            node,
            AirUiNode::Unary { op: UiPrefixOp::Binding, .. }
        ));
        let node = expr("#hero");
        assert!(matches!(node, AirUiNode::Unary { op: UiPrefixOp::Ref, .. }));
    }

    #[test]
    fn test_prefix_stacking() {
        let node = expr("*!item");
        let AirUiNode::Unary { op: UiPrefixOp::Repeat, operand } = node else {
            panic!("expected repeat on the outside");
        };
        assert!(matches!(
            *operand,
            AirUiNode::Unary { op: UiPrefixOp::Action, .. }
        ));
    }

    #[test]
    fn test_scoped_page_and_section() {
        let node = expr("@page:home(hero, footer)");
        let AirUiNode::Scoped { scope, name, children } = node else {
            panic!("expected scoped node");
        };
        assert_eq!(scope, ScopeKind::Page);
        assert_eq!(name, "home");
        assert_eq!(children.len(), 2);

        let node = expr("@section:pricing");
        assert!(matches!(
            node,
            AirUiNode::Scoped { scope: ScopeKind::Section, ref children, .. } if children.is_empty()
        ));
    }

    #[test]
    fn test_atoms() {
        assert_eq!(
            expr("\"Save\""),
            AirUiNode::Text {
                value: "Save".into()
            }
        );
        assert_eq!(expr("42"), AirUiNode::Value { value: "42".into() });
        assert_eq!(
            expr("/signup"),
            AirUiNode::Element {
                name: "/signup".into(),
                children: vec![]
            }
        );
        assert_eq!(
            expr("/#hero"),
            AirUiNode::Element {
                name: "/#hero".into(),
                children: vec![]
            }
        );
    }

    #[test]
    fn test_dotted_element_names() {
        let node = expr("form.field.input");
        assert_eq!(node.element_name(), Some("form.field.input"));
    }

    #[test]
    fn test_raw_brace_capture() {
        let node = expr("{color:red,size:2}");
        assert_eq!(
            node,
            AirUiNode::Value {
                value: "{color:red,size:2}".into()
            }
        );
    }

    #[test]
    fn test_raw_capture_keeps_string_quotes() {
        let node = expr("{label:\"hi\"}");
        assert_eq!(
            node,
            AirUiNode::Value {
                value: "{label:\"hi\"}".into()
            }
        );
    }

    #[test]
    fn test_raw_bracket_capture_nested() {
        let node = expr("[1,[2,3]]");
        assert_eq!(
            node,
            AirUiNode::Value {
                value: "[1,[2,3]]".into()
            }
        );
    }

    #[test]
    fn test_depth_guard() {
        let deep_ok = format!("{}x{}", "(".repeat(500), ")".repeat(500));
        assert!(parse_ui_expr(&mut stream(&deep_ok), 0).is_ok());

        let too_deep = format!("{}x{}", "(".repeat(501), ")".repeat(501));
        let err = parse_ui_expr(&mut stream(&too_deep), 0).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::MaxDepth);
        assert!(err.message.contains("max nesting depth"));
    }

    #[test]
    fn test_ui_node_list_terminator() {
        let mut s = stream("header > nav, footer)");
        let nodes = parse_ui_nodes(&mut s, TokenKind::CloseParen).unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
