//! Character-level tokenization.
//!
//! Produces the flat token sequence consumed by [`TokenStream`]. Kept
//! deliberately small: the interesting grammar work happens in the
//! parser, not here.
//!
//! [`TokenStream`]: crate::stream::TokenStream

use air_ast::{Token, TokenKind};

use crate::error::{ParseError, Result};

const TYPE_KEYWORDS: &[&str] = &[
    "str", "int", "float", "bool", "date", "datetime", "enum", "list", "map", "any",
];

/// Tokenize an AIR source document.
///
/// The returned sequence always ends with a single EOF token. `#`-led
/// lines are comments only before the first `@` token; after that, `#`
/// is an ordinary token (anchors, colors, entity refs).
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'src> {
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    src: &'src str,
    line: u32,
    col: u32,
    /// Set once the first `@` has been seen; disables comment lines.
    seen_at: bool,
    /// True until a non-whitespace character appears on the current line.
    line_blank: bool,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            src: source,
            line: 1,
            col: 1,
            seen_at: false,
            line_blank: true,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> u32 {
        self.chars
            .peek()
            .map_or(self.src.len() as u32, |&(i, _)| i as u32)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
            self.line_blank = true;
        } else {
            self.col += 1;
            if !c.is_whitespace() {
                self.line_blank = false;
            }
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            let (line, col, offset) = (self.line, self.col, self.offset());
            match c {
                '\n' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::Newline, "\n", line, col, offset));
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' if !self.seen_at && self.line_blank => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '@' => {
                    self.bump();
                    let word = self.take_ident();
                    if word.is_empty() {
                        return Err(ParseError::lexical(
                            "expected a keyword after '@'",
                            line,
                            col,
                            offset,
                        ));
                    }
                    self.seen_at = true;
                    tokens.push(Token::new(TokenKind::AtKeyword, word, line, col, offset));
                }
                '"' => {
                    let value = self.take_string(line, col, offset)?;
                    tokens.push(Token::new(TokenKind::Str, value, line, col, offset));
                }
                '0'..='9' => {
                    let value = self.take_number();
                    tokens.push(Token::new(TokenKind::Number, value, line, col, offset));
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.take_ident();
                    let kind = if word == "true" || word == "false" {
                        TokenKind::Bool
                    } else if TYPE_KEYWORDS.contains(&word.as_str()) {
                        TokenKind::TypeKeyword
                    } else {
                        TokenKind::Ident
                    };
                    tokens.push(Token::new(kind, word, line, col, offset));
                }
                _ => {
                    let kind = match c {
                        '(' => TokenKind::OpenParen,
                        ')' => TokenKind::CloseParen,
                        '{' => TokenKind::OpenBrace,
                        '}' => TokenKind::CloseBrace,
                        '[' => TokenKind::OpenBracket,
                        ']' => TokenKind::CloseBracket,
                        ':' => TokenKind::Colon,
                        ',' => TokenKind::Comma,
                        '#' => TokenKind::Hash,
                        '.' => TokenKind::Dot,
                        '/' => TokenKind::Slash,
                        '>' | '|' | '+' | '?' | '*' | '!' | '~' | '^' | '$' => TokenKind::Op,
                        _ => {
                            return Err(ParseError::lexical(
                                format!("unexpected character '{c}'"),
                                line,
                                col,
                                offset,
                            ));
                        }
                    };
                    self.bump();
                    tokens.push(Token::new(kind, c, line, col, offset));
                }
            }
        }

        let end = self.src.len() as u32;
        tokens.push(Token::eof(self.line, self.col, end));
        Ok(tokens)
    }

    fn take_ident(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    fn take_number(&mut self) -> String {
        let mut value = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            value.push(self.bump().unwrap_or_default());
        }
        // Decimal part only when a digit follows the dot, so `1.` in a
        // dotted chain stays two tokens.
        if self.peek() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                value.push('.');
                self.bump();
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    value.push(self.bump().unwrap_or_default());
                }
            }
        }
        value
    }

    fn take_string(&mut self, line: u32, col: u32, offset: u32) -> Result<String> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c) => value.push(c),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(ParseError::lexical(
            "unterminated string literal",
            line,
            col,
            offset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = lex("@app:my-app").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::AtKeyword);
        assert_eq!(tokens[0].value, "app");
        assert_eq!(tokens[1].kind, TokenKind::Colon);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].value, "my-app");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_comment_lines_before_app_are_stripped() {
        let tokens = lex("# a comment\n# another\n@app:t").unwrap();
        let at = tokens.iter().find(|t| t.kind == TokenKind::AtKeyword).unwrap();
        assert_eq!(at.value, "app");
        assert_eq!(at.line, 3);
        // No Hash tokens survive from the comment lines.
        assert!(
            tokens
                .iter()
                .all(|t| t.kind != TokenKind::Hash || t.line > 2)
        );
    }

    #[test]
    fn test_hash_is_a_token_after_app() {
        let tokens = lex("@app:t\n@nav(/#hero)").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Hash));
    }

    #[test]
    fn test_line_and_col_are_one_based() {
        let tokens = lex("@app:t\n@state{name:str}").unwrap();
        let state = tokens
            .iter()
            .find(|t| t.matches(TokenKind::AtKeyword, Some("state")))
            .unwrap();
        assert_eq!((state.line, state.col), (2, 1));
        let name = tokens
            .iter()
            .find(|t| t.matches(TokenKind::Ident, Some("name")))
            .unwrap();
        assert_eq!((name.line, name.col), (2, 8));
    }

    #[test]
    fn test_type_keywords_and_bools() {
        let tokens = lex("str done true").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::TypeKeyword);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Bool);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 3.25 7d").unwrap();
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].value, "3.25");
        // `7d` lexes as a number followed by an identifier.
        assert_eq!(tokens[2].value, "7");
        assert_eq!(tokens[3].kind, TokenKind::Ident);
    }

    #[test]
    fn test_dotted_chain_is_not_a_decimal() {
        let tokens = lex("db.todos.all").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            &kinds[..5],
            &[
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""hello \"world\"\n""#).unwrap();
        assert_eq!(tokens[0].value, "hello \"world\"\n");
    }

    #[test]
    fn test_unterminated_string_is_lexical_error() {
        let err = lex("\"oops").unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::Lexical);
        assert_eq!((err.line, err.col), (1, 1));
    }

    #[test]
    fn test_unexpected_character_is_lexical_error() {
        let err = lex("@app:t\n;").unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::Lexical);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("> | + ? * ! ~ ^ $"),
            vec![TokenKind::Op; 9]
                .into_iter()
                .chain([TokenKind::Eof])
                .collect::<Vec<_>>()
        );
    }
}
