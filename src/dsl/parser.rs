//! Recursive descent parser for view-description text.
//!
//! ```text
//! Node   := Ident '{' (Attr ','?)* '}'
//! Attr   := (Ident | Number) '=' Value
//! Value  := Scalar | Node | '_' '{' ... '}' | '[' (Value ','?)* ']'
//! Scalar := Number | Dimension | HexColor | String | Ident | Range
//! Range  := Integer ':' Integer
//! ```
//!
//! The parser checks syntax only. Values come out in source form
//! ([`Value::Int`], [`Value::Ident`], [`Value::Node`], ...) except for
//! literals whose kind the token already fixes: dimensions become sizes,
//! angles or durations, hex literals become colors, `a:b` becomes a range.

use std::collections::HashSet;

use crate::dsl::model::{Attr, Node};
use crate::dsl::tokenizer::{lex, Lexeme, Token};
use crate::value::{Angle, AngleUnit, Color, Range, Size, SizeUnit, Value};

/// Errors from view-description parsing, positioned at the offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, column: usize, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("duplicate attribute \"{0}\"")]
    DuplicateAttribute(String),
    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),
    #[error("invalid color literal \"{0}\"")]
    InvalidColor(String),
    #[error("invalid escape sequence in {0}")]
    InvalidEscape(String),
    #[error("unrecognized input \"{0}\"")]
    Unlexable(String),
}

/// Parse exactly one node.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new(input)?;
    let node = parser.parse_node()?;
    parser.expect_eof()?;
    Ok(node)
}

/// Parse a sequence of nodes, optionally separated by commas.
pub fn parse_nodes(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::new(input)?;
    let mut nodes = Vec::new();
    loop {
        parser.skip_commas();
        if parser.is_eof() {
            break;
        }
        nodes.push(parser.parse_node()?);
    }
    Ok(nodes)
}

/// Parse a single value, e.g. the right-hand side of an attribute.
pub fn parse_value(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input)?;
    let value = parser.parse_value()?;
    parser.expect_eof()?;
    Ok(value)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<Lexeme>,
    cursor: usize,
    /// Position reported for errors at end of input.
    end: (usize, usize),
}

impl Parser {
    fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = lex(input)?;
        let end = match input.lines().count() {
            0 => (1, 1),
            n => (n, input.lines().last().map_or(0, |l| l.chars().count()) + 1),
        };
        Ok(Self {
            tokens,
            cursor: 0,
            end,
        })
    }

    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|l| l.token)
    }

    fn peek_nth_token(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.cursor + n).map(|l| l.token)
    }

    fn advance(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.get(self.cursor).cloned();
        if lexeme.is_some() {
            self.cursor += 1;
        }
        lexeme
    }

    fn error_at(&self, lexeme: &Lexeme, kind: ParseErrorKind) -> ParseError {
        ParseError::new(lexeme.line, lexeme.column, kind)
    }

    fn eof_error(&self, expected: &str) -> ParseError {
        ParseError::new(
            self.end.0,
            self.end.1,
            ParseErrorKind::UnexpectedEof(expected.to_string()),
        )
    }

    fn unexpected(&self, lexeme: &Lexeme, expected: &str) -> ParseError {
        self.error_at(
            lexeme,
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{} '{}'", lexeme.token.describe(), lexeme.text),
            },
        )
    }

    fn expect(&mut self, expected: Token) -> Result<Lexeme, ParseError> {
        match self.advance() {
            Some(lexeme) if lexeme.token == expected => Ok(lexeme),
            Some(lexeme) => Err(self.unexpected(&lexeme, expected.describe())),
            None => Err(self.eof_error(expected.describe())),
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(lexeme) => Err(self.unexpected(lexeme, "end of input")),
        }
    }

    fn skip_commas(&mut self) {
        while self.peek_token() == Some(Token::Comma) {
            self.cursor += 1;
        }
    }

    // ── Nodes ────────────────────────────────────────────────────────

    /// `Ident '{' attrs '}'`
    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let head = self.expect(Token::Ident)?;
        self.parse_node_body(head)
    }

    fn parse_node_body(&mut self, head: Lexeme) -> Result<Node, ParseError> {
        self.expect(Token::BraceOpen)?;
        let mut node = Node {
            kind: head.text,
            attrs: Vec::new(),
            line: head.line,
            column: head.column,
        };
        let mut seen = HashSet::new();
        loop {
            self.skip_commas();
            match self.peek_token() {
                Some(Token::BraceClose) => {
                    self.cursor += 1;
                    return Ok(node);
                }
                None => return Err(self.eof_error("'}'")),
                Some(_) => {}
            }
            let attr = self.parse_attr()?;
            if !seen.insert(attr.name.to_ascii_lowercase()) {
                return Err(ParseError::new(
                    attr.line,
                    attr.column,
                    ParseErrorKind::DuplicateAttribute(attr.name),
                ));
            }
            node.attrs.push(attr);
        }
    }

    /// `name '=' value`. Numeric names serve keyframe maps (`25 = 200px`).
    fn parse_attr(&mut self) -> Result<Attr, ParseError> {
        let name = match self.advance() {
            Some(lexeme) if matches!(lexeme.token, Token::Ident | Token::Number) => lexeme,
            Some(lexeme) => return Err(self.unexpected(&lexeme, "attribute name")),
            None => return Err(self.eof_error("attribute name")),
        };
        self.expect(Token::Equals)?;
        let value = self.parse_value()?;
        Ok(Attr {
            name: name.text,
            value,
            line: name.line,
            column: name.column,
        })
    }

    // ── Values ───────────────────────────────────────────────────────

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let lexeme = self.advance().ok_or_else(|| self.eof_error("value"))?;
        match lexeme.token {
            Token::Ident if self.peek_token() == Some(Token::BraceOpen) => {
                Ok(Value::Node(self.parse_node_body(lexeme)?))
            }
            Token::Ident => Ok(Value::Ident(lexeme.text)),
            Token::Number
                if self.peek_token() == Some(Token::Colon)
                    && self.peek_nth_token(1) == Some(Token::Number) =>
            {
                self.cursor += 1;
                let last = self.advance().ok_or_else(|| self.eof_error("number"))?;
                let range = format!("{}:{}", lexeme.text, last.text);
                self.range(&lexeme, &range)
            }
            Token::Number => self.number(&lexeme),
            Token::Range => self.range(&lexeme, &lexeme.text),
            Token::Dimension => self.dimension(&lexeme),
            Token::HexColor => Color::from_hex(&lexeme.text)
                .map(Value::Color)
                .ok_or_else(|| self.error_at(&lexeme, ParseErrorKind::InvalidColor(lexeme.text.clone()))),
            Token::DoubleQuoted | Token::SingleQuoted => {
                let inner = &lexeme.text[1..lexeme.text.len() - 1];
                unescape(inner)
                    .map(Value::Str)
                    .ok_or_else(|| self.error_at(&lexeme, ParseErrorKind::InvalidEscape(lexeme.text.clone())))
            }
            Token::Raw => Ok(Value::Str(lexeme.text[1..lexeme.text.len() - 1].to_string())),
            Token::BracketOpen => self.parse_list(),
            _ => Err(self.unexpected(&lexeme, "value")),
        }
    }

    /// `[ value, value ... ]`; the opening bracket is already consumed.
    fn parse_list(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_commas();
            match self.peek_token() {
                Some(Token::BracketClose) => {
                    self.cursor += 1;
                    return Ok(Value::List(items));
                }
                None => return Err(self.eof_error("']'")),
                Some(_) => items.push(self.parse_value()?),
            }
        }
    }

    fn range(&self, at: &Lexeme, text: &str) -> Result<Value, ParseError> {
        text.parse::<Range>()
            .map(Value::Range)
            .map_err(|_| self.unexpected(at, "integer range"))
    }

    /// Integer when it has no fractional part and fits `i64`, finite float
    /// otherwise.
    fn number(&self, lexeme: &Lexeme) -> Result<Value, ParseError> {
        let text = &lexeme.text;
        if !text.contains('.') {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Int(n));
            }
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| self.unexpected(lexeme, "number"))
    }

    fn dimension(&self, lexeme: &Lexeme) -> Result<Value, ParseError> {
        let text = &lexeme.text;
        let split = text
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .unwrap_or(text.len());
        let (digits, suffix) = text.split_at(split);
        let value: f64 = digits
            .parse()
            .map_err(|_| self.unexpected(lexeme, "number"))?;
        let suffix = suffix.to_ascii_lowercase();
        if let Some(unit) = SizeUnit::from_suffix(&suffix) {
            if unit != SizeUnit::Auto {
                return Ok(Value::Size(Size::new(value, unit)));
            }
        }
        if let Some(unit) = AngleUnit::from_suffix(&suffix) {
            return Ok(Value::Angle(Angle::new(value, unit)));
        }
        match suffix.as_str() {
            "s" => Ok(Value::Duration(value)),
            "ms" => Ok(Value::Duration(value / 1000.0)),
            _ => Err(self.error_at(lexeme, ParseErrorKind::UnknownUnit(suffix))),
        }
    }
}

/// Resolve backslash escapes. `None` on an invalid escape.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return None;
                }
                out.push(char::from(u8::from_str_radix(&hex, 16).ok()?));
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            _ => return None,
        }
    }
    Some(out)
}
