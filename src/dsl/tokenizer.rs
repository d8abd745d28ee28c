//! logos-based tokenizer for view-description text.
//!
//! Token priority in logos is longest match first, then definition order.
//! That keeps:
//! - `32px` a [`Token::Dimension`], not `Number` + `Ident`
//! - `0:1` a [`Token::Range`], not `Number` + `Colon` + `Number`
//! - `#ff0000` a [`Token::HexColor`]
//!
//! Comments (`// ...` and `/* ... */`) and whitespace are skipped.

use logos::Logos;

use crate::dsl::parser::{ParseError, ParseErrorKind};

/// View-description token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // ── Literals ─────────────────────────────────────────────────────

    /// `#` followed by hex digits. The digit count is checked by the parser.
    #[regex(r"#[0-9a-fA-F]+")]
    HexColor,

    /// `first:last` with no whitespace around the colon.
    #[regex(r"-?[0-9]+:-?[0-9]+")]
    Range,

    /// Number with a unit suffix: `32px`, `100%`, `1.5fr`, `90deg`, `500ms`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?([a-zA-Z]+|%)")]
    Dimension,

    /// Integer or decimal, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Double-quoted string with backslash escapes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    /// Single-quoted string with backslash escapes.
    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    /// Backtick string, taken verbatim.
    #[regex(r"`[^`]*`")]
    Raw,

    /// Identifier: kind names, attribute names, enum names, colors, `_`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Punctuation ──────────────────────────────────────────────────

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    #[token(":")]
    Colon,
}

impl Token {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Token::HexColor => "color literal",
            Token::Range => "range",
            Token::Dimension => "dimension",
            Token::Number => "number",
            Token::DoubleQuoted | Token::SingleQuoted | Token::Raw => "string",
            Token::Ident => "identifier",
            Token::BraceOpen => "'{'",
            Token::BraceClose => "'}'",
            Token::BracketOpen => "'['",
            Token::BracketClose => "']'",
            Token::Comma => "','",
            Token::Equals => "'='",
            Token::Colon => "':'",
        }
    }
}

/// A token with its source text and 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Byte offsets of line starts, for offset → (line, column) conversion.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { source, starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.starts[line];
        let column = self.source[start..offset].chars().count() + 1;
        (line + 1, column)
    }
}

/// Tokenize `input`, failing on the first unlexable character.
pub fn lex(input: &str) -> Result<Vec<Lexeme>, ParseError> {
    let index = LineIndex::new(input);
    let mut lexemes = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        let (line, column) = index.position(span.start);
        match result {
            Ok(token) => lexemes.push(Lexeme {
                token,
                text: input[span].to_string(),
                line,
                column,
            }),
            Err(()) => {
                return Err(ParseError::new(
                    line,
                    column,
                    ParseErrorKind::Unlexable(input[span].to_string()),
                ))
            }
        }
    }
    Ok(lexemes)
}

/// Tokenize `input` into `(Token, text)` pairs, skipping unlexable input.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}
