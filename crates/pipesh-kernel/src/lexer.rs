//! Lexer for pipesh command lines.
//!
//! Converts a single input line into tokens using the logos lexer generator.
//!
//! # Token Categories
//!
//! - **Operators**: `|` separates pipeline stages
//! - **Strings**: `"double"` (with `\n`, `\t`, `\\`, `\"` escapes) and
//!   `'single'` (verbatim)
//! - **Words**: any other run of non-whitespace characters

use logos::{Logos, Span};
use std::fmt;

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub token: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(token: T, span: Span) -> Self {
        Self { token, span }
    }
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexerError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::UnexpectedCharacter => write!(f, "unexpected character"),
            LexerError::UnterminatedString => write!(f, "unterminated string"),
            LexerError::InvalidEscape => write!(f, "invalid escape sequence"),
        }
    }
}

impl std::error::Error for LexerError {}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("|")]
    Pipe,

    #[regex(r#""([^"\\]|\\.)*""#, lex_string)]
    String(String),

    /// An opening quote that never closes. Always yields an error.
    #[regex(r#""([^"\\]|\\.)*"#, lex_unterminated)]
    #[regex(r"'[^']*", lex_unterminated)]
    Unterminated,

    #[regex(r"'[^']*'", lex_single_string)]
    SingleString(String),

    #[regex(r#"[^\s|"']+"#, |lex| lex.slice().to_string())]
    Word(String),
}

impl Token {
    /// The text this token contributes to a stage's argument list.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::String(s) | Token::SingleString(s) | Token::Word(s) => Some(s),
            Token::Pipe | Token::Unterminated => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pipe => write!(f, "|"),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::SingleString(s) => write!(f, "'{}'", s),
            Token::Word(s) => write!(f, "{}", s),
            Token::Unterminated => write!(f, "<unterminated>"),
        }
    }
}

/// Lex a double-quoted string literal, processing escapes.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexerError> {
    parse_string_literal(lex.slice())
}

/// Lex a single-quoted string literal (no escape processing).
fn lex_single_string(lex: &mut logos::Lexer<Token>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

fn lex_unterminated(_lex: &mut logos::Lexer<Token>) -> Result<(), LexerError> {
    Err(LexerError::UnterminatedString)
}

/// Tokenize a command line.
///
/// Collects every error rather than stopping at the first one.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<Token>>, Vec<Spanned<LexerError>>> {
    let lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, span) in lexer.spanned() {
        match result {
            Ok(token) => tokens.push(Spanned::new(token, span)),
            Err(err) => errors.push(Spanned::new(err, span)),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Parse a double-quoted string literal, processing escape sequences.
pub fn parse_string_literal(source: &str) -> Result<String, LexerError> {
    if source.len() < 2 || !source.starts_with('"') || !source.ends_with('"') {
        return Err(LexerError::UnterminatedString);
    }

    let inner = &source[1..source.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                // Unknown escapes: preserve the backslash (for regex patterns like `\.`)
                Some(next) => {
                    result.push('\\');
                    result.push(next);
                }
                None => return Err(LexerError::InvalidEscape),
            }
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
