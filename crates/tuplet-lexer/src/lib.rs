//! Tuplet Language Lexer
//!
//! Tokenizes Tuplet source code. The surface syntax is s-expression based, so
//! the token set is small: parentheses, literals, symbols and comments.
//! Uses the `logos` crate for efficient lexing.

use logos::Logos;
use smol_str::SmolStr;
use std::fmt;
use std::ops::Range;

/// Source span representing a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token with its kind and source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Strip the surrounding quotes and resolve escape sequences.
fn unescape_string(lex: &mut logos::Lexer<TokenKind>) -> Option<SmolStr> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            // Unknown escape: reject the literal
            _ => return None,
        }
    }
    Some(SmolStr::new(out))
}

/// All token types in the Tuplet language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // ========== Delimiters ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    /// Quote prefix. Reserved: quoted literals are not part of the language.
    #[token("'")]
    Quote,

    // ========== Literals ==========
    #[token("#t", |_| true)]
    #[token("#true", |_| true)]
    #[token("#f", |_| false)]
    #[token("#false", |_| false)]
    Bool(bool),

    /// Number literal, integer or decimal, optionally negative
    #[regex(r"-?[0-9]+(?:\.[0-9]+)?", priority = 3, callback = |lex| SmolStr::new(lex.slice()))]
    Number(SmolStr),

    /// String literal (double quotes), escapes already resolved
    #[regex(r#""(?:[^"\\]|\\.)*""#, unescape_string)]
    String(SmolStr),

    // ========== Symbols ==========
    /// Any run of non-delimiter characters: identifiers, operators, `:`, `->`
    #[regex(r##"[^\s()';"#][^\s()';"]*"##, priority = 1, callback = |lex| SmolStr::new(lex.slice()))]
    Symbol(SmolStr),

    // ========== Comments ==========
    /// Line comment
    #[regex(r";[^\n]*", |lex| SmolStr::new(lex.slice()))]
    LineComment(SmolStr),

    // ========== Error ==========
    /// Lexer error - unrecognized character
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Quote => write!(f, "'"),
            TokenKind::Bool(true) => write!(f, "#t"),
            TokenKind::Bool(false) => write!(f, "#f"),
            TokenKind::Number(s) => write!(f, "number `{}`", s),
            TokenKind::String(s) => write!(f, "string {:?}", s.as_str()),
            TokenKind::Symbol(s) => write!(f, "symbol `{}`", s),
            TokenKind::LineComment(_) => write!(f, "comment"),
            TokenKind::Error => write!(f, "error"),
        }
    }
}

impl TokenKind {
    /// Check if this token is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment(_))
    }
}

/// Lexer error type with detailed error messages
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character '{1}' at position {0}")]
    UnexpectedCharacter(usize, char),

    #[error("Unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("Invalid escape sequence in string literal at position {0}")]
    InvalidEscape(usize),
}

impl LexerError {
    pub fn position(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter(pos, _)
            | LexerError::UnterminatedString(pos)
            | LexerError::InvalidEscape(pos) => *pos,
        }
    }
}

/// Lexer for Tuplet source code
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }

    /// Tokenize the entire source into a vector of tokens
    pub fn tokenize(self) -> (Vec<Token>, Vec<LexerError>) {
        let source = self.inner.source();
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        for (result, span) in self.inner.spanned() {
            match result {
                Ok(kind) => tokens.push(Token::new(kind, Span::from(span))),
                Err(()) => {
                    errors.push(classify_error(source, span.clone()));
                    tokens.push(Token::new(TokenKind::Error, Span::from(span)));
                }
            }
        }

        (tokens, errors)
    }

    /// Tokenize, filtering out comments
    pub fn tokenize_filtered(self) -> (Vec<Token>, Vec<LexerError>) {
        let (tokens, errors) = self.tokenize();
        let filtered: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_comment())
            .collect();
        (filtered, errors)
    }
}

/// Work out why logos rejected the input at `span`.
fn classify_error(source: &str, span: Range<usize>) -> LexerError {
    let text = &source[span.clone()];
    if text.starts_with('"') {
        // A quoted run that closes correctly only fails on a bad escape
        if text.len() > 1 && text.ends_with('"') {
            LexerError::InvalidEscape(span.start)
        } else {
            LexerError::UnterminatedString(span.start)
        }
    } else {
        let bad_char = text.chars().next().unwrap_or('?');
        LexerError::UnexpectedCharacter(span.start, bad_char)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = std::result::Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|result| {
            let span = self.inner.span();
            result
                .map(|kind| Token::new(kind, Span::from(span.clone())))
                .map_err(|_| classify_error(self.inner.source(), span))
        })
    }
}
