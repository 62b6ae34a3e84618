//! Reader: turns the token stream into s-expressions.

use tuplet_ast::{Atom, SExp, Span};
use tuplet_lexer::{Lexer, Token, TokenKind};

use crate::{ParseError, ParseResult};

/// Read every datum in `source`.
pub fn read(source: &str) -> ParseResult<Vec<SExp>> {
    let tokens = lex(source)?;
    let mut reader = Reader::new(tokens);
    let mut data = Vec::new();
    while !reader.is_at_end() {
        data.push(reader.datum()?);
    }
    Ok(data)
}

/// Read exactly one datum from `source`.
pub fn read_one(source: &str) -> ParseResult<SExp> {
    let tokens = lex(source)?;
    let mut reader = Reader::new(tokens);
    if reader.is_at_end() {
        return Err(ParseError::UnexpectedEof {
            expected: "a datum".to_string(),
        });
    }
    let datum = reader.datum()?;
    if let Some(extra) = reader.peek() {
        return Err(ParseError::TrailingInput { span: extra.span });
    }
    Ok(datum)
}

fn lex(source: &str) -> ParseResult<Vec<Token>> {
    let (tokens, errors) = Lexer::new(source).tokenize_filtered();
    if let Some(error) = errors.into_iter().next() {
        let span = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Error)
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(error.position(), error.position() + 1));
        return Err(ParseError::Lex { error, span });
    }
    Ok(tokens)
}

struct Reader {
    tokens: Vec<Token>,
    pos: usize,
}

impl Reader {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn datum(&mut self) -> ParseResult<SExp> {
        let token = self.advance().ok_or_else(|| ParseError::UnexpectedEof {
            expected: "a datum".to_string(),
        })?;

        let span = token.span;
        let atom = match token.kind {
            TokenKind::LParen => return self.list(span),
            TokenKind::RParen => return Err(ParseError::UnexpectedCloseParen { span }),
            TokenKind::Quote => return Err(ParseError::QuoteNotSupported { span }),
            TokenKind::Bool(b) => Atom::Bool(b),
            TokenKind::Number(n) => Atom::Number(n),
            TokenKind::String(s) => Atom::String(s),
            TokenKind::Symbol(s) => Atom::Symbol(s),
            // Filtered or already reported by `lex`
            TokenKind::LineComment(_) | TokenKind::Error => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a datum".to_string(),
                })
            }
        };
        Ok(SExp::Atom(atom, span))
    }

    fn list(&mut self, open: Span) -> ParseResult<SExp> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedParen { open_span: open }),
                Some(Token {
                    kind: TokenKind::RParen,
                    span,
                }) => {
                    let close = *span;
                    self.pos += 1;
                    return Ok(SExp::List(items, open.merge(close)));
                }
                Some(_) => items.push(self.datum()?),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_nested_lists() {
        let sexp = read_one("(a (b c) ())").unwrap();
        assert_eq!(sexp.to_string(), "(a (b c) ())");
        assert_eq!(sexp.span(), Span::new(0, 12));
        let items = sexp.as_list().unwrap();
        assert_eq!(items[1].span(), Span::new(3, 8));
    }

    #[test]
    fn test_read_atoms() {
        let data = read(r#"1 -2.5 #t "hi" foo"#).unwrap();
        assert_eq!(data.len(), 5);
        assert!(matches!(&data[0], SExp::Atom(Atom::Number(n), _) if n == "1"));
        assert!(matches!(&data[1], SExp::Atom(Atom::Number(n), _) if n == "-2.5"));
        assert!(matches!(&data[2], SExp::Atom(Atom::Bool(true), _)));
        assert!(matches!(&data[3], SExp::Atom(Atom::String(s), _) if s == "hi"));
        assert!(data[4].is_symbol("foo"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let data = read("; header\n(x) ; trailing\n").unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_unbalanced_parens() {
        assert_eq!(
            read_one("(a (b)"),
            Err(ParseError::UnclosedParen {
                open_span: Span::new(0, 1)
            })
        );
        assert_eq!(
            read(")"),
            Err(ParseError::UnexpectedCloseParen {
                span: Span::new(0, 1)
            })
        );
    }

    #[test]
    fn test_read_one_rejects_extra_data() {
        assert_eq!(
            read_one("a b"),
            Err(ParseError::TrailingInput {
                span: Span::new(2, 3)
            })
        );
        assert!(matches!(
            read_one("   "),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_quote_is_rejected() {
        assert!(matches!(
            read_one("'(1 2)"),
            Err(ParseError::QuoteNotSupported { .. })
        ));
    }
}
