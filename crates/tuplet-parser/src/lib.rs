//! Tuplet Language Parser
//!
//! Three stages, each usable on its own:
//!
//! 1. [`reader`]: tokens to s-expressions
//! 2. [`texp`]: s-expressions to type expressions
//! 3. [`builder`]: s-expressions to the typed AST
//!
//! The builder validates the shape of special forms but never types
//! anything; that is the checker's job.

pub mod builder;
pub mod reader;
pub mod texp;

use thiserror::Error;
use tuplet_ast::{Expr, Form, Parsed, Program, Span};
use tuplet_lexer::LexerError;

pub use builder::AstBuilder;
pub use reader::{read, read_one};
pub use texp::{parse_texp, parse_texp_str};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{error}")]
    Lex { error: LexerError, span: Span },

    #[error("Unexpected ')' at position {}", .span.start)]
    UnexpectedCloseParen { span: Span },

    #[error("Unclosed '(' opened at position {}", .open_span.start)]
    UnclosedParen { open_span: Span },

    #[error("Unexpected end of input - expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Unexpected input after the first datum at position {}", .span.start)]
    TrailingInput { span: Span },

    #[error("Quoted literals are not supported (position {})", .span.start)]
    QuoteNotSupported { span: Span },

    #[error("Invalid number literal `{text}`")]
    InvalidNumber { text: String, span: Span },

    #[error("Invalid type expression `{found}`: {hint}")]
    InvalidType {
        found: String,
        hint: String,
        span: Span,
    },

    #[error("Invalid expression `{found}`: {hint}")]
    InvalidExpression {
        found: String,
        hint: String,
        span: Span,
    },

    #[error("Invalid declaration `{found}`: expected `name` or `(name : type)`")]
    InvalidDeclaration { found: String, span: Span },

    #[error("`{name}` is reserved and cannot be bound")]
    ReservedName { name: String, span: Span },

    #[error("`define` is only allowed at the top level")]
    DefineNotAllowed { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex { span, .. }
            | ParseError::UnexpectedCloseParen { span }
            | ParseError::TrailingInput { span }
            | ParseError::QuoteNotSupported { span }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidType { span, .. }
            | ParseError::InvalidExpression { span, .. }
            | ParseError::InvalidDeclaration { span, .. }
            | ParseError::ReservedName { span, .. }
            | ParseError::DefineNotAllowed { span } => *span,
            ParseError::UnclosedParen { open_span } => *open_span,
            ParseError::UnexpectedEof { .. } => Span::dummy(),
        }
    }
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse source holding exactly one datum: a `(program ...)` or a single form.
pub fn parse(source: &str) -> ParseResult<Parsed> {
    let sexp = read_one(source)?;
    AstBuilder::for_data([&sexp]).build_parsed(&sexp)
}

/// Parse source holding exactly one expression (no `define`, no `program`).
pub fn parse_expr(source: &str) -> ParseResult<Expr> {
    let sexp = read_one(source)?;
    AstBuilder::for_data([&sexp]).build_expr(&sexp)
}

/// Parse a single top-level form.
pub fn parse_form(source: &str) -> ParseResult<Form> {
    let sexp = read_one(source)?;
    AstBuilder::for_data([&sexp]).build_form(&sexp)
}

/// Parse a whole program.
///
/// Accepts either one `(program form ...)` datum or a bare sequence of
/// top-level forms, which is how source files are usually written.
pub fn parse_program(source: &str) -> ParseResult<Program> {
    let data = read(source)?;
    let mut builder = AstBuilder::for_data(&data);
    if let [single] = data.as_slice() {
        if builder::is_program(single) {
            return builder.build_program(single);
        }
    }
    let forms = data
        .iter()
        .map(|sexp| builder.build_form(sexp))
        .collect::<ParseResult<Vec<_>>>()?;
    let span = match (data.first(), data.last()) {
        (Some(first), Some(last)) => first.span().merge(last.span()),
        _ => Span::new(0, source.len()),
    };
    Ok(Program { forms, span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuplet_ast::{ExprKind, PrimOp};

    #[test]
    fn test_parse_single_expression() {
        let expr = parse_expr("(values 1 2)").unwrap();
        match expr.kind {
            ExprKind::App { rator, rands } => {
                assert_eq!(rator.kind, ExprKind::PrimOp(PrimOp::Values));
                assert_eq!(rands.len(), 2);
            }
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_distinguishes_program_and_form() {
        assert!(matches!(
            parse("(program (define x 1) x)"),
            Ok(Parsed::Program(_))
        ));
        assert!(matches!(
            parse("(define (x : number) 1)"),
            Ok(Parsed::Form(Form::Define(_)))
        ));
        assert!(matches!(parse("x"), Ok(Parsed::Form(Form::Expr(_)))));
    }

    #[test]
    fn test_parse_program_from_bare_forms() {
        let program = parse_program("(define (x : number) 7)\n(+ x 1)").unwrap();
        assert_eq!(program.forms.len(), 2);
        assert!(matches!(program.forms[0], Form::Define(_)));
    }

    #[test]
    fn test_parse_expr_rejects_define() {
        assert!(matches!(
            parse_expr("(define x 1)"),
            Err(ParseError::DefineNotAllowed { .. })
        ));
    }

    #[test]
    fn test_lexer_errors_surface() {
        assert!(matches!(parse_expr("(+ 1 \"abc)"), Err(ParseError::Lex { .. })));
    }
}
