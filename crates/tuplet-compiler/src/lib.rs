//! Tuplet Language Driver Library
//!
//! Source-text entry points over the parser, the type checker and the
//! evaluator. The `tuplet` binary is a thin layer over this crate.

use thiserror::Error;
use tracing::debug;
use tuplet_ast::{Span, TExp};
use tuplet_diagnostics::span::SourceSpan;
use tuplet_diagnostics::Diagnostic;
use tuplet_interpreter::{Interpreter, RuntimeError, Value};
use tuplet_parser::ParseError;
use tuplet_types::{CheckerConfig, TypeChecker, TypeError};

/// Errors that can occur while processing source text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl CompileError {
    /// The location of the error. End-of-input parse errors have none.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Parse(ParseError::UnexpectedEof { .. }) => None,
            CompileError::Parse(e) => Some(e.span()),
            CompileError::Type(e) => Some(e.span()),
            CompileError::Runtime(e) => Some(e.span()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Parse(e) => parse_error_code(e),
            CompileError::Type(e) => e.code(),
            CompileError::Runtime(_) => "E4001",
        }
    }

    /// Convert into a structured diagnostic with anonymous spans.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Type(e) => e.to_diagnostic(),
            CompileError::Parse(e) => parse_diagnostic(e),
            CompileError::Runtime(e) => runtime_diagnostic(e),
        }
    }
}

/// Result type for driver operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Options for checking and running programs
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub checker: CheckerConfig,
    /// Type-check before evaluating. Off runs the program unchecked.
    pub type_check: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            checker: CheckerConfig::default(),
            type_check: true,
        }
    }
}

/// Parse one datum (an expression, a top-level form or a `(program ...)`)
/// and type it against the empty environment. Returns the rendered type;
/// on failure the error's `Display` is the failure message.
pub fn typeof_source(source: &str) -> CompileResult<String> {
    typeof_source_with(source, &CheckerConfig::default()).map(|te| te.to_string())
}

pub fn typeof_source_with(source: &str, config: &CheckerConfig) -> CompileResult<TExp> {
    let parsed = tuplet_parser::parse(source)?;
    let checker = TypeChecker::with_config(config.clone());
    Ok(checker.check_parsed(&parsed)?)
}

/// Type-check a source file: either one `(program ...)` datum or a
/// sequence of top-level forms.
pub fn check_source(source: &str, config: &CheckerConfig) -> CompileResult<TExp> {
    let program = tuplet_parser::parse_program(source)?;
    debug!(forms = program.forms.len(), "parsed program");
    let checker = TypeChecker::with_config(config.clone());
    Ok(checker.check_program(&program)?)
}

/// Parse, optionally type-check, and evaluate a source file with
/// `interpreter`. Text written by the program stays in the interpreter's
/// output buffer, including when evaluation fails part way.
pub fn run_source(
    source: &str,
    options: &CompileOptions,
    interpreter: &mut Interpreter,
) -> CompileResult<Value> {
    let program = tuplet_parser::parse_program(source)?;
    if options.type_check {
        let te = TypeChecker::with_config(options.checker.clone()).check_program(&program)?;
        debug!(program_type = %te, "type check passed");
    }
    Ok(interpreter.run(&program)?)
}

// ============================================================================
// Diagnostics for parse and runtime errors
// ============================================================================

fn parse_error_code(error: &ParseError) -> &'static str {
    match error {
        ParseError::InvalidType { .. } => "E3003",
        ParseError::InvalidExpression { .. }
        | ParseError::InvalidDeclaration { .. }
        | ParseError::ReservedName { .. }
        | ParseError::DefineNotAllowed { .. } => "E3002",
        ParseError::Lex { .. }
        | ParseError::UnexpectedCloseParen { .. }
        | ParseError::UnclosedParen { .. }
        | ParseError::UnexpectedEof { .. }
        | ParseError::TrailingInput { .. }
        | ParseError::QuoteNotSupported { .. }
        | ParseError::InvalidNumber { .. } => "E3001",
    }
}

fn parse_diagnostic(error: &ParseError) -> Diagnostic {
    let diag = Diagnostic::error(parse_error_code(error), error.to_string());
    let span = to_source_span(error.span());
    match error {
        ParseError::UnexpectedEof { .. } => diag,
        ParseError::Lex { .. } => diag.with_primary_span(span, "invalid token"),
        ParseError::UnexpectedCloseParen { .. } => diag.with_primary_span(span, "no matching `(`"),
        ParseError::UnclosedParen { .. } => diag.with_primary_span(span, "this `(` is never closed"),
        ParseError::TrailingInput { .. } => diag
            .with_primary_span(span, "expected end of input")
            .with_child(Diagnostic::help(
                "wrap several forms in `(program ...)` to check them together",
            )),
        ParseError::QuoteNotSupported { .. } => diag.with_primary_span(span, "quote is not supported"),
        ParseError::InvalidNumber { .. } => diag.with_primary_span(span, "not a number"),
        ParseError::InvalidType { .. } => diag
            .with_primary_span(span, "malformed type")
            .with_child(Diagnostic::help(
                "types are atomic names, tuples like `(number * string)` and procedures like `(number * string -> boolean)`; write `(Empty -> t)` for no parameters",
            )),
        ParseError::InvalidExpression { .. } => diag.with_primary_span(span, "malformed special form"),
        ParseError::InvalidDeclaration { .. } => diag.with_primary_span(span, "invalid declaration"),
        ParseError::ReservedName { .. } => diag.with_primary_span(span, "reserved name"),
        ParseError::DefineNotAllowed { .. } => diag
            .with_primary_span(span, "nested define")
            .with_child(Diagnostic::help("move the define to the top level of the program")),
    }
}

fn runtime_diagnostic(error: &RuntimeError) -> Diagnostic {
    let diag = Diagnostic::error("E4001", error.to_string())
        .with_primary_span(to_source_span(error.span()), "error raised while evaluating this");
    match error {
        RuntimeError::NotATuple { .. } => {
            diag.with_child(Diagnostic::help("produce multiple values with `(values ...)`"))
        }
        RuntimeError::Unassigned { .. } => diag.with_child(Diagnostic::note(
            "letrec bindings cannot read each other before they are computed",
        )),
        _ => diag,
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::anonymous(span.start, span.end)
}
