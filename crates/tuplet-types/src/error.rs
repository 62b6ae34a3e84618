//! Type errors.
//!
//! Every message names the rendered types and the un-parsed expression, so an
//! error is readable without the source at hand.

use thiserror::Error;
use tuplet_ast::Span;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Incompatible types: {left} and {right} in {context}")]
    Mismatch {
        left: String,
        right: String,
        context: String,
        span: Span,
    },

    #[error("Var not found: {name}")]
    UnboundVariable {
        name: String,
        span: Span,
        /// Bound names close to `name`, for a "did you mean" hint
        similar_names: Vec<String>,
    },

    #[error("Unknown primitive {op}")]
    UnknownPrimitive { op: String, span: Span },

    #[error("Application of non-procedure: {found} in {context}")]
    NotAProcedure {
        found: String,
        context: String,
        span: Span,
    },

    #[error("Wrong parameter numbers passed to proc: {context}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        context: String,
        span: Span,
    },

    #[error("Wrong number of values bound: {pattern} and {tuple}")]
    TupleArityMismatch {
        /// The let-values pattern, e.g. `((a : number) (b : string))`
        pattern: String,
        /// The rendered tuple type of the value
        tuple: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("{found} is not a tuple")]
    NotATuple { found: String, span: Span },

    #[error("letrec - only support binding of procedures - {context}")]
    LetrecOnlyProcedures {
        context: String,
        /// The offending binding's value
        binding_span: Span,
        span: Span,
    },
}

impl TypeError {
    /// The span of the expression the error is reported against.
    pub fn span(&self) -> Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::UnboundVariable { span, .. }
            | TypeError::UnknownPrimitive { span, .. }
            | TypeError::NotAProcedure { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::TupleArityMismatch { span, .. }
            | TypeError::NotATuple { span, .. }
            | TypeError::LetrecOnlyProcedures { span, .. } => *span,
        }
    }

    /// Stable diagnostic code, see `tuplet_diagnostics::ErrorCodeRegistry`.
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::Mismatch { .. } => "E0001",
            TypeError::NotAProcedure { .. } => "E0002",
            TypeError::ArityMismatch { .. } => "E0003",
            TypeError::NotATuple { .. } => "E0004",
            TypeError::TupleArityMismatch { .. } => "E0005",
            TypeError::LetrecOnlyProcedures { .. } => "E0006",
            TypeError::UnboundVariable { .. } => "E1001",
            TypeError::UnknownPrimitive { .. } => "E1002",
        }
    }
}

/// Type result
pub type TypeResult<T> = Result<T, TypeError>;
