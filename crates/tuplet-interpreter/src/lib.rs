//! Tree-walking evaluator for the Tuplet language.
//!
//! Programs are evaluated directly from the AST in applicative order. The
//! evaluator does not rely on the type checker: `values`/`let-values` width
//! and primitive argument kinds are enforced again at run time.

use smol_str::SmolStr;
use thiserror::Error;
use tuplet_ast::Span;

mod builtins;
mod environment;
mod eval;
mod value;

pub use environment::Environment;
pub use eval::Interpreter;
pub use value::{Closure, Value};

/// Runtime errors that can occur during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("unbound variable: {name}")]
    UnboundVariable { name: SmolStr, span: Span },

    #[error("letrec variable used before its value was computed: {name}")]
    Unassigned { name: SmolStr, span: Span },

    #[error("application of non-procedure: {found}")]
    NotAProcedure { found: String, span: Span },

    #[error("{what}: expected {expected}, got {found}")]
    ArityMismatch {
        what: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("{found} is not a tuple")]
    NotATuple { found: String, span: Span },

    #[error("{op}: expected {expected}, got {found}")]
    TypeMismatch {
        op: SmolStr,
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("division by zero")]
    DivisionByZero { span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UnboundVariable { span, .. } => *span,
            RuntimeError::Unassigned { span, .. } => *span,
            RuntimeError::NotAProcedure { span, .. } => *span,
            RuntimeError::ArityMismatch { span, .. } => *span,
            RuntimeError::NotATuple { span, .. } => *span,
            RuntimeError::TypeMismatch { span, .. } => *span,
            RuntimeError::DivisionByZero { span } => *span,
        }
    }
}

/// Result type for interpreter operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
