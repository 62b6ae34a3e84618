//! Type compatibility.

use std::fmt;

use tuplet_ast::{DefineDecl, Expr, Span, TExp};

use crate::{TypeError, TypeResult};

/// A node a type error can be reported against: rendered through the
/// un-parser and located by its span.
pub trait Blame: fmt::Display {
    fn blame_span(&self) -> Span;
}

impl Blame for Expr {
    fn blame_span(&self) -> Span {
        self.span
    }
}

impl Blame for DefineDecl {
    fn blame_span(&self) -> Span {
        self.span
    }
}

/// Succeeds iff `left` and `right` are structurally identical.
///
/// `context` only feeds the error message. Argument order is part of the
/// message, so callers pass the pair in a fixed order per rule.
pub fn check_equal_type<C: Blame + ?Sized>(left: &TExp, right: &TExp, context: &C) -> TypeResult<()> {
    if left == right {
        return Ok(());
    }
    Err(TypeError::Mismatch {
        left: left.to_string(),
        right: right.to_string(),
        context: context.to_string(),
        span: context.blame_span(),
    })
}
