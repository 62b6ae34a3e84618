//! Conversion from `TypeError` to structured diagnostics.

use tuplet_ast::texp::EMPTY;
use tuplet_ast::{Span, TExp};
use tuplet_diagnostics::span::SourceSpan;
use tuplet_diagnostics::Diagnostic;

use crate::TypeError;

impl TypeError {
    /// Convert this error into a `Diagnostic` carrying its code, labelled
    /// spans and explanatory notes. The message is the error's `Display`.
    ///
    /// Spans are anonymous; callers that know the file name attach it with
    /// `Diagnostic::in_file`.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            TypeError::Mismatch {
                left, right, span, ..
            } => {
                let diag = diag
                    .with_primary_span(
                        to_source_span(span),
                        format!("`{}` is not compatible with `{}`", left, right),
                    )
                    .with_child(Diagnostic::note(
                        "types are compatible only when they are structurally identical",
                    ));
                if is_type_variable(left) || is_type_variable(right) {
                    diag.with_child(Diagnostic::help(
                        "type variables are not instantiated; a type variable only matches itself",
                    ))
                } else {
                    diag
                }
            }

            TypeError::UnboundVariable {
                span,
                similar_names,
                ..
            } => {
                let diag = diag.with_primary_span(to_source_span(span), "not found in this scope");
                match similar_names.as_slice() {
                    [] => diag,
                    [one] => diag.with_child(Diagnostic::help(format!(
                        "a similar name exists: `{}`",
                        one
                    ))),
                    many => {
                        let names = many
                            .iter()
                            .map(|n| format!("`{}`", n))
                            .collect::<Vec<_>>()
                            .join(", ");
                        diag.with_child(Diagnostic::help(format!("similar names exist: {}", names)))
                    }
                }
            }

            TypeError::UnknownPrimitive { op, span } => diag
                .with_primary_span(to_source_span(span), "this primitive has no static type")
                .with_child(Diagnostic::note(format!(
                    "`{}` can run, but programs using it cannot be type checked",
                    op
                ))),

            TypeError::NotAProcedure { found, span, .. } => diag.with_primary_span(
                to_source_span(span),
                format!("the operator has type `{}`", found),
            ),

            TypeError::ArityMismatch {
                expected,
                found,
                span,
                ..
            } => diag.with_primary_span(
                to_source_span(span),
                format!(
                    "expected {} argument{}, found {}",
                    expected,
                    plural(*expected),
                    found
                ),
            ),

            TypeError::TupleArityMismatch {
                expected,
                found,
                span,
                ..
            } => diag
                .with_primary_span(
                    to_source_span(span),
                    format!(
                        "the pattern binds {} name{} but the value has {} element{}",
                        expected,
                        plural(*expected),
                        found,
                        plural(*found)
                    ),
                )
                .with_child(Diagnostic::note(
                    "a let-values pattern must be exactly as wide as its tuple",
                )),

            TypeError::NotATuple { found, span } => diag
                .with_primary_span(to_source_span(span), format!("this has type `{}`", found))
                .with_child(Diagnostic::help("produce multiple values with `(values ...)`")),

            TypeError::LetrecOnlyProcedures {
                span, binding_span, ..
            } => diag
                .with_primary_span(to_source_span(binding_span), "not a lambda")
                .with_secondary_span(to_source_span(span), "in this letrec"),
        }
    }
}

fn to_source_span(span: &Span) -> SourceSpan {
    SourceSpan::anonymous(span.start, span.end)
}

/// A rendered type is a variable when it is neither compound, atomic nor `Empty`.
fn is_type_variable(rendered: &str) -> bool {
    !rendered.starts_with('(')
        && rendered != EMPTY
        && TExp::atomic(rendered).is_none()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tuplet_diagnostics::DiagnosticSeverity;

    #[test]
    fn test_mismatch_diagnostic() {
        let err = TypeError::Mismatch {
            left: "number".into(),
            right: "T".into(),
            context: "(display 1)".into(),
            span: Span::new(0, 11),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code.as_deref(), Some("E0001"));
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.message, "Incompatible types: number and T in (display 1)");
        assert_eq!(diag.primary_span(), Some(&SourceSpan::anonymous(0, 11)));
        assert_eq!(diag.children.len(), 2);
    }

    #[test]
    fn test_unbound_variable_suggestions() {
        let err = TypeError::UnboundVariable {
            name: "lenght".into(),
            span: Span::new(1, 7),
            similar_names: vec!["length".into()],
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code.as_deref(), Some("E1001"));
        assert_eq!(diag.children[0].message, "a similar name exists: `length`");
    }

    #[test]
    fn test_letrec_points_at_binding() {
        let err = TypeError::LetrecOnlyProcedures {
            context: "(letrec ((x 1)) x)".into(),
            binding_span: Span::new(12, 13),
            span: Span::new(0, 18),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.primary_span(), Some(&SourceSpan::anonymous(12, 13)));
        assert_eq!(diag.spans.labels().len(), 2);
    }

    #[test]
    fn test_type_variable_detection() {
        assert!(is_type_variable("T1"));
        assert!(is_type_variable("t"));
        assert!(!is_type_variable("Empty"));
        assert!(!is_type_variable("number"));
        assert!(!is_type_variable("(T -> boolean)"));
    }
}
