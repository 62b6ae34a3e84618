//! Tuplet Diagnostics - the error reporting model shared by the Tuplet tools.
//!
//! - `Diagnostic` - code, severity, message, labelled spans and child notes
//! - `DiagnosticSeverity` - Error, Warning, Note and Help levels
//! - `ErrorCodeRegistry` - the catalogue of stable error codes
//! - [`render`] - plain-text rendering, used for snapshots and `--message-format short`
//!
//! Terminal rendering with colours lives in the CLI, which feeds these
//! diagnostics to `ariadne`.
//!
//! # Example
//!
//! ```rust
//! use tuplet_diagnostics::{Diagnostic, DiagnosticSeverity};
//! use tuplet_diagnostics::span::SourceSpan;
//!
//! let span = SourceSpan::new("main.tpl", 4, 9);
//! let diagnostic = Diagnostic::error("E0001", "Incompatible types: number and boolean in #t")
//!     .with_primary_span(span, "this has type `boolean`")
//!     .with_child(Diagnostic::note("types are compatible only when structurally equal"));
//!
//! assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
//! assert_eq!(diagnostic.code.as_deref(), Some("E0001"));
//! ```

pub mod render;
pub mod span;

use span::{MultiSpan, SourceSpan};
use std::collections::BTreeMap;
use thiserror::Error;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagnosticSeverity {
    /// Rejects the program.
    #[default]
    Error,
    Warning,
    /// Informational, attached to another diagnostic.
    Note,
    /// A suggestion for fixing the problem.
    Help,
}

impl DiagnosticSeverity {
    /// Returns the text prefix for this severity level.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Note => "note",
            DiagnosticSeverity::Help => "help",
        }
    }

    /// Returns the underline character used by the plain renderer.
    pub fn underline_char(&self) -> char {
        match self {
            DiagnosticSeverity::Error => '^',
            DiagnosticSeverity::Warning => '~',
            DiagnosticSeverity::Note => '-',
            DiagnosticSeverity::Help => '+',
        }
    }

    /// Returns true if this severity level rejects the program.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiagnosticSeverity::Error)
    }
}

/// A diagnostic produced by the parser, the type checker or the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The error code (e.g., "E0001").
    pub code: Option<String>,
    pub severity: DiagnosticSeverity,
    /// The main message. For type errors this is the checker's failure text.
    pub message: String,
    /// Source locations related to this diagnostic.
    pub spans: MultiSpan,
    /// Attached notes and help messages.
    pub children: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(
        severity: DiagnosticSeverity,
        code: impl Into<Option<String>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            spans: MultiSpan::new(),
            children: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, Some(code.into()), message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, Some(code.into()), message)
    }

    /// Creates a note diagnostic (usually attached to another diagnostic).
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Note, None::<String>, message)
    }

    /// Creates a help diagnostic.
    pub fn help(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Help, None::<String>, message)
    }

    /// Adds a primary span with a label message.
    pub fn with_primary_span(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.spans.push_primary(span, message);
        self
    }

    /// Adds a secondary span with a label message.
    pub fn with_secondary_span(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.spans.push_secondary(span, message);
        self
    }

    /// Adds a child diagnostic (note or help).
    pub fn with_child(mut self, child: Diagnostic) -> Self {
        self.children.push(child);
        self
    }

    /// Points every span of this diagnostic and its children at `file`.
    ///
    /// Diagnostics are built before the caller knows which file the source
    /// came from; the CLI fills it in afterwards.
    pub fn in_file(mut self, file: &str) -> Self {
        self.spans.set_file(file);
        self.children = self
            .children
            .into_iter()
            .map(|child| child.in_file(file))
            .collect();
        self
    }

    /// Returns true if this diagnostic has any spans.
    pub fn has_spans(&self) -> bool {
        !self.spans.is_empty()
    }

    /// The primary span, if any.
    pub fn primary_span(&self) -> Option<&SourceSpan> {
        self.spans.primary_span()
    }
}

/// Error categories, keyed by the first digit of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// E0XXX: type errors
    Type,
    /// E1XXX: names and scope
    Naming,
    /// E3XXX: syntax
    Syntax,
    /// E4XXX: evaluation
    Runtime,
    /// E9XXX: internal errors
    Internal,
}

impl ErrorCategory {
    /// Creates a category from an error code.
    pub fn from_code(code: &str) -> Option<Self> {
        if !code.starts_with('E') || code.len() != 5 {
            return None;
        }
        match code.chars().nth(1)? {
            '0' => Some(ErrorCategory::Type),
            '1' => Some(ErrorCategory::Naming),
            '3' => Some(ErrorCategory::Syntax),
            '4' => Some(ErrorCategory::Runtime),
            '9' => Some(ErrorCategory::Internal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::Type => "Type",
            ErrorCategory::Naming => "Naming/Scope",
            ErrorCategory::Syntax => "Syntax",
            ErrorCategory::Runtime => "Runtime",
            ErrorCategory::Internal => "Internal",
        }
    }
}

/// Information about a registered error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    pub code: String,
    pub category: ErrorCategory,
    /// One-line description, shown by `tuplet explain`.
    pub description: String,
}

impl ErrorCodeInfo {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Option<Self> {
        let code = code.into();
        let category = ErrorCategory::from_code(&code)?;
        Some(Self {
            code,
            category,
            description: description.into(),
        })
    }
}

/// Registry of all known error codes.
#[derive(Debug, Default)]
pub struct ErrorCodeRegistry {
    codes: BTreeMap<String, ErrorCodeInfo>,
}

impl ErrorCodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every code the Tuplet tools emit.
    pub fn with_standard_codes() -> Self {
        let mut registry = Self::new();

        // E0XXX: type errors
        registry.register("E0001", "incompatible types");
        registry.register("E0002", "application of a non-procedure");
        registry.register("E0003", "wrong number of arguments");
        registry.register("E0004", "let-values value is not a tuple");
        registry.register("E0005", "let-values arity mismatch");
        registry.register("E0006", "letrec binds a non-procedure");

        // E1XXX: naming errors
        registry.register("E1001", "unbound variable");
        registry.register("E1002", "primitive has no type");

        // E3XXX: syntax errors
        registry.register("E3001", "malformed source text");
        registry.register("E3002", "malformed special form");
        registry.register("E3003", "malformed type expression");

        // E4XXX: evaluation errors
        registry.register("E4001", "runtime error");

        registry
    }

    /// Registers a new error code. Returns false for a malformed code.
    pub fn register(&mut self, code: impl Into<String>, description: impl Into<String>) -> bool {
        let code = code.into();
        if let Some(info) = ErrorCodeInfo::new(code.clone(), description) {
            self.codes.insert(code, info);
            true
        } else {
            false
        }
    }

    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    /// Like [`get`](Self::get), but unknown codes are an error.
    pub fn explain(&self, code: &str) -> DiagnosticResult<&ErrorCodeInfo> {
        if ErrorCategory::from_code(code).is_none() {
            return Err(DiagnosticError::InvalidErrorCode(code.to_string()));
        }
        self.get(code)
            .ok_or_else(|| DiagnosticError::UnknownErrorCode(code.to_string()))
    }

    /// All registered codes, in code order.
    pub fn all_codes(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }

    pub fn codes_in_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values().filter(move |info| info.category == category)
    }
}

/// Result type for diagnostic operations.
pub type DiagnosticResult<T> = Result<T, DiagnosticError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticError {
    #[error("invalid error code: {0}")]
    InvalidErrorCode(String),

    #[error("no such error code: {0}")]
    UnknownErrorCode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_severity() {
        assert_eq!(DiagnosticSeverity::Error.prefix(), "error");
        assert_eq!(DiagnosticSeverity::Help.prefix(), "help");
        assert!(DiagnosticSeverity::Error.is_fatal());
        assert!(!DiagnosticSeverity::Note.is_fatal());
    }

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error("E0003", "Wrong parameter numbers passed to proc: (f 1)")
            .with_primary_span(SourceSpan::anonymous(0, 5), "called with 1 argument")
            .with_secondary_span(SourceSpan::anonymous(10, 12), "declared here")
            .with_child(Diagnostic::note("`f` takes 2 arguments"));

        assert!(diag.has_spans());
        assert_eq!(diag.primary_span(), Some(&SourceSpan::anonymous(0, 5)));
        assert_eq!(diag.spans.labels().len(), 2);
        assert_eq!(diag.children.len(), 1);
    }

    #[test]
    fn test_in_file_rewrites_every_span() {
        let diag = Diagnostic::error("E1001", "Var not found: x")
            .with_primary_span(SourceSpan::anonymous(3, 4), "not in scope");
        let diag = diag.in_file("prog.tpl");
        assert_eq!(
            diag.primary_span().map(|s| s.file.to_string_lossy().into_owned()),
            Some("prog.tpl".to_string())
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(ErrorCategory::from_code("E0001"), Some(ErrorCategory::Type));
        assert_eq!(ErrorCategory::from_code("E1002"), Some(ErrorCategory::Naming));
        assert_eq!(ErrorCategory::from_code("E2001"), None);
        assert_eq!(ErrorCategory::from_code("E01"), None);
        assert_eq!(ErrorCategory::from_code("oops!"), None);
    }

    #[test]
    fn test_registry_explain() {
        let registry = ErrorCodeRegistry::with_standard_codes();
        assert_eq!(
            registry.explain("E0004").map(|info| info.description.as_str()),
            Ok("let-values value is not a tuple")
        );
        assert_eq!(
            registry.explain("E0999"),
            Err(DiagnosticError::UnknownErrorCode("E0999".to_string()))
        );
        assert_eq!(
            registry.explain("bogus"),
            Err(DiagnosticError::InvalidErrorCode("bogus".to_string()))
        );
        assert_eq!(registry.codes_in_category(ErrorCategory::Type).count(), 6);
    }
}
