//! Source spans and labels for diagnostics.

use std::path::PathBuf;

/// A byte range in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub file: PathBuf,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl SourceSpan {
    pub fn new(file: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    /// A span whose file is not known yet. See [`Diagnostic::in_file`](crate::Diagnostic::in_file).
    pub fn anonymous(start: usize, end: usize) -> Self {
        Self::new("<input>", start, end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if this span contains the given byte offset.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelStyle {
    #[default]
    Primary,
    Secondary,
}

/// A message attached to a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn primary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// The spans of one diagnostic: a primary location plus any labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSpan {
    primary: Option<SourceSpan>,
    labels: Vec<Label>,
}

impl MultiSpan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_span(&self) -> Option<&SourceSpan> {
        self.primary.as_ref()
    }

    /// Adds a primary label. The first one becomes the primary span.
    pub fn push_primary(&mut self, span: SourceSpan, message: impl Into<String>) {
        if self.primary.is_none() {
            self.primary = Some(span.clone());
        }
        self.labels.push(Label::primary(span, message));
    }

    pub fn push_secondary(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.labels.push(Label::secondary(span, message));
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.labels.is_empty()
    }

    pub(crate) fn set_file(&mut self, file: &str) {
        if let Some(primary) = &mut self.primary {
            primary.file = PathBuf::from(file);
        }
        for label in &mut self.labels {
            label.span.file = PathBuf::from(file);
        }
    }
}

/// 1-indexed line and column (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset in `source`. Offsets past the end clamp to it.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}
