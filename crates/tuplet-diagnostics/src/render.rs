//! Plain-text rendering of diagnostics.
//!
//! The output mimics the familiar rustc layout without colours, so it is
//! stable enough to snapshot:
//!
//! ```text
//! error[E0001]: Incompatible types: boolean and number in 1
//!  --> prog.tpl:1:5
//!   |
//! 1 | (if 1 2 3)
//!   |     ^ expected `boolean`
//!   |
//!   = note: ...
//! ```

use std::fmt::Write;

use crate::span::{Label, LabelStyle, LineColumn};
use crate::Diagnostic;

/// Render a diagnostic with source excerpts.
pub fn render_plain(diagnostic: &Diagnostic, source: &str) -> String {
    let mut out = String::new();
    write_header(&mut out, diagnostic);

    if let Some(primary) = diagnostic.primary_span() {
        let pos = LineColumn::locate(source, primary.start);
        let gutter = gutter_width(diagnostic, source);
        let _ = writeln!(
            out,
            "{:>width$}--> {}:{}:{}",
            "",
            primary.file.display(),
            pos.line,
            pos.column,
            width = gutter
        );
        let _ = writeln!(out, "{:>width$} |", "", width = gutter);
        for label in diagnostic.spans.labels() {
            write_label(&mut out, label, diagnostic, source, gutter);
        }
        if !diagnostic.children.is_empty() {
            let _ = writeln!(out, "{:>width$} |", "", width = gutter);
        }
        for child in &diagnostic.children {
            let _ = writeln!(
                out,
                "{:>width$} = {}: {}",
                "",
                child.severity.prefix(),
                child.message,
                width = gutter
            );
        }
    } else {
        for child in &diagnostic.children {
            let _ = writeln!(out, " = {}: {}", child.severity.prefix(), child.message);
        }
    }
    out
}

/// One line per diagnostic: `file:line:col: error[CODE]: message`.
pub fn render_short(diagnostic: &Diagnostic, source: &str) -> String {
    let mut out = String::new();
    if let Some(primary) = diagnostic.primary_span() {
        let pos = LineColumn::locate(source, primary.start);
        let _ = write!(out, "{}:{}:{}: ", primary.file.display(), pos.line, pos.column);
    }
    write_header(&mut out, diagnostic);
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_header(out: &mut String, diagnostic: &Diagnostic) {
    let _ = write!(out, "{}", diagnostic.severity.prefix());
    if let Some(code) = &diagnostic.code {
        let _ = write!(out, "[{}]", code);
    }
    let _ = writeln!(out, ": {}", diagnostic.message);
}

fn gutter_width(diagnostic: &Diagnostic, source: &str) -> usize {
    diagnostic
        .spans
        .labels()
        .iter()
        .map(|label| LineColumn::locate(source, label.span.start).line)
        .max()
        .unwrap_or(1)
        .to_string()
        .len()
}

fn write_label(out: &mut String, label: &Label, diagnostic: &Diagnostic, source: &str, gutter: usize) {
    let start = LineColumn::locate(source, label.span.start);
    let line_text = source.lines().nth(start.line - 1).unwrap_or("");
    let _ = writeln!(out, "{:>width$} | {}", start.line, line_text, width = gutter);

    // Underline to the end of the span or of the first line, whichever is first
    let line_chars = line_text.chars().count();
    let span_chars = source
        .get(label.span.start..label.span.end.min(source.len()))
        .map(|text| text.chars().count())
        .unwrap_or(0);
    let available = line_chars.saturating_sub(start.column - 1);
    let width = span_chars.min(available).max(1);

    let marker = match label.style {
        LabelStyle::Primary => diagnostic.severity.underline_char(),
        LabelStyle::Secondary => '-',
    };
    let underline: String = std::iter::repeat(marker).take(width).collect();
    let _ = write!(
        out,
        "{:>width$} | {:>pad$}{}",
        "",
        "",
        underline,
        width = gutter,
        pad = start.column - 1
    );
    if label.message.is_empty() {
        out.push('\n');
    } else {
        let _ = writeln!(out, " {}", label.message);
    }
}
