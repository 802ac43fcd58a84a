//! Rendering diagnostics for people (ariadne) and for tools (JSON).
//!
//! Human output shows the message with its code, a label on the element's
//! source span when one is known, and the resolution trace as notes. JSON
//! output is one object per diagnostic on a single line.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use inject_common::LineIndex;
use inject_model::{Diagnostic, Severity};

/// Output options for rendering diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticOptions {
    pub color: bool,
    pub json: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

impl DiagnosticOptions {
    /// Plain text, for tests and non-terminal output.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }

    pub fn json_mode() -> Self {
        DiagnosticOptions {
            color: false,
            json: true,
        }
    }
}

fn default_code(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "E0000",
        Severity::Warning => "W0000",
    }
}

/// Render one diagnostic. `source` is the text the element spans point into;
/// without it the output falls back to the element's trace text.
pub fn render_diagnostic(
    diagnostic: &Diagnostic,
    source: Option<&str>,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let code = diagnostic.code.unwrap_or_else(|| default_code(diagnostic.severity));
    let range = match (source, diagnostic.element.as_ref().and_then(|e| e.span)) {
        (Some(source), Some(span)) if !source.is_empty() => Some(span.to_range(source.len())),
        _ => None,
    };

    if options.json {
        return render_json(diagnostic, code, source, range, filename);
    }

    match (source, range) {
        (Some(source), Some(range)) => render_report(diagnostic, code, source, range, options),
        _ => render_plain(diagnostic, code, filename),
    }
}

fn render_report(
    diagnostic: &Diagnostic,
    code: &str,
    source: &str,
    range: Range<usize>,
    options: &DiagnosticOptions,
) -> String {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    let label_text = diagnostic
        .element
        .as_ref()
        .map(|e| e.trace.clone())
        .unwrap_or_default();

    let mut report = Report::build(kind, range.clone())
        .with_code(code)
        .with_message(&diagnostic.message)
        .with_config(Config::default().with_color(options.color))
        .with_label(
            Label::new(range)
                .with_message(label_text)
                .with_color(Color::Red),
        );
    if !diagnostic.notes.is_empty() {
        report = report.with_note(diagnostic.notes.join("\n"));
    }

    let mut buf = Vec::new();
    if report.finish().write(Source::from(source), &mut buf).is_err() {
        return render_plain(diagnostic, code, "");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn render_plain(diagnostic: &Diagnostic, code: &str, filename: &str) -> String {
    let mut out = format!("{}[{}]: {}\n", diagnostic.severity, code, diagnostic.message);
    if let Some(element) = &diagnostic.element {
        if filename.is_empty() {
            out.push_str(&format!("  --> {}\n", element.trace));
        } else {
            out.push_str(&format!("  --> {}: {}\n", filename, element.trace));
        }
    }
    for note in &diagnostic.notes {
        out.push_str(&format!("    {}\n", note));
    }
    out
}

fn render_json(
    diagnostic: &Diagnostic,
    code: &str,
    source: Option<&str>,
    range: Option<Range<usize>>,
    filename: &str,
) -> String {
    let label = diagnostic
        .element
        .as_ref()
        .map(|e| e.trace.clone())
        .unwrap_or_default();
    let spans = match (source, range) {
        (Some(source), Some(range)) => {
            let index = LineIndex::new(source);
            let (line, column) = index.line_col(range.start as u32);
            serde_json::json!([{
                "start": range.start,
                "end": range.end,
                "line": line,
                "column": column,
                "label": label,
            }])
        }
        _ => serde_json::json!([]),
    };
    serde_json::json!({
        "code": code,
        "severity": diagnostic.severity,
        "message": diagnostic.message,
        "element": label,
        "trace": diagnostic.notes,
        "file": filename,
        "spans": spans,
        "fix": null,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inject_common::Span;
    use inject_model::{Element, ElementKind};

    fn no_binding() -> Diagnostic {
        let element = Element::new(
            ElementKind::Method,
            "com.example.MyComponent.foo",
            "com.example.MyComponent.foo: com.example.Foo",
        )
        .with_span(Some(Span::new(44, 57)));
        Diagnostic::error(
            "Cannot find an @Inject constructor or provider for: com.example.Foo",
            Some(element),
        )
        .with_code("E0002")
        .with_notes(vec!["com.example.MyComponent.foo: com.example.Foo".to_string()])
    }

    #[test]
    fn plain_without_source() {
        let output = render_diagnostic(&no_binding(), None, "Component.kt", &DiagnosticOptions::colorless());
        insta::assert_snapshot!(output, @r"
        error[E0002]: Cannot find an @Inject constructor or provider for: com.example.Foo
          --> Component.kt: com.example.MyComponent.foo: com.example.Foo
            com.example.MyComponent.foo: com.example.Foo
        ");
    }

    #[test]
    fn report_with_source_labels_the_span() {
        let source = "abstract class MyComponent {\n    abstract val foo: Foo\n}\n";
        let output = render_diagnostic(
            &no_binding(),
            Some(source),
            "Component.kt",
            &DiagnosticOptions::colorless(),
        );
        assert!(output.contains("[E0002]"), "missing code: {}", output);
        assert!(output.contains("Cannot find an @Inject constructor"), "{}", output);
        assert!(output.contains("abstract val foo: Foo"), "missing source line: {}", output);
    }

    #[test]
    fn json_is_one_line() {
        let source = "abstract class MyComponent {\n    abstract val foo: Foo\n}\n";
        let output = render_diagnostic(
            &no_binding(),
            Some(source),
            "Component.kt",
            &DiagnosticOptions::json_mode(),
        );
        assert!(!output.contains('\n'), "JSON output should be one line: {}", output);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["code"], "E0002");
        assert_eq!(parsed["severity"], "error");
        assert_eq!(parsed["spans"][0]["line"], 2);
        assert_eq!(parsed["spans"][0]["column"], 16);
        assert_eq!(parsed["trace"].as_array().unwrap().len(), 1);
    }
}
