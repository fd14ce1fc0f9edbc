//! Diagnostic rendering.
//!
//! The human format follows the familiar two-line shape:
//!
//! ```text
//! error[E0100]: expected `int`, found `float`
//!   --> main.qsr:3:14
//! ```
//!
//! `--json` mode serializes the diagnostic list instead, for editors and
//! scripts; the stable codes make that output safe to match on.

use crate::style::Style;
use quasar_base::{Diagnostic, Severity};

/// Renders one diagnostic in the human format.
pub fn render_diagnostic(diagnostic: &Diagnostic, color: bool) -> String {
    let label = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let header_text = format!("{}[{}]", label, diagnostic.code.as_str());
    let header = if color {
        match diagnostic.severity {
            Severity::Error => Style::bold_red(&header_text),
            Severity::Warning => Style::bold_yellow(&header_text),
        }
    } else {
        header_text
    };

    let location = format!("{}", diagnostic.span);
    let arrow = if color {
        Style::blue("  -->")
    } else {
        "  -->".to_string()
    };
    format!(
        "{}: {}\n{} {}\n",
        header, diagnostic.message, arrow, location
    )
}

/// Renders a batch of diagnostics, one after another.
pub fn render_all(diagnostics: &[Diagnostic], color: bool) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| render_diagnostic(diagnostic, color))
        .collect()
}

/// Serializes diagnostics as pretty-printed JSON.
pub fn render_json(diagnostics: &[Diagnostic]) -> String {
    serde_json::to_string_pretty(diagnostics)
        .unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_base::{DiagnosticCode, Span};
    use std::sync::Arc;

    fn sample() -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::TypeMismatch,
            "expected `int`, found `float`",
            Span::new(3, 14, 3, 18).in_file(Arc::from("main.qsr")),
        )
    }

    #[test]
    fn human_format_has_code_and_location() {
        let text = render_diagnostic(&sample(), false);
        assert!(text.starts_with("error[E0100]:"));
        assert!(text.contains("main.qsr:3:14"));
    }

    #[test]
    fn warnings_are_labelled_as_warnings() {
        let warning = Diagnostic::new(
            DiagnosticCode::CircularImport,
            "circular import of `a.qsr`",
            Span::default(),
        );
        let text = render_diagnostic(&warning, false);
        assert!(text.starts_with("warning[E0902]:"));
    }

    #[test]
    fn json_format_round_trips_the_code() {
        let json = render_json(&[sample()]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["code"], "E0100");
        assert_eq!(parsed[0]["span"]["start_line"], 3);
    }

    #[test]
    fn color_mode_wraps_the_header() {
        let text = render_diagnostic(&sample(), true);
        assert!(text.contains("\x1b[31m"));
    }
}
