//! Shared output formatting for lint results.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;
use theme_lint_core::{DiagnosticReport, LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the theme directory; the pretty format re-reads templates from
/// it to show annotated snippets.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Pretty => print_pretty(result, root),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
    }
    Ok(())
}

fn render_text(result: &LintResult) -> String {
    let mut out = String::new();
    for diagnostic in &result.diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };
        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.module_id,
            diagnostic.location.line,
            diagnostic.location.column,
        );
        let _ = writeln!(out, "  {severity}: {}", diagnostic.message);
        if !diagnostic.source.is_empty() && !diagnostic.source.contains('\n') {
            let _ = writeln!(out, "  | {}", diagnostic.source);
        }
        if let Some(suggestion) = &diagnostic.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }
    out.push_str(&summary(result));
    out
}

fn summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    format!(
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} template(s)\x1b[0m\n",
        result.files_checked
    )
}

fn print_pretty(result: &LintResult, root: &Path) {
    for diagnostic in &result.diagnostics {
        let path = root.join(&diagnostic.location.module_id);
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                let report = miette::Report::new(DiagnosticReport::new(diagnostic, &source));
                eprintln!("{report:?}");
            }
            Err(e) => {
                tracing::warn!("Cannot read {} for display: {}", path.display(), e);
                eprint!("{}", diagnostic.format());
            }
        }
    }
    print!("{}", summary(result));
}

fn render_compact(result: &LintResult) -> String {
    result
        .diagnostics
        .iter()
        .map(|d| format!("{d}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_lint_core::{Diagnostic, Location, Suggestion};

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 3;
        result.diagnostics.push(
            Diagnostic::new(
                "TL001",
                "no-unknown-partials",
                Severity::Error,
                Location::new("index.hbs", 4, 2),
                "The partial {{> \"nav\"}} could not be found",
            )
            .with_source("{{> nav}}")
            .with_suggestion(Suggestion::new("Create partials/nav.hbs")),
        );
        result.diagnostics.push(Diagnostic::new(
            "TL014",
            "no-limit-all-in-get-helper",
            Severity::Warning,
            Location::new("partials/list.hbs", 1, 15),
            "{{#get}} with limit=\"all\" loads every matching resource",
        ));
        result
    }

    #[test]
    fn compact_lines() {
        insta::assert_snapshot!(render_compact(&sample()).trim_end(), @r###"
        index.hbs:4:2: error [TL001] The partial {{> "nav"}} could not be found
        partials/list.hbs:1:15: warning [TL014] {{#get}} with limit="all" loads every matching resource
        "###);
    }

    #[test]
    fn text_includes_snippet_help_and_summary() {
        let text = render_text(&sample());
        assert!(text.contains("TL001 no-unknown-partials at index.hbs:4:2"));
        assert!(text.contains("  | {{> nav}}"));
        assert!(text.contains("  = help: Create partials/nav.hbs"));
        assert!(text.contains("Found 1 error(s), 1 warning(s), 0 info(s) in 3 template(s)"));
    }

    #[test]
    fn json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["files_checked"], 3);
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert_eq!(value["diagnostics"][1]["location"]["module_id"], "partials/list.hbs");
        assert!(value["usage"]["helpers"].is_array());
    }
}
