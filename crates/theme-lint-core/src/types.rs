//! Core types for lint diagnostics and results.

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use theme_lint_syntax::ast::{Position, SourceLocation};

use crate::context::ThemeUsage;

/// Severity level for lint diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Template source location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Normalized template name (e.g. `partials/card.hbs`).
    pub module_id: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed).
    pub column: usize,
    /// Line where the flagged node ends.
    pub end_line: usize,
    /// Column where the flagged node ends.
    pub end_column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a point location with explicit values.
    #[must_use]
    pub fn new(module_id: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            module_id: module_id.into(),
            line,
            column,
            end_line: line,
            end_column: column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location covering a node span, resolving byte offsets
    /// against the template text.
    #[must_use]
    pub fn from_span(module_id: impl Into<String>, loc: SourceLocation, source: &str) -> Self {
        let offset = offset_for(source, loc.start);
        let end = offset_for(source, loc.end).max(offset);
        Self {
            module_id: module_id.into(),
            line: loc.start.line,
            column: loc.start.column,
            end_line: loc.end.line,
            end_column: loc.end.column,
            offset,
            length: end - offset,
        }
    }
}

/// Converts a line/column position into a byte offset.
///
/// Positions past the end of a line clamp to the line end; positions past
/// the last line clamp to the end of the text.
#[must_use]
pub fn offset_for(source: &str, position: Position) -> usize {
    let mut offset = 0;
    for (index, line) in source.split('\n').enumerate() {
        if index + 1 == position.line {
            let within = line
                .char_indices()
                .nth(position.column)
                .map_or(line.len(), |(i, _)| i);
            return offset + within;
        }
        offset += line.len() + 1;
    }
    source.len()
}

/// A suggested fix for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint finding produced during one template traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "TL001").
    pub code: String,
    /// Rule name (e.g., "no-unknown-partials").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the flagged node lives.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Exact template text of the flagged node.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Set when the template could not be parsed at all.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fatal: bool,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            source: String::new(),
            fatal: false,
            suggestion: None,
        }
    }

    /// Attaches the source snippet of the flagged node.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Marks this diagnostic as fatal.
    #[must_use]
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code, self.rule, self.location.module_id, self.location.line, self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if !self.source.is_empty() {
            let _ = writeln!(output, "  | {}", self.source);
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.module_id,
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Renders a [`Diagnostic`] through miette, with the template as source.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl DiagnosticReport {
    /// Builds a report for `diagnostic` against the full template text.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, source: &str) -> Self {
        let offset = diagnostic.location.offset.min(source.len());
        let length = diagnostic.location.length.min(source.len() - offset);
        Self {
            message: format!("[{}] {}", diagnostic.code, diagnostic.message),
            help: diagnostic.suggestion.as_ref().map(|s| s.message.clone()),
            source_code: NamedSource::new(&diagnostic.location.module_id, source.to_string()),
            span: SourceSpan::from((offset, length)),
            label_message: diagnostic.rule.clone(),
        }
    }
}

/// Result of linting a whole theme.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of templates checked.
    pub files_checked: usize,
    /// Helpers, partials and settings the theme references.
    #[serde(default)]
    pub usage: ThemeUsage,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns true if any template failed to parse.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.fatal)
    }

    /// Returns diagnostics filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Returns diagnostics produced by one rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.rule == rule).collect()
    }

    /// Counts diagnostics by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Sorts diagnostics by template, then line, then column.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .module_id
                .cmp(&b.location.module_id)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
    }
}
