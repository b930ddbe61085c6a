//! Rule to forbid `@page` properties the page builder does not provide.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::PathExpression;

/// Rule code for no-unknown-page-properties.
pub const CODE: &str = "TL012";

/// Rule name for no-unknown-page-properties.
pub const NAME: &str = "no-unknown-page-properties";

/// Properties available under `@page`.
pub const PAGE_PROPERTIES: &[&str] = &["show_title_and_feature_image"];

/// Forbids unknown `@page.X` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnknownPageProperties;

impl NoUnknownPageProperties {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoUnknownPageProperties {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids @page properties that are not provided"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if !node.data || node.head() != Some("page") {
            return;
        }
        let Some(property) = node.parts.get(1) else {
            return;
        };
        if PAGE_PROPERTIES.contains(&property.as_str()) {
            return;
        }
        cx.log_with_help(
            node.loc,
            format!("Unknown page property: @page.{property}"),
            format!("Known properties: {}", PAGE_PROPERTIES.join(", ")),
        );
    }
}
