//! Rule to forbid the single-author helper in post templates.
//!
//! Posts carry a list of authors. `{{author}}` only renders the first one
//! and has been superseded by `{{authors}}` / `{{primary_author}}`.

use theme_lint_core::{ContextTag, Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef};

/// Rule code for no-author-helper-in-post-context.
pub const CODE: &str = "TL005";

/// Rule name for no-author-helper-in-post-context.
pub const NAME: &str = "no-author-helper-in-post-context";

/// Forbids `{{author}}` where a post is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthorHelperInPostContext;

impl NoAuthorHelperInPostContext {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        if node.callee_name() != Some("author") || !cx.scope().is_context(ContextTag::Post) {
            return;
        }
        cx.log_with_help(
            node.loc(),
            "Replace {{author}} with {{authors}} in post templates",
            "Use {{primary_author}} when only the first author should be rendered",
        );
    }
}

impl Rule for NoAuthorHelperInPostContext {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids {{author}} in post templates"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        Self::check(cx, NodeRef::Mustache(node));
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        Self::check(cx, NodeRef::Block(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_detects_author_in_post() {
        let diagnostics = lint(&NoAuthorHelperInPostContext, "<p>{{author}}</p>", "post.hbs");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.column, 3);
        assert_eq!(diagnostics[0].source, "{{author}}");
    }

    #[test]
    fn test_detects_author_block_in_custom_template() {
        let source = "{{#author}}{{name}}{{/author}}";
        assert_eq!(lint(&NoAuthorHelperInPostContext, source, "custom-wide.hbs").len(), 1);
    }

    #[test]
    fn test_other_templates_pass() {
        assert!(lint(&NoAuthorHelperInPostContext, "{{author}}", "index.hbs").is_empty());
        assert!(lint(&NoAuthorHelperInPostContext, "{{author}}", "partials/byline.hbs").is_empty());
    }

    #[test]
    fn test_authors_helper_passes() {
        let source = "{{#foreach authors}}{{name}}{{/foreach}}{{primary_author}}";
        assert!(lint(&NoAuthorHelperInPostContext, source, "post.hbs").is_empty());
    }
}
