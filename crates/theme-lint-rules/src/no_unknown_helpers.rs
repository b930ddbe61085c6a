//! Rule to forbid calls to helpers that are not registered.
//!
//! Only nodes that are certainly helper calls are checked: blocks,
//! sub-expressions and mustaches with arguments. A bare `{{name}}` may be a
//! property lookup and is left alone.
//!
//! # Configuration
//!
//! - `allowed`: helper names accepted in addition to the catalog

use theme_lint_core::utils::{callee_path, classify};
use theme_lint_core::{HelperKind, Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef, SubExpression};

/// Rule code for no-unknown-helpers.
pub const CODE: &str = "TL002";

/// Rule name for no-unknown-helpers.
pub const NAME: &str = "no-unknown-helpers";

/// Forbids calls to unknown helpers.
#[derive(Debug, Clone, Default)]
pub struct NoUnknownHelpers {
    /// Helper names accepted without a catalog entry.
    pub allowed: Vec<String>,
}

impl NoUnknownHelpers {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts extra helper names.
    #[must_use]
    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(names.into_iter().map(Into::into));
        self
    }

    fn check(&self, cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        if classify(&node, cx.scope(), cx.catalog()) != HelperKind::Helper {
            return;
        }
        let Some(path) = callee_path(&node) else {
            return;
        };
        let Some(name) = path.head() else {
            return;
        };
        if cx.is_valid_helper_reference(name) || self.allowed.iter().any(|a| a == name) {
            return;
        }
        let message = format!("Missing helper: {name}");
        cx.log_with_help(
            node.loc(),
            message,
            "Register the helper, or remove the call if it belonged to an older version",
        );
    }
}

impl Rule for NoUnknownHelpers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids calls to helpers that are not registered"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        self.check(cx, NodeRef::Mustache(node));
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        self.check(cx, NodeRef::Block(node));
    }

    fn visit_sub_expression(&self, cx: &mut RuleContext<'_, '_>, node: &SubExpression) {
        self.check(cx, NodeRef::SubExpression(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;
    use theme_lint_core::Diagnostic;

    fn check_code(source: &str) -> Vec<Diagnostic> {
        lint(&NoUnknownHelpers::new(), source, "index.hbs")
    }

    #[test]
    fn test_known_helpers_pass() {
        let source = r#"{{#foreach posts}}{{img_url feature_image size="s"}}{{date format="D"}}{{/foreach}}"#;
        assert!(check_code(source).is_empty());
    }

    #[test]
    fn test_detects_unknown_calls() {
        let diagnostics = check_code(r#"{{shiny title}}{{#sparkle}}x{{/sparkle}}{{t (glow "a")}}"#);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Missing helper: shiny", "Missing helper: sparkle", "Missing helper: glow"]
        );
    }

    #[test]
    fn test_ambiguous_and_simple_paths_pass() {
        assert!(check_code("{{headline}}{{title}}{{post.title}}{{../title}}{{@site.title}}").is_empty());
    }

    #[test]
    fn test_block_params_are_not_helpers() {
        let source = "{{#foreach posts as |item|}}{{item}}{{/foreach}}";
        assert!(check_code(source).is_empty());
    }

    #[test]
    fn test_allowed_names() {
        let rule = NoUnknownHelpers::new().allow(["shiny"]);
        assert!(lint(&rule, "{{shiny title}}", "index.hbs").is_empty());
    }
}
