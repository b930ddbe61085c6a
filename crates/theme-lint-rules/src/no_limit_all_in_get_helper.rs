//! Rule to warn about `{{#get}}` queries without a result limit.
//!
//! `limit="all"` loads every matching resource on each render, which gets
//! slow as a site grows. Prefer an explicit page size.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef};

/// Rule code for no-limit-all-in-get-helper.
pub const CODE: &str = "TL014";

/// Rule name for no-limit-all-in-get-helper.
pub const NAME: &str = "no-limit-all-in-get-helper";

/// Warns on `limit="all"` in `{{#get}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLimitAllInGetHelper;

impl NoLimitAllInGetHelper {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        if node.callee_name() != Some("get") {
            return;
        }
        let Some(limit) = node.hash().and_then(|h| h.get("limit")) else {
            return;
        };
        if limit.as_str_literal().is_some_and(|v| v.eq_ignore_ascii_case("all")) {
            cx.log_with_help(
                limit.loc(),
                "{{#get}} with limit=\"all\" loads every matching resource",
                "Set a numeric limit and paginate",
            );
        }
    }
}

impl Rule for NoLimitAllInGetHelper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns about limit=\"all\" in {{#get}}"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        Self::check(cx, NodeRef::Mustache(node));
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        Self::check(cx, NodeRef::Block(node));
    }
}
