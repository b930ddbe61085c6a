//! Rule to forbid `{{#if}}` / `{{#unless}}` with more than one condition.
//!
//! Both helpers only read their first argument; `{{#if a b}}` silently
//! ignores `b`. Combine conditions with nested blocks or `{{#match}}`.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef, SubExpression};

/// Rule code for no-multi-param-conditionals.
pub const CODE: &str = "TL013";

/// Rule name for no-multi-param-conditionals.
pub const NAME: &str = "no-multi-param-conditionals";

/// Forbids conditionals with more than one param.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMultiParamConditionals;

impl NoMultiParamConditionals {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        let Some(name) = node.callee_name().filter(|n| matches!(*n, "if" | "unless")) else {
            return;
        };
        let count = node.params().len();
        if count > 1 {
            cx.log_with_help(
                node.loc(),
                format!("{{{{#{name}}}}} takes one condition, found {count}"),
                "Nest the blocks, or compare values with {{#match}}",
            );
        }
    }
}

impl Rule for NoMultiParamConditionals {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids if/unless with more than one condition"
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

    fn visit_sub_expression(&self, cx: &mut RuleContext<'_, '_>, node: &SubExpression) {
        Self::check(cx, NodeRef::SubExpression(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_single_condition_passes() {
        let source = "{{#if feature_image}}a{{else}}b{{/if}}{{#unless @member}}c{{/unless}}";
        assert!(lint(&NoMultiParamConditionals, source, "index.hbs").is_empty());
    }

    #[test]
    fn test_detects_extra_conditions() {
        let source = "{{#if feature_image excerpt}}a{{/if}}{{#unless @member @site.paid featured}}b{{/unless}}";
        let diagnostics = lint(&NoMultiParamConditionals, source, "index.hbs");
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "{{#if}} takes one condition, found 2",
                "{{#unless}} takes one condition, found 3",
            ]
        );
    }
}
