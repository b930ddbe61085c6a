//! Rule to forbid reading tier benefits as objects.
//!
//! Tier benefits are plain strings, so `{{name}}` inside
//! `{{#foreach benefits}}` renders nothing; `{{this}}` is the benefit.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{Expression, MustacheStatement, PathExpression};

use crate::no_tier_price_as_object::in_tiers_block;

/// Rule code for no-tier-benefit-as-object.
pub const CODE: &str = "TL009";

/// Rule name for no-tier-benefit-as-object.
pub const NAME: &str = "no-tier-benefit-as-object";

/// Forbids `{{name}}` on tier benefits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTierBenefitAsObject;

impl NoTierBenefitAsObject {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTierBenefitAsObject {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids {{name}} on tier benefits"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        let is_name = node
            .path
            .as_path()
            .is_some_and(|p| p.is_simple() && p.head() == Some("name"));
        if !is_name || !node.params.is_empty() {
            return;
        }
        let Some(frame) = cx.scope().current_frame() else {
            return;
        };
        let iterates_benefits = matches!(frame.helper_name(), Some("foreach" | "each"))
            && frame
                .node
                .params()
                .first()
                .and_then(Expression::as_path)
                .and_then(PathExpression::head)
                == Some("benefits");
        if iterates_benefits && in_tiers_block(cx.scope()) {
            cx.log_with_help(
                node.loc,
                "Tier benefits are strings: replace {{name}} with {{this}}",
                "Inside {{#foreach benefits}} the current item is the benefit text",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_detects_benefit_name() {
        let source = r#"{{#get "tiers"}}{{#foreach tiers}}{{name}}{{#foreach benefits}}<li>{{name}}</li>{{/foreach}}{{/foreach}}{{/get}}"#;
        let diagnostics = lint(&NoTierBenefitAsObject, source, "index.hbs");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.column, 67);
    }

    #[test]
    fn test_this_and_other_lists_pass() {
        for source in [
            "{{#foreach tiers}}{{#foreach benefits}}{{this}}{{/foreach}}{{/foreach}}",
            "{{#foreach benefits}}{{name}}{{/foreach}}",
            "{{#foreach tiers}}{{#foreach tags}}{{name}}{{/foreach}}{{/foreach}}",
        ] {
            assert!(lint(&NoTierBenefitAsObject, source, "index.hbs").is_empty(), "{source}");
        }
    }
}
