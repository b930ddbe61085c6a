//! Rule to forbid reading tier prices as objects.
//!
//! # Rationale
//!
//! `monthly_price` and `yearly_price` on a tier are plain numbers. The old
//! object shape (`monthly_price.amount`, `yearly_price.currency`) renders
//! as empty. Prices are formatted with `{{price monthly_price}}`.
//!
//! # Detected Patterns
//!
//! Inside a tiers block (`{{#tiers}}`, `{{#foreach tiers}}`,
//! `{{#get "tiers"}}`):
//! - `{{monthly_price.amount}}`
//! - `{{price yearly_price.amount currency=yearly_price.currency}}`

use theme_lint_core::{Frame, Rule, RuleContext, Scope, Severity};
use theme_lint_syntax::ast::{Expression, PathExpression};

/// Rule code for no-tier-price-as-object.
pub const CODE: &str = "TL008";

/// Rule name for no-tier-price-as-object.
pub const NAME: &str = "no-tier-price-as-object";

const PRICE_FIELDS: &[&str] = &["monthly_price", "yearly_price"];

fn is_tiers_frame(frame: &Frame<'_>) -> bool {
    let first = frame.node.params().first();
    match frame.helper_name() {
        Some("tiers") => true,
        Some("foreach" | "each") => {
            first.and_then(Expression::as_path).and_then(PathExpression::head) == Some("tiers")
        }
        Some("get") => first.and_then(Expression::as_str_literal) == Some("tiers"),
        _ => false,
    }
}

/// Returns true if any enclosing frame iterates or fetches tiers.
pub(crate) fn in_tiers_block(scope: &Scope<'_>) -> bool {
    scope.frames().iter().any(is_tiers_frame)
}

/// Forbids object access on tier prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTierPriceAsObject;

impl NoTierPriceAsObject {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTierPriceAsObject {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids monthly_price/yearly_price object access inside tiers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if node.data || node.parts.len() < 2 {
            return;
        }
        let Some(field) = node.head().filter(|h| PRICE_FIELDS.contains(h)) else {
            return;
        };
        if !in_tiers_block(cx.scope()) {
            return;
        }
        cx.log_with_help(
            node.loc,
            format!("{{{{{}}}}} is not supported: {field} is a number", node.original),
            format!("Use {{{{price {field}}}}} to render the formatted price"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_detects_object_access_in_tiers() {
        let source = r#"{{#foreach tiers}}{{monthly_price.amount}}{{price yearly_price.amount currency=yearly_price.currency}}{{/foreach}}"#;
        let diagnostics = lint(&NoTierPriceAsObject, source, "index.hbs");
        assert_eq!(diagnostics.len(), 3);
        insta::assert_snapshot!(
            diagnostics[0].message,
            @"{{monthly_price.amount}} is not supported: monthly_price is a number"
        );
    }

    #[test]
    fn test_every_tiers_block_form() {
        for source in [
            "{{#tiers}}{{monthly_price.amount}}{{/tiers}}",
            r#"{{#get "tiers"}}{{#if @first}}{{monthly_price.amount}}{{/if}}{{/get}}"#,
            "{{#each tiers}}{{yearly_price.currency}}{{/each}}",
        ] {
            assert_eq!(lint(&NoTierPriceAsObject, source, "index.hbs").len(), 1, "{source}");
        }
    }

    #[test]
    fn test_plain_prices_and_outside_access_pass() {
        let source = "{{#foreach tiers}}{{price monthly_price}}{{yearly_price}}{{/foreach}}{{monthly_price.amount}}";
        assert!(lint(&NoTierPriceAsObject, source, "index.hbs").is_empty());
    }
}
