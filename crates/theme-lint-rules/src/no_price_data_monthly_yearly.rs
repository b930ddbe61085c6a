//! Rule to forbid the removed `@price.monthly` and `@price.yearly` globals.
//!
//! Prices now live on tiers; templates read `monthly_price` /
//! `yearly_price` from a tier and format them with `{{price}}`.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::PathExpression;

/// Rule code for no-price-data-monthly-yearly.
pub const CODE: &str = "TL007";

/// Rule name for no-price-data-monthly-yearly.
pub const NAME: &str = "no-price-data-monthly-yearly";

/// Forbids `@price.monthly` and `@price.yearly`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPriceDataMonthlyYearly;

impl NoPriceDataMonthlyYearly {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoPriceDataMonthlyYearly {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids the removed @price.monthly and @price.yearly data"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if !node.data || node.head() != Some("price") {
            return;
        }
        let Some(period) = node.parts.get(1).filter(|p| *p == "monthly" || *p == "yearly") else {
            return;
        };
        cx.log_with_help(
            node.loc,
            format!("{} is no longer available", node.original),
            format!("Use {{{{price {period}_price}}}} inside a tiers block"),
        );
    }
}
