//! Rule to forbid comparing a select setting with a value it can never hold.
//!
//! # Detected Patterns
//!
//! With `header_style` declared as a select of `Landing` / `Search`:
//! - `{{#match @custom.header_style "Hero"}}`
//! - `{{#match @custom.header_style "!=" "Hero"}}`
//! - `{{#if (match @custom.header_style "Hero")}}`
//!
//! Options compare case-insensitively, so `"landing"` is accepted.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, Expression, MustacheStatement, NodeRef, SubExpression};

/// Rule code for no-unknown-custom-theme-select-value-in-match.
pub const CODE: &str = "TL011";

/// Rule name for no-unknown-custom-theme-select-value-in-match.
pub const NAME: &str = "no-unknown-custom-theme-select-value-in-match";

/// Forbids unknown select values in `{{match}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnknownCustomThemeSelectValueInMatch;

impl NoUnknownCustomThemeSelectValueInMatch {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        if node.callee_name() != Some("match") {
            return;
        }
        let params = node.params();
        let Some(setting) = params
            .first()
            .and_then(Expression::as_path)
            .filter(|p| p.data && p.head() == Some("custom"))
            .and_then(|p| p.parts.get(1))
        else {
            return;
        };
        if !cx.is_select_custom_theme_setting(setting) {
            return;
        }
        // `match a "v"` or `match a "op" "v"`
        let value = match params {
            [_, value] | [_, _, value] => value,
            _ => return,
        };
        let Some(text) = value.as_str_literal() else {
            return;
        };
        if cx.is_valid_custom_theme_setting_select_value(setting, text) {
            return;
        }
        let options = cx
            .catalog()
            .select_setting(setting)
            .map(|s| s.options.join(", "))
            .unwrap_or_default();
        cx.log_with_help(
            value.loc(),
            format!("\"{text}\" is not a valid option for @custom.{setting}"),
            format!("Valid options are: {options}"),
        );
    }
}

impl Rule for NoUnknownCustomThemeSelectValueInMatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids {{match}} against values a select setting cannot hold"
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
    use crate::test_support::lint_with;
    use theme_lint_core::{Catalog, CustomThemeSetting, Diagnostic, SettingType};

    fn check_code(source: &str) -> Vec<Diagnostic> {
        let catalog = Catalog::with_default_helpers()
            .custom_theme_setting("header_style", CustomThemeSetting::select(["Landing", "Search"]))
            .custom_theme_setting("tagline", CustomThemeSetting::of_kind(SettingType::Text));
        lint_with(&NoUnknownCustomThemeSelectValueInMatch, &catalog, source, "index.hbs")
    }

    #[test]
    fn test_valid_options_pass() {
        let source = r#"{{#match @custom.header_style "Landing"}}a{{/match}}{{#match @custom.header_style "!=" "search"}}b{{/match}}"#;
        assert!(check_code(source).is_empty());
    }

    #[test]
    fn test_detects_unknown_values() {
        let source = r#"{{#match @custom.header_style "Hero"}}a{{/match}}
{{#if (match @custom.header_style "!=" "Banner")}}b{{/if}}"#;
        let diagnostics = check_code(source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].source, "\"Hero\"");
        insta::assert_snapshot!(
            diagnostics[1].message,
            @r###""Banner" is not a valid option for @custom.header_style"###
        );
        assert_eq!(
            diagnostics[1].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Valid options are: Landing, Search")
        );
    }

    #[test]
    fn test_non_select_settings_and_dynamic_values_pass() {
        let source = r#"{{#match @custom.tagline "anything"}}a{{/match}}{{#match @custom.header_style title}}b{{/match}}"#;
        assert!(check_code(source).is_empty());
    }
}
