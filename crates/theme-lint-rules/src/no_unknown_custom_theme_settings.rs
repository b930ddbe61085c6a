//! Rule to forbid references to undeclared custom theme settings.
//!
//! Every `@custom.name` must be declared under `config.custom` in the
//! theme's `package.json` (or in the `[catalog.custom]` config table).

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::PathExpression;

/// Rule code for no-unknown-custom-theme-settings.
pub const CODE: &str = "TL010";

/// Rule name for no-unknown-custom-theme-settings.
pub const NAME: &str = "no-unknown-custom-theme-settings";

/// Forbids `@custom.X` for undeclared `X`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnknownCustomThemeSettings;

impl NoUnknownCustomThemeSettings {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoUnknownCustomThemeSettings {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids references to undeclared custom theme settings"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if !node.data || node.head() != Some("custom") {
            return;
        }
        let Some(setting) = node.parts.get(1) else {
            return;
        };
        if cx.is_valid_custom_theme_setting_reference(setting) {
            return;
        }
        cx.log_with_help(
            node.loc,
            format!("Missing custom theme setting: {setting}"),
            format!("Declare \"{setting}\" under config.custom in package.json"),
        );
    }
}
