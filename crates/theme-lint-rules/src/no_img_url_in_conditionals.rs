//! Rule to warn about `img_url` used as a condition.
//!
//! `(img_url feature_image)` always yields a string, even when there is no
//! image, so `{{#if (img_url ...)}}` is always true. Test the image field.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, Expression};

/// Rule code for no-img-url-in-conditionals.
pub const CODE: &str = "TL015";

/// Rule name for no-img-url-in-conditionals.
pub const NAME: &str = "no-img-url-in-conditionals";

/// Warns on `{{#if (img_url ...)}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImgUrlInConditionals;

impl NoImgUrlInConditionals {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoImgUrlInConditionals {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns about img_url used as an if/unless condition"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        let Some(name) = node.path.as_path().map(|p| p.original.as_str()) else {
            return;
        };
        if name != "if" && name != "unless" {
            return;
        }
        let Some(Expression::SubExpression(sub)) = node.params.first() else {
            return;
        };
        if !sub.path.as_path().is_some_and(|p| p.original == "img_url") {
            return;
        }
        let image = sub
            .params
            .first()
            .and_then(Expression::static_name)
            .unwrap_or_else(|| "feature_image".to_string());
        cx.log_with_help(
            sub.loc,
            format!("(img_url) is always truthy inside {{{{#{name}}}}}"),
            format!("Test the image itself: {{{{#{name} {image}}}}}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_detects_img_url_condition() {
        let source = r#"{{#if (img_url feature_image size="s")}}<img>{{/if}}"#;
        let diagnostics = lint(&NoImgUrlInConditionals, source, "index.hbs");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            diagnostics[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Test the image itself: {{#if feature_image}}")
        );
    }

    #[test]
    fn test_plain_conditions_pass() {
        let source = r#"{{#if feature_image}}<img src="{{img_url feature_image}}">{{/if}}{{#unless (match a "b")}}x{{/unless}}"#;
        assert!(lint(&NoImgUrlInConditionals, source, "index.hbs").is_empty());
    }
}
