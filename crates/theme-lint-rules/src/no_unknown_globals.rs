//! Rule to forbid `@` data references that are never provided.
//!
//! `{{@site.title}}` and friends are supplied by the renderer; loop helpers
//! add `@index`, `@first` and similar. Anything else renders as empty.

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, Expression, MustacheStatement, SourceLocation};

/// Rule code for no-unknown-globals.
pub const CODE: &str = "TL003";

/// Rule name for no-unknown-globals.
pub const NAME: &str = "no-unknown-globals";

/// Forbids unknown `@` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnknownGlobals;

impl NoUnknownGlobals {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, path: &Expression, loc: SourceLocation) {
        let Some(path) = path.as_path() else {
            return;
        };
        if !path.data || cx.scope().is_known_variable(path) {
            return;
        }
        cx.log(loc, format!("{{{{{}}}}} is not a known global", path.original));
    }
}

impl Rule for NoUnknownGlobals {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids @ references that are never provided"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        Self::check(cx, &node.path, node.loc);
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        Self::check(cx, &node.path, node.loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint;

    #[test]
    fn test_known_globals_pass() {
        let source = "{{@site.title}}{{#if @member}}{{@member.name}}{{/if}}{{@custom.accent}}";
        assert!(lint(&NoUnknownGlobals, source, "index.hbs").is_empty());
    }

    #[test]
    fn test_loop_data_passes() {
        let source = "{{#foreach posts}}{{@index}}{{@first}}{{@rowEnd}}{{/foreach}}";
        assert!(lint(&NoUnknownGlobals, source, "index.hbs").is_empty());
    }

    #[test]
    fn test_detects_unknown_globals_in_every_frame() {
        let source = "{{@bogus.thing}}\n{{#foreach posts}}{{@blog.title}}{{/foreach}}";
        let diagnostics = lint(&NoUnknownGlobals, source, "post.hbs");
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "{{@bogus.thing}} is not a known global",
                "{{@blog.title}} is not a known global",
            ]
        );
        assert_eq!(diagnostics[1].location.line, 2);
    }
}
