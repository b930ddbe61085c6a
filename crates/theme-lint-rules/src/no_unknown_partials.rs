//! Rule to forbid includes of partials that do not exist.
//!
//! # Rationale
//!
//! A missing partial renders as an error page at request time. Every
//! `{{> name}}` must resolve to a file under `partials/` or to an inline
//! partial declared in an enclosing scope.
//!
//! # Detected Patterns
//!
//! - `{{> missing}}` with no `partials/missing.hbs`
//! - `{{> card}}` where `card` is an inline partial declared inside another
//!   block
//! - `{{> (lookup . "kind")}}`, whose target cannot be checked statically
//!
//! # Allowed Patterns
//!
//! - `{{> @partial-block}}`
//! - `{{#> (dynamic)}}fallback{{/dynamic}}`, which renders its fallback when
//!   the target is missing

use theme_lint_core::{normalize_path, Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{
    Expression, PartialBlockStatement, PartialStatement, SourceLocation,
};
use tracing::debug;

/// Rule code for no-unknown-partials.
pub const CODE: &str = "TL001";

/// Rule name for no-unknown-partials.
pub const NAME: &str = "no-unknown-partials";

/// Name a partial block's fallback is exposed under.
const PARTIAL_BLOCK: &str = "@partial-block";

/// Forbids includes of unknown partials.
#[derive(Debug, Clone, Default)]
pub struct NoUnknownPartials {
    /// Partial names accepted without a file.
    pub allowed: Vec<String>,
}

impl NoUnknownPartials {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts extra partial names.
    #[must_use]
    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(names.into_iter().map(Into::into));
        self
    }

    fn check(&self, cx: &mut RuleContext<'_, '_>, name: &Expression, loc: SourceLocation, block: bool) {
        let Some(name) = name.static_name() else {
            if block {
                debug!("dynamic partial block has a fallback");
            } else {
                let spelled = cx.source_for_node(name.loc());
                cx.log_with_help(
                    loc,
                    format!("The dynamic partial {{{{> {spelled}}}}} cannot be checked"),
                    "Use the block form {{#> (...)}}fallback{{/...}} so a missing partial renders the fallback",
                );
            }
            return;
        };

        if name == PARTIAL_BLOCK
            || self.allowed.contains(&name)
            || cx.is_valid_partial_reference(&normalize_path(&name))
            || cx.is_accessible_inline_partial(&name)
        {
            return;
        }
        cx.log_with_help(
            loc,
            format!("The partial {{{{> \"{name}\"}}}} could not be found"),
            format!("Create partials/{}.hbs or declare it with {{{{#*inline \"{name}\"}}}}", normalize_path(&name)),
        );
    }
}

impl Rule for NoUnknownPartials {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids includes of partials that do not exist"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn visit_partial(&self, cx: &mut RuleContext<'_, '_>, node: &PartialStatement) {
        self.check(cx, &node.name, node.loc, false);
    }

    fn visit_partial_block(&self, cx: &mut RuleContext<'_, '_>, node: &PartialBlockStatement) {
        self.check(cx, &node.name, node.loc, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lint_with;
    use theme_lint_core::{Catalog, Diagnostic};

    fn check_code(source: &str) -> Vec<Diagnostic> {
        let catalog = Catalog::with_default_helpers().partials(["card", "icons/star"]);
        lint_with(&NoUnknownPartials::new(), &catalog, source, "index.hbs")
    }

    #[test]
    fn test_known_partials_pass() {
        assert!(check_code("{{> card}}{{> \"icons/star\"}}{{> icons/star}}").is_empty());
    }

    #[test]
    fn test_detects_missing_partial() {
        let diagnostics = check_code("<div>\n  {{> missing size=\"s\"}}\n</div>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].location.line, 2);
        assert_eq!(diagnostics[0].source, "{{> missing size=\"s\"}}");
        insta::assert_snapshot!(diagnostics[0].message, @r###"The partial {{> "missing"}} could not be found"###);
    }

    #[test]
    fn test_partial_block_reference_passes() {
        assert!(check_code("{{> @partial-block}}").is_empty());
    }

    #[test]
    fn test_inline_partials_follow_scope() {
        let inside = r#"{{#foreach posts}}{{#*inline "row"}}x{{/inline}}{{> row}}{{/foreach}}"#;
        assert!(check_code(inside).is_empty());

        let outside = r#"{{#foreach posts}}{{#*inline "row"}}x{{/inline}}{{/foreach}}{{> row}}"#;
        assert_eq!(check_code(outside).len(), 1);

        let top_level = r#"{{#*inline "row"}}x{{/inline}}{{#foreach posts}}{{> row}}{{/foreach}}"#;
        assert!(check_code(top_level).is_empty());
    }

    #[test]
    fn test_dynamic_partials() {
        let inline = check_code(r#"{{> (concat "cards/" kind)}}"#);
        assert_eq!(inline.len(), 1);
        assert!(inline[0].message.contains("cannot be checked"));

        assert!(check_code(r#"{{#> (concat "cards/" kind)}}fallback{{/concat}}"#).is_empty());
    }

    #[test]
    fn test_allowed_names() {
        let rule = NoUnknownPartials::new().allow(["provided"]);
        let diagnostics = lint_with(&rule, &Catalog::new(), "{{> provided}}", "index.hbs");
        assert!(diagnostics.is_empty());
    }
}
