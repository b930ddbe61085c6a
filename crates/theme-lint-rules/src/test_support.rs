//! Shared harness for rule unit tests.

use theme_lint_core::{rule_refs, usage_markers, Catalog, Diagnostic, Linter, Rule, VerifyOptions};

/// Runs `rule` (after the usage markers) over `source` as `module_id`.
pub(crate) fn lint_with(
    rule: &dyn Rule,
    catalog: &Catalog,
    source: &str,
    module_id: &str,
) -> Vec<Diagnostic> {
    let parsed = theme_lint_syntax::parse(source);
    assert!(parsed.is_ok(), "fixture must parse: {parsed:?}");
    let markers = usage_markers();
    let mut rules = rule_refs(&markers);
    rules.push(rule);
    let mut linter = Linter::new(catalog);
    linter.verify(VerifyOptions::new(source, &parsed, module_id, rules))
}

/// Runs `rule` with the default helper catalog.
pub(crate) fn lint(rule: &dyn Rule, source: &str, module_id: &str) -> Vec<Diagnostic> {
    lint_with(rule, &Catalog::with_default_helpers(), source, module_id)
}
