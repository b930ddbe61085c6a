//! Usage-marking rules.
//!
//! These rules never report diagnostics. They record what a template uses
//! into the [`RunContext`](crate::RunContext) so the partial walker and the
//! diagnostic rules can consult it.

use once_cell::sync::Lazy;
use regex::Regex;
use theme_lint_syntax::ast::{
    BlockStatement, DecoratorBlock, Expression, MustacheStatement, NodeRef, PartialBlockStatement,
    PartialStatement, PathExpression, SourceLocation, SubExpression,
};

use crate::context::{snapshot_chain, HelperKind, InlinePartial, UsedHelper, UsedPartial};
use crate::rule::{Rule, RuleBox, RuleContext};
use crate::types::Severity;
use crate::utils::classify::{callee_path, classify};

/// `@custom.<name>` inside a filter string.
static CUSTOM_IN_FILTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@custom\.([a-z0-9_]+)").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Returns all usage-marking rules.
#[must_use]
pub fn usage_markers() -> Vec<RuleBox> {
    vec![
        Box::new(MarkUsedPartials),
        Box::new(MarkUsedHelpers),
        Box::new(MarkDeclaredInlinePartials),
        Box::new(MarkUsedCustomThemeSettings),
        Box::new(MarkUsedPageProperties),
    ]
}

/// Records every partial reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkUsedPartials;

impl MarkUsedPartials {
    fn mark(
        cx: &mut RuleContext<'_, '_>,
        name: &Expression,
        params: &[Expression],
        loc: SourceLocation,
    ) {
        let dynamic = matches!(name, Expression::SubExpression(_));
        let name = name
            .static_name()
            .unwrap_or_else(|| cx.source_for_node(name.loc()));
        let params = params
            .iter()
            .map(|p| cx.source_for_node(p.loc()))
            .collect();
        let used = UsedPartial {
            normalized_name: name.replace('\\', "/"),
            name,
            loc,
            params,
            parents: snapshot_chain(cx.parents()),
            dynamic,
        };
        cx.run_mut().partials.push(used);
    }
}

impl Rule for MarkUsedPartials {
    fn name(&self) -> &'static str {
        "mark-used-partials"
    }

    fn code(&self) -> &'static str {
        "TL100"
    }

    fn description(&self) -> &'static str {
        "Records partial references"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn visit_partial(&self, cx: &mut RuleContext<'_, '_>, node: &PartialStatement) {
        Self::mark(cx, &node.name, &node.params, node.loc);
    }

    fn visit_partial_block(&self, cx: &mut RuleContext<'_, '_>, node: &PartialBlockStatement) {
        Self::mark(cx, &node.name, &node.params, node.loc);
    }
}

/// Records helper and ambiguous call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkUsedHelpers;

impl MarkUsedHelpers {
    fn mark(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        let kind = classify(&node, cx.scope(), cx.catalog());
        if kind == HelperKind::Simple {
            return;
        }
        let Some(path) = callee_path(&node) else {
            return;
        };
        let used = UsedHelper {
            name: path.original,
            kind,
            node: node.kind(),
            loc: node.loc(),
        };
        cx.run_mut().helpers.push(used);
    }
}

impl Rule for MarkUsedHelpers {
    fn name(&self) -> &'static str {
        "mark-used-helpers"
    }

    fn code(&self) -> &'static str {
        "TL101"
    }

    fn description(&self) -> &'static str {
        "Records helper calls"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        Self::mark(cx, NodeRef::Mustache(node));
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        Self::mark(cx, NodeRef::Block(node));
    }

    fn visit_sub_expression(&self, cx: &mut RuleContext<'_, '_>, node: &SubExpression) {
        Self::mark(cx, NodeRef::SubExpression(node));
    }
}

/// Records `{{#*inline "name"}}` declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkDeclaredInlinePartials;

impl Rule for MarkDeclaredInlinePartials {
    fn name(&self) -> &'static str {
        "mark-declared-inline-partials"
    }

    fn code(&self) -> &'static str {
        "TL102"
    }

    fn description(&self) -> &'static str {
        "Records inline partial declarations"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn visit_decorator_block(&self, cx: &mut RuleContext<'_, '_>, node: &DecoratorBlock) {
        if NodeRef::DecoratorBlock(node).callee_name() != Some("inline") {
            return;
        }
        let Some(name) = node.params.first().and_then(Expression::static_name) else {
            return;
        };
        let declared = InlinePartial {
            name,
            parents: snapshot_chain(cx.parents()),
            loc: node.loc,
        };
        cx.run_mut().inline_partials.push(declared);
    }
}

/// Records `@custom.*` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkUsedCustomThemeSettings;

impl MarkUsedCustomThemeSettings {
    fn mark_filter(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        if node.callee_name() != Some("get") {
            return;
        }
        let Some(filter) = node
            .hash()
            .and_then(|h| h.get("filter"))
            .and_then(Expression::as_str_literal)
        else {
            return;
        };
        for captures in CUSTOM_IN_FILTER.captures_iter(filter) {
            cx.run_mut().mark_custom_theme_setting(&captures[1]);
        }
    }
}

impl Rule for MarkUsedCustomThemeSettings {
    fn name(&self) -> &'static str {
        "mark-used-custom-theme-settings"
    }

    fn code(&self) -> &'static str {
        "TL103"
    }

    fn description(&self) -> &'static str {
        "Records custom theme setting references"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if node.data && node.head() == Some("custom") {
            if let Some(name) = node.parts.get(1) {
                cx.run_mut().mark_custom_theme_setting(name);
            }
        }
    }

    fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
        Self::mark_filter(cx, NodeRef::Mustache(node));
    }

    fn visit_block(&self, cx: &mut RuleContext<'_, '_>, node: &BlockStatement) {
        Self::mark_filter(cx, NodeRef::Block(node));
    }

    fn visit_sub_expression(&self, cx: &mut RuleContext<'_, '_>, node: &SubExpression) {
        Self::mark_filter(cx, NodeRef::SubExpression(node));
    }
}

/// Records `@page.*` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkUsedPageProperties;

impl Rule for MarkUsedPageProperties {
    fn name(&self) -> &'static str {
        "mark-used-page-properties"
    }

    fn code(&self) -> &'static str {
        "TL104"
    }

    fn description(&self) -> &'static str {
        "Records page-builder property references"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn visit_path(&self, cx: &mut RuleContext<'_, '_>, node: &PathExpression) {
        if node.data && node.head() == Some("page") {
            if let Some(name) = node.parts.get(1) {
                cx.run_mut().mark_page_property(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::context::RunContext;
    use crate::linter::{rule_refs, Linter, VerifyOptions};
    use theme_lint_syntax::ast::NodeKind;

    fn mark(source: &str) -> RunContext {
        let catalog = Catalog::with_default_helpers();
        let parsed = theme_lint_syntax::parse(source);
        let markers = usage_markers();
        let mut linter = Linter::new(&catalog);
        let diagnostics = linter.verify(VerifyOptions::new(
            source,
            &parsed,
            "index.hbs",
            rule_refs(&markers),
        ));
        assert!(diagnostics.is_empty(), "markers never report: {diagnostics:?}");
        linter.context().clone()
    }

    #[test]
    fn marks_partials_with_normalized_names() {
        let context = mark(r#"{{> "icons\twitter" size="small"}}{{#> layout}}x{{/layout}}"#);
        assert_eq!(context.partials.len(), 2);
        assert_eq!(context.partials[0].name, "icons\\twitter");
        assert_eq!(context.partials[0].normalized_name, "icons/twitter");
        assert_eq!(context.partials[1].name, "layout");
        assert_eq!(context.partials[1].parents.len(), 1);
        assert_eq!(context.partials[1].parents[0].kind, NodeKind::Program);
    }

    #[test]
    fn marks_partial_params_and_dynamic_names() {
        let context = mark(r#"{{> card post}}{{> (lookup . "kind")}}"#);
        assert_eq!(context.partials[0].params, vec!["post"]);
        assert!(!context.partials[0].dynamic);
        assert!(context.partials[1].dynamic);
        assert_eq!(context.partials[1].name, r#"(lookup . "kind")"#);
    }

    #[test]
    fn marks_helpers_and_ambiguous_names() {
        let context = mark("{{title}}{{headline}}{{post.title}}{{#foreach posts}}{{img_url (concat a b)}}{{/foreach}}");
        let names: Vec<(&str, HelperKind)> = context
            .helpers
            .iter()
            .map(|h| (h.name.as_str(), h.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("title", HelperKind::Helper),
                ("headline", HelperKind::Ambiguous),
                ("foreach", HelperKind::Helper),
                ("img_url", HelperKind::Helper),
                ("concat", HelperKind::Helper),
            ]
        );
    }

    #[test]
    fn marks_inline_partial_declarations() {
        let context = mark(r#"{{#*inline "card"}}x{{/inline}}{{#*other "y"}}{{/other}}"#);
        assert_eq!(context.inline_partials.len(), 1);
        assert_eq!(context.inline_partials[0].name, "card");
        assert_eq!(context.inline_partials[0].parents.len(), 1);
    }

    #[test]
    fn marks_custom_settings_from_paths_and_filters() {
        let context = mark(concat!(
            "{{@custom.header_style}}",
            r#"{{#get "posts" filter="tag:{{@custom.featured_tag}}+id:-{{@custom.header_style}}"}}{{/get}}"#,
            r#"{{#if @custom.show_logo}}{{/if}}"#,
        ));
        assert_eq!(
            context.custom_theme_settings,
            vec!["header_style", "featured_tag", "show_logo"]
        );
    }

    #[test]
    fn filter_on_other_helpers_is_ignored() {
        let context = mark(r#"{{#foreach posts filter="@custom.x"}}{{/foreach}}"#);
        assert!(context.custom_theme_settings.is_empty());
    }

    #[test]
    fn marks_page_properties() {
        let context = mark("{{#if @page.show_title_and_feature_image}}{{@page.layout}}{{/if}}{{@page}}");
        assert_eq!(
            context.used_page_properties,
            vec!["show_title_and_feature_image", "layout"]
        );
    }
}
