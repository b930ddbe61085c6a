//! Runs any number of rules over a template in one traversal.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use theme_lint_syntax::ast::{
    Expression, Hash, NodeRef, Position, Program, SourceLocation, Statement,
};
use theme_lint_syntax::{ParseError, ParseResult};
use tracing::{debug, error};

use crate::catalog::Catalog;
use crate::context::{InlinePartial, RunContext, UsedHelper, UsedPartial};
use crate::rule::{Rule, RuleBox, RuleContext};
use crate::scope::Scope;
use crate::types::{Diagnostic, Location, Severity, Suggestion};
use crate::utils::allowance::{check_allow_with_reason, AllowCheck};

/// Rule code used for templates that fail to parse.
pub const PARSE_ERROR_CODE: &str = "TL000";

/// Rule name used for templates that fail to parse.
pub const PARSE_ERROR_NAME: &str = "parse-error";

/// Input of one [`Linter::verify`] call.
pub struct VerifyOptions<'o> {
    /// Template text.
    pub source: &'o str,
    /// Parser output for `source`.
    pub parsed: &'o ParseResult,
    /// Normalized template name.
    pub module_id: &'o str,
    /// Rules to run, in registration order.
    pub rules: Vec<&'o dyn Rule>,
    /// Inline partials visible from the including template.
    pub inline_partials: &'o [InlinePartial],
}

impl<'o> VerifyOptions<'o> {
    /// Creates options with no inherited inline partials.
    #[must_use]
    pub fn new(
        source: &'o str,
        parsed: &'o ParseResult,
        module_id: &'o str,
        rules: Vec<&'o dyn Rule>,
    ) -> Self {
        Self {
            source,
            parsed,
            module_id,
            rules,
            inline_partials: &[],
        }
    }

    /// Sets the inline partials inherited from the including template.
    #[must_use]
    pub fn inline_partials(mut self, inline_partials: &'o [InlinePartial]) -> Self {
        self.inline_partials = inline_partials;
        self
    }
}

/// Borrows boxed rules for [`VerifyOptions`].
#[must_use]
pub fn rule_refs(rules: &[RuleBox]) -> Vec<&dyn Rule> {
    rules.iter().map(|rule| &**rule).collect()
}

/// Composes rules into a single tree walk.
///
/// After [`verify`](Self::verify) returns, the usage recorded by marking
/// rules stays readable on the linter until the next call.
pub struct Linter<'c> {
    catalog: &'c Catalog,
    context: RunContext,
    visits: usize,
    scope_balance: (usize, usize),
}

impl<'c> Linter<'c> {
    /// Creates a linter reading the given catalog.
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            context: RunContext::new(),
            visits: 0,
            scope_balance: (0, 0),
        }
    }

    /// Lints one template.
    ///
    /// A template that failed to parse yields a single fatal diagnostic and
    /// no rule runs. Otherwise every rule sees every node it handles, in a
    /// single depth-first walk. A rule that panics is reported through
    /// tracing and skipped for the rest of the template; the others keep
    /// running.
    pub fn verify(&mut self, options: VerifyOptions<'_>) -> Vec<Diagnostic> {
        self.context = RunContext::new();
        self.visits = 0;
        self.scope_balance = (0, 0);

        let program = match options.parsed {
            Ok(program) => program,
            Err(err) => {
                debug!(module = options.module_id, error = %err, "template failed to parse");
                return vec![parse_failure(options.source, options.module_id, err)];
            }
        };

        let mut walk = Walk {
            rules: &options.rules,
            disabled: vec![false; options.rules.len()],
            catalog: self.catalog,
            run: RunContext::new(),
            inherited: options.inline_partials,
            source: options.source,
            module_id: options.module_id,
            scope: Scope::new(),
            parents: Vec::new(),
            diagnostics: Vec::new(),
            visits: 0,
        };
        walk.program(program);
        debug_assert_eq!(walk.scope.depth(), 0, "frames left open after traversal");

        self.visits = walk.visits;
        self.scope_balance = walk.scope.balance();
        self.context = walk.run;
        debug!(
            module = options.module_id,
            nodes = self.visits,
            rules = options.rules.len(),
            "template verified"
        );

        apply_allow_directives(walk.diagnostics, options.source, &options.rules)
    }

    /// Everything recorded during the last run.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Takes ownership of the last run's record.
    #[must_use]
    pub fn into_context(self) -> RunContext {
        self.context
    }

    /// Partial references of the last run.
    #[must_use]
    pub fn partials(&self) -> &[UsedPartial] {
        &self.context.partials
    }

    /// Helper references of the last run.
    #[must_use]
    pub fn helpers(&self) -> &[UsedHelper] {
        &self.context.helpers
    }

    /// Inline partials declared in the last run's template.
    #[must_use]
    pub fn inline_partials(&self) -> &[InlinePartial] {
        &self.context.inline_partials
    }

    /// Custom theme settings referenced in the last run.
    #[must_use]
    pub fn custom_theme_settings(&self) -> &[String] {
        &self.context.custom_theme_settings
    }

    /// Page properties referenced in the last run.
    #[must_use]
    pub fn used_page_properties(&self) -> &[String] {
        &self.context.used_page_properties
    }

    /// Number of nodes visited by the last run.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.visits
    }

    /// Frames pushed and popped by the last run.
    #[must_use]
    pub fn scope_balance(&self) -> (usize, usize) {
        self.scope_balance
    }
}

fn parse_failure(source: &str, module_id: &str, err: &ParseError) -> Diagnostic {
    let at = Position::new(err.line, err.column);
    let snippet = source
        .split('\n')
        .nth(err.line.saturating_sub(1))
        .unwrap_or_default()
        .trim_end();
    Diagnostic::new(
        PARSE_ERROR_CODE,
        PARSE_ERROR_NAME,
        Severity::Error,
        Location::from_span(module_id, SourceLocation::new(at, at), source),
        format!("Template failed to parse: {}", err.message),
    )
    .with_source(snippet)
    .fatal()
}

fn apply_allow_directives(
    diagnostics: Vec<Diagnostic>,
    source: &str,
    rules: &[&dyn Rule],
) -> Vec<Diagnostic> {
    let mut kept = Vec::with_capacity(diagnostics.len());
    for diagnostic in diagnostics {
        let AllowCheck::Allowed { reason } =
            check_allow_with_reason(source, diagnostic.location.line, &diagnostic.rule)
        else {
            kept.push(diagnostic);
            continue;
        };
        let requires_reason = rules
            .iter()
            .find(|r| r.name() == diagnostic.rule)
            .is_some_and(|r| r.requires_allow_reason());
        if requires_reason && reason.is_none() {
            let message = format!(
                "Allow directive for '{}' is missing required reason",
                diagnostic.rule
            );
            kept.push(
                Diagnostic::new(
                    diagnostic.code,
                    diagnostic.rule,
                    Severity::Warning,
                    diagnostic.location,
                    message,
                )
                .with_suggestion(Suggestion::new(
                    "Add reason=\"...\" to explain why this exception is necessary",
                )),
            );
        } else {
            debug!(
                rule = %diagnostic.rule,
                line = diagnostic.location.line,
                reason = reason.as_deref().unwrap_or(""),
                "diagnostic allowed by directive"
            );
        }
    }
    kept
}

/// Traversal state of one `verify` call.
struct Walk<'r, 'a> {
    rules: &'r [&'r dyn Rule],
    disabled: Vec<bool>,
    catalog: &'r Catalog,
    run: RunContext,
    inherited: &'r [InlinePartial],
    source: &'r str,
    module_id: &'r str,
    scope: Scope<'a>,
    parents: Vec<NodeRef<'a>>,
    diagnostics: Vec<Diagnostic>,
    visits: usize,
}

impl<'r, 'a> Walk<'r, 'a> {
    fn program(&mut self, program: &'a Program) {
        let node = NodeRef::Program(program);
        self.enter(node);
        for statement in &program.body {
            self.statement(statement);
        }
        self.leave(node);
    }

    fn statement(&mut self, statement: &'a Statement) {
        let node = statement.as_node();
        self.enter(node);
        match statement {
            Statement::Mustache(n) => self.call(&n.path, &n.params, &n.hash),
            Statement::Block(n) => {
                self.call(&n.path, &n.params, &n.hash);
                if let Some(program) = &n.program {
                    self.program(program);
                }
                if let Some(inverse) = &n.inverse {
                    self.program(inverse);
                }
            }
            Statement::Partial(n) => self.call(&n.name, &n.params, &n.hash),
            Statement::PartialBlock(n) => {
                self.call(&n.name, &n.params, &n.hash);
                self.program(&n.program);
            }
            Statement::DecoratorBlock(n) => {
                self.call(&n.path, &n.params, &n.hash);
                self.program(&n.program);
            }
            Statement::Content(_) | Statement::Comment(_) => {}
        }
        self.leave(node);
    }

    fn call(&mut self, path: &'a Expression, params: &'a [Expression], hash: &'a Hash) {
        self.expression(path);
        for param in params {
            self.expression(param);
        }
        for pair in &hash.pairs {
            self.expression(&pair.value);
        }
    }

    fn expression(&mut self, expression: &'a Expression) {
        match expression {
            Expression::Path(path) => {
                let node = NodeRef::Path(path);
                self.enter(node);
                self.leave(node);
            }
            Expression::SubExpression(sub) => {
                let node = NodeRef::SubExpression(&**sub);
                self.enter(node);
                self.call(&sub.path, &sub.params, &sub.hash);
                self.leave(node);
            }
            Expression::Literal(_) => {}
        }
    }

    /// Scope bookkeeping, then every rule, then the node becomes a parent.
    fn enter(&mut self, node: NodeRef<'a>) {
        self.visits += 1;
        match node {
            NodeRef::Program(program) if self.parents.is_empty() && program.loc.is_file_start() => {
                self.scope.push_template_frame(node, self.module_id);
            }
            NodeRef::Block(_) if Scope::opens_frame(node.callee_name()) => {
                self.scope.push_frame(node);
            }
            _ => {}
        }
        self.dispatch(node);
        self.parents.push(node);
    }

    fn leave(&mut self, node: NodeRef<'a>) {
        self.parents.pop();
        if self
            .scope
            .current_frame()
            .is_some_and(|frame| frame.node.is_same(&node))
        {
            self.scope.pop_frame();
        }
    }

    fn dispatch(&mut self, node: NodeRef<'a>) {
        for index in 0..self.rules.len() {
            if self.disabled[index] {
                continue;
            }
            let rule = self.rules[index];
            let mut cx = RuleContext {
                rule,
                scope: &self.scope,
                parents: &self.parents,
                catalog: self.catalog,
                run: &mut self.run,
                inherited: self.inherited,
                diagnostics: &mut self.diagnostics,
                source: self.source,
                module_id: self.module_id,
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| visit(rule, &mut cx, node)));
            if let Err(payload) = outcome {
                self.disabled[index] = true;
                error!(
                    rule = rule.name(),
                    module = self.module_id,
                    line = node.loc().start.line,
                    node = %node.kind(),
                    reason = %panic_reason(payload.as_ref()),
                    "rule panicked; skipping it for the rest of this template"
                );
            }
        }
    }
}

fn visit(rule: &dyn Rule, cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
    match node {
        NodeRef::Program(n) => rule.visit_program(cx, n),
        NodeRef::Mustache(n) => rule.visit_mustache(cx, n),
        NodeRef::Block(n) => rule.visit_block(cx, n),
        NodeRef::Partial(n) => rule.visit_partial(cx, n),
        NodeRef::PartialBlock(n) => rule.visit_partial_block(cx, n),
        NodeRef::Path(n) => rule.visit_path(cx, n),
        NodeRef::SubExpression(n) => rule.visit_sub_expression(cx, n),
        NodeRef::DecoratorBlock(n) => rule.visit_decorator_block(cx, n),
        NodeRef::Content(n) => rule.visit_content(cx, n),
        NodeRef::Comment(n) => rule.visit_comment(cx, n),
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use theme_lint_syntax::ast::{MustacheStatement, PathExpression};

    struct FlagMustaches;

    impl Rule for FlagMustaches {
        fn name(&self) -> &'static str {
            "flag-mustaches"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
            cx.log(node.loc, "mustache");
        }
    }

    struct Explodes;

    impl Rule for Explodes {
        fn name(&self) -> &'static str {
            "explodes"
        }
        fn code(&self) -> &'static str {
            "TEST002"
        }
        fn visit_path(&self, _cx: &mut RuleContext<'_, '_>, _node: &PathExpression) {
            panic!("boom");
        }
    }

    /// Records the scope depth seen at every path.
    #[derive(Default)]
    struct DepthProbe {
        max_depth: AtomicUsize,
    }

    impl Rule for DepthProbe {
        fn name(&self) -> &'static str {
            "depth-probe"
        }
        fn code(&self) -> &'static str {
            "TEST003"
        }
        fn visit_path(&self, cx: &mut RuleContext<'_, '_>, _node: &PathExpression) {
            self.max_depth
                .fetch_max(cx.scope().depth(), Ordering::Relaxed);
        }
    }

    fn run(source: &str, module_id: &str, rules: Vec<&dyn Rule>) -> (Vec<Diagnostic>, usize) {
        let catalog = Catalog::with_default_helpers();
        let parsed = theme_lint_syntax::parse(source);
        let mut linter = Linter::new(&catalog);
        let diagnostics = linter.verify(VerifyOptions::new(source, &parsed, module_id, rules));
        (diagnostics, linter.visit_count())
    }

    #[test]
    fn parse_errors_become_one_fatal_diagnostic() {
        let (diagnostics, visits) = run("<p>\n{{#if a}}", "index.hbs", vec![&FlagMustaches]);
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert!(d.fatal);
        assert_eq!(d.rule, PARSE_ERROR_NAME);
        assert_eq!(d.location.line, 2);
        assert_eq!(visits, 0);
    }

    #[test]
    fn diagnostics_are_stamped_with_rule_and_snippet() {
        let (diagnostics, _) = run("<p>{{title}}</p>", "post.hbs", vec![&FlagMustaches]);
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.rule, "flag-mustaches");
        assert_eq!(d.code, "TEST001");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.source, "{{title}}");
        assert_eq!(d.location.module_id, "post.hbs");
        assert_eq!((d.location.line, d.location.column), (1, 3));
    }

    #[test]
    fn walk_count_is_independent_of_rule_count() {
        let source = "{{#foreach posts}}{{title}}{{> card (concat a b)}}{{/foreach}}";
        let (_, one) = run(source, "index.hbs", vec![&FlagMustaches]);
        let (_, three) = run(
            source,
            "index.hbs",
            vec![&FlagMustaches, &FlagMustaches, &DepthProbe::default()],
        );
        assert_eq!(one, three);
        // program, block, foreach, posts, body program, mustache, title,
        // partial, card, sub-expression, concat, a, b
        assert_eq!(one, 13);
    }

    #[test]
    fn panicking_rule_does_not_stop_siblings() {
        let (diagnostics, _) = run(
            "{{title}}{{excerpt}}",
            "index.hbs",
            vec![&Explodes, &FlagMustaches],
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn scope_is_balanced_after_traversal() {
        let source = "{{#foreach posts}}{{#if a}}{{#get \"tags\"}}{{name}}{{/get}}{{/if}}{{/foreach}}";
        let catalog = Catalog::new();
        let parsed = theme_lint_syntax::parse(source);
        let probe = DepthProbe::default();
        let mut linter = Linter::new(&catalog);
        linter.verify(VerifyOptions::new(source, &parsed, "index.hbs", vec![&probe]));

        // template, foreach and get open frames; if does not
        assert_eq!(linter.scope_balance(), (3, 3));
        assert_eq!(probe.max_depth.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn allow_directive_with_reason_suppresses() {
        let source = "{{!-- theme-lint: allow(flag-mustaches) reason=\"legacy\" --}}\n{{title}}";
        let (diagnostics, _) = run(source, "index.hbs", vec![&FlagMustaches]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn allow_directive_without_reason_warns_for_error_rules() {
        struct ErrorRule;
        impl Rule for ErrorRule {
            fn name(&self) -> &'static str {
                "error-rule"
            }
            fn code(&self) -> &'static str {
                "TEST004"
            }
            fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
                cx.log(node.loc, "bad");
            }
        }

        let source = "{{title}} {{! theme-lint: allow(error-rule) }}";
        let (diagnostics, _) = run(source, "index.hbs", vec![&ErrorRule]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(diagnostics[0].message.contains("missing required reason"));
    }

    #[test]
    fn run_context_is_fresh_per_verify() {
        let catalog = Catalog::with_default_helpers();
        let markers = crate::markers::usage_markers();
        let mut linter = Linter::new(&catalog);

        let first = "{{> card}}";
        let parsed = theme_lint_syntax::parse(first);
        linter.verify(VerifyOptions::new(first, &parsed, "a.hbs", rule_refs(&markers)));
        assert_eq!(linter.partials().len(), 1);

        let second = "{{title}}";
        let parsed = theme_lint_syntax::parse(second);
        linter.verify(VerifyOptions::new(second, &parsed, "b.hbs", rule_refs(&markers)));
        assert!(linter.partials().is_empty());
        assert_eq!(linter.helpers().len(), 1);
    }
}
