//! Rule trait and the per-node context handed to rules.

use theme_lint_syntax::ast::{
    BlockStatement, CommentStatement, ContentStatement, DecoratorBlock, MustacheStatement,
    NodeRef, PartialBlockStatement, PartialStatement, PathExpression, Program, SourceLocation,
    SubExpression,
};

use crate::catalog::Catalog;
use crate::context::{is_inline_partial_visible, snapshot_chain, InlinePartial, RunContext};
use crate::scope::Scope;
use crate::types::{Diagnostic, Location, Severity, Suggestion};

/// A template lint rule.
///
/// Rules declare interest in node kinds by overriding the matching
/// `visit_*` method; every method defaults to a no-op. The linter calls
/// them during a single depth-first walk shared by all rules, after scope
/// bookkeeping for the node has run.
///
/// # Example
///
/// ```
/// use theme_lint_core::{Rule, RuleContext};
/// use theme_lint_syntax::ast::MustacheStatement;
///
/// pub struct NoTripleStash;
///
/// impl Rule for NoTripleStash {
///     fn name(&self) -> &'static str { "no-triple-stash" }
///     fn code(&self) -> &'static str { "TL900" }
///
///     fn visit_mustache(&self, cx: &mut RuleContext<'_, '_>, node: &MustacheStatement) {
///         if !node.escaped {
///             cx.log(node.loc, "Unescaped output");
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-unknown-partials").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "TL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Called for every Program (template root, block bodies, inverses).
    fn visit_program(&self, _cx: &mut RuleContext<'_, '_>, _node: &Program) {}

    /// Called for every `{{mustache}}`.
    fn visit_mustache(&self, _cx: &mut RuleContext<'_, '_>, _node: &MustacheStatement) {}

    /// Called for every `{{#block}}`.
    fn visit_block(&self, _cx: &mut RuleContext<'_, '_>, _node: &BlockStatement) {}

    /// Called for every `{{> partial}}`.
    fn visit_partial(&self, _cx: &mut RuleContext<'_, '_>, _node: &PartialStatement) {}

    /// Called for every `{{#> partial}}`.
    fn visit_partial_block(&self, _cx: &mut RuleContext<'_, '_>, _node: &PartialBlockStatement) {
    }

    /// Called for every path expression, including helper names.
    fn visit_path(&self, _cx: &mut RuleContext<'_, '_>, _node: &PathExpression) {}

    /// Called for every `(sub expression)`.
    fn visit_sub_expression(&self, _cx: &mut RuleContext<'_, '_>, _node: &SubExpression) {}

    /// Called for every `{{#*decorator}}` block.
    fn visit_decorator_block(&self, _cx: &mut RuleContext<'_, '_>, _node: &DecoratorBlock) {}

    /// Called for every run of raw text.
    fn visit_content(&self, _cx: &mut RuleContext<'_, '_>, _node: &ContentStatement) {}

    /// Called for every comment.
    fn visit_comment(&self, _cx: &mut RuleContext<'_, '_>, _node: &CommentStatement) {}
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// What a rule sees while handling one node.
///
/// `'r` is the borrow of the linter's traversal state, `'a` the lifetime of
/// the syntax tree.
pub struct RuleContext<'r, 'a> {
    pub(crate) rule: &'r dyn Rule,
    pub(crate) scope: &'r Scope<'a>,
    pub(crate) parents: &'r [NodeRef<'a>],
    pub(crate) catalog: &'r Catalog,
    pub(crate) run: &'r mut RunContext,
    pub(crate) inherited: &'r [InlinePartial],
    pub(crate) diagnostics: &'r mut Vec<Diagnostic>,
    pub(crate) source: &'r str,
    pub(crate) module_id: &'r str,
}

impl<'r, 'a> RuleContext<'r, 'a> {
    /// Current lexical scope.
    #[must_use]
    pub fn scope(&self) -> &Scope<'a> {
        self.scope
    }

    /// Ancestors of the current node, outermost first.
    #[must_use]
    pub fn parents(&self) -> &[NodeRef<'a>] {
        self.parents
    }

    /// Nearest ancestor.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.parents.last().copied()
    }

    /// Known helpers, partials and settings.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// Usage recorded so far in this run.
    #[must_use]
    pub fn run(&self) -> &RunContext {
        self.run
    }

    /// Mutable usage record, for marking rules.
    pub fn run_mut(&mut self) -> &mut RunContext {
        self.run
    }

    /// Inline partials inherited from including templates.
    #[must_use]
    pub fn inherited_inline_partials(&self) -> &[InlinePartial] {
        self.inherited
    }

    /// Full template text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.source
    }

    /// Normalized name of the template being linted.
    #[must_use]
    pub fn module_id(&self) -> &str {
        self.module_id
    }

    /// Records a diagnostic for the running rule at `loc`.
    ///
    /// Rule name, code, severity, template name and source snippet are
    /// filled in automatically.
    pub fn log(&mut self, loc: SourceLocation, message: impl Into<String>) {
        let diagnostic = self.build(loc, message.into());
        self.diagnostics.push(diagnostic);
    }

    /// Like [`log`](Self::log), with a fix hint.
    pub fn log_with_help(
        &mut self,
        loc: SourceLocation,
        message: impl Into<String>,
        help: impl Into<String>,
    ) {
        let diagnostic = self
            .build(loc, message.into())
            .with_suggestion(Suggestion::new(help));
        self.diagnostics.push(diagnostic);
    }

    fn build(&self, loc: SourceLocation, message: String) -> Diagnostic {
        Diagnostic::new(
            self.rule.code(),
            self.rule.name(),
            self.rule.default_severity(),
            Location::from_span(self.module_id, loc, self.source),
            message,
        )
        .with_source(self.source_for_node(loc))
    }

    /// Exact template text covered by `loc`.
    ///
    /// Multi-line spans are joined with `\n`; out-of-range spans yield an
    /// empty string.
    #[must_use]
    pub fn source_for_node(&self, loc: SourceLocation) -> String {
        source_for_span(self.source, loc)
    }

    /// Returns true if `name` is a partial file of the theme.
    #[must_use]
    pub fn is_valid_partial_reference(&self, name: &str) -> bool {
        self.catalog.partials.contains(name)
    }

    /// Returns true if an inline partial called `name` is visible here.
    ///
    /// Both declarations inherited from an including template and those
    /// already declared in this template are considered.
    #[must_use]
    pub fn is_accessible_inline_partial(&self, name: &str) -> bool {
        let usage = snapshot_chain(self.parents);
        self.inherited
            .iter()
            .chain(&self.run.inline_partials)
            .filter(|p| p.name == name)
            .any(|p| is_inline_partial_visible(&p.parents, &usage))
    }

    /// Returns true if `name` is a known helper.
    #[must_use]
    pub fn is_valid_helper_reference(&self, name: &str) -> bool {
        self.catalog.helpers.contains(name)
    }

    /// Returns true if `name` is a declared custom theme setting.
    #[must_use]
    pub fn is_valid_custom_theme_setting_reference(&self, name: &str) -> bool {
        self.catalog.custom_theme_settings.contains_key(name)
    }

    /// Returns true if `name` is a declared select setting.
    #[must_use]
    pub fn is_select_custom_theme_setting(&self, name: &str) -> bool {
        self.catalog.select_setting(name).is_some()
    }

    /// Returns true if `value` is one of the select setting's options.
    ///
    /// Options compare case-insensitively.
    #[must_use]
    pub fn is_valid_custom_theme_setting_select_value(&self, name: &str, value: &str) -> bool {
        self.catalog
            .select_setting(name)
            .is_some_and(|s| s.options.iter().any(|o| o.eq_ignore_ascii_case(value)))
    }
}

/// Extracts the text between two positions of `source`.
#[must_use]
pub fn source_for_span(source: &str, loc: SourceLocation) -> String {
    let (start, end) = (loc.start, loc.end);
    if start.line == 0 || end.line < start.line {
        return String::new();
    }
    let lines: Vec<&str> = source
        .split('\n')
        .skip(start.line - 1)
        .take(end.line - start.line + 1)
        .collect();
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let from = if index == 0 { start.column } else { 0 };
            let to = if index == last && lines.len() == end.line - start.line + 1 {
                end.column
            } else {
                usize::MAX
            };
            line.chars()
                .skip(from)
                .take(to.saturating_sub(from))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
