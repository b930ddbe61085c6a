//! Rule to forbid async helpers inside other async helpers.
//!
//! # Rationale
//!
//! Async helpers resolve data while the template renders. Nesting one inside
//! another serializes requests per iteration and is not supported by the
//! renderer; the inner call renders nothing.
//!
//! # Detected Patterns
//!
//! - `{{#get "posts"}}{{#get "tags"}}...{{/get}}{{/get}}`
//! - `{{#get "posts"}}{{#foreach posts}}{{#next_post}}...{{/next_post}}{{/foreach}}{{/get}}`

use theme_lint_core::{Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef};

/// Rule code for no-nested-async-helpers.
pub const CODE: &str = "TL004";

/// Rule name for no-nested-async-helpers.
pub const NAME: &str = "no-nested-async-helpers";

/// Helpers that resolve data asynchronously.
pub const ASYNC_HELPERS: &[&str] = &["get", "next_post", "prev_post", "ghost_head"];

/// Forbids nested async helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNestedAsyncHelpers;

impl NoNestedAsyncHelpers {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        let Some(name) = node.callee_name() else {
            return;
        };
        if !ASYNC_HELPERS.contains(&name) {
            return;
        }
        let outer = cx
            .scope()
            .frames()
            .iter()
            .rev()
            .filter(|frame| !frame.node.is_same(&node))
            .find_map(|frame| frame.helper_name().filter(|h| ASYNC_HELPERS.contains(h)));
        if let Some(outer) = outer {
            cx.log_with_help(
                node.loc(),
                format!("The {{{{{name}}}}} helper cannot be nested inside {{{{#{outer}}}}}"),
                "Move the inner call outside the outer async block",
            );
        }
    }
}

impl Rule for NoNestedAsyncHelpers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids async helpers inside other async helpers"
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
}
