//! Rule to forbid `{{#prev_post}}` and `{{#next_post}}` away from posts.
//!
//! Both helpers look up neighbours of the post being rendered. In an index
//! or tag template there is no such post and they render nothing.

use theme_lint_core::{ContextTag, Rule, RuleContext, Severity};
use theme_lint_syntax::ast::{BlockStatement, MustacheStatement, NodeRef};

/// Rule code for no-prev-next-post-outside-post-context.
pub const CODE: &str = "TL006";

/// Rule name for no-prev-next-post-outside-post-context.
pub const NAME: &str = "no-prev-next-post-outside-post-context";

const NEIGHBOUR_HELPERS: &[&str] = &["prev_post", "next_post"];

/// Forbids post-neighbour helpers outside a post context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrevNextPostOutsidePostContext;

impl NoPrevNextPostOutsidePostContext {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(cx: &mut RuleContext<'_, '_>, node: NodeRef<'_>) {
        let Some(name) = node.callee_name().filter(|n| NEIGHBOUR_HELPERS.contains(n)) else {
            return;
        };
        if cx.scope().has_parent_context(ContextTag::Post) {
            return;
        }
        cx.log(
            node.loc(),
            format!("{{{{#{name}}}}} can only be used in a post context"),
        );
    }
}

impl Rule for NoPrevNextPostOutsidePostContext {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids prev_post/next_post outside post templates"
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
