//! Lexical scope tracking during template traversal.
//!
//! A [`Scope`] is a stack of [`Frame`]s, innermost last. The linter pushes a
//! frame when it enters the template root or a context-changing block and
//! pops it when it leaves the same node, so at every visited node the stack
//! equals the chain of enclosing frame-owning ancestors.

use std::collections::BTreeMap;

use theme_lint_syntax::ast::{NodeRef, PathExpression};
use tracing::debug;

/// Block helpers that never introduce a new context.
pub const FRAMELESS_HELPERS: &[&str] = &["has", "is", "if", "else", "unless"];

/// `@` data roots that are always in scope.
pub const GLOBALS: &[&str] = &["site", "member", "setting", "config", "labs", "custom", "page"];

/// `@` data variables provided by iteration helpers.
pub const LOOP_DATA: &[&str] = &[
    "index", "number", "key", "first", "last", "odd", "even", "rowStart", "rowEnd",
];

/// The resource a template or block renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextTag {
    /// A single post.
    Post,
    /// A single page.
    Page,
    /// An author archive.
    Author,
    /// A tag archive.
    Tag,
}

impl ContextTag {
    /// Returns the local variable name bound for this context.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Author => "author",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infers template contexts from a template's file name.
///
/// `custom-*` templates may be routed to either posts or pages, so they get
/// both contexts. Partials are rendered from many templates and get none.
#[must_use]
pub fn template_contexts(file_name: &str) -> Vec<ContextTag> {
    if file_name.replace('\\', "/").starts_with("partials/") {
        return Vec::new();
    }
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    if base.starts_with("custom-") {
        vec![ContextTag::Post, ContextTag::Page]
    } else if base.starts_with("post") {
        vec![ContextTag::Post]
    } else if base.starts_with("page") {
        vec![ContextTag::Page]
    } else if base.starts_with("author") {
        vec![ContextTag::Author]
    } else if base.starts_with("tag") {
        vec![ContextTag::Tag]
    } else {
        Vec::new()
    }
}

/// One lexical context.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// The Program or `BlockStatement` that opened this frame.
    pub node: NodeRef<'a>,
    /// Contexts this frame renders.
    pub contexts: Vec<ContextTag>,
    /// Variables bound in this frame, with the shape of their value.
    pub locals: BTreeMap<String, ContextTag>,
    /// Names bound by `as |a b|`.
    pub block_params: Vec<String>,
}

impl<'a> Frame<'a> {
    fn new(node: NodeRef<'a>) -> Self {
        Self {
            node,
            contexts: Vec::new(),
            locals: BTreeMap::new(),
            block_params: Vec::new(),
        }
    }

    /// Returns true if `name` is bound in this frame.
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        self.locals.contains_key(name) || self.block_params.iter().any(|p| p == name)
    }

    /// Name of the helper that opened a block frame.
    #[must_use]
    pub fn helper_name(&self) -> Option<&'a str> {
        match self.node {
            NodeRef::Block(_) => self.node.callee_name(),
            _ => None,
        }
    }
}

/// Stack of frames, innermost last.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    frames: Vec<Frame<'a>>,
    pushed: usize,
    popped: usize,
}

impl<'a> Scope<'a> {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a block helper with this name opens a frame.
    #[must_use]
    pub fn opens_frame(helper: Option<&str>) -> bool {
        helper.map_or(true, |name| !FRAMELESS_HELPERS.contains(&name))
    }

    /// Pushes the root frame of a template.
    ///
    /// Contexts are inferred from `file_name`; each context also binds a
    /// local of the same name.
    pub fn push_template_frame(&mut self, node: NodeRef<'a>, file_name: &str) {
        let mut frame = Frame::new(node);
        frame.contexts = template_contexts(file_name);
        for tag in &frame.contexts {
            frame.locals.insert(tag.as_str().to_string(), *tag);
        }
        debug!(file = file_name, contexts = ?frame.contexts, "push template frame");
        self.push(frame);
    }

    /// Pushes a frame for a context-changing block.
    ///
    /// Block frames carry their block params but no inferred context.
    // TODO: infer contexts for `{{#post}}`, `{{#author}}` and `{{#foreach}}`
    // bodies so context rules work below the template root.
    pub fn push_frame(&mut self, node: NodeRef<'a>) {
        let mut frame = Frame::new(node);
        if let NodeRef::Block(block) = node {
            if let Some(program) = &block.program {
                frame.block_params.clone_from(&program.block_params);
            }
        }
        self.push(frame);
    }

    fn push(&mut self, frame: Frame<'a>) {
        self.pushed += 1;
        self.frames.push(frame);
    }

    /// Pops the innermost frame.
    pub fn pop_frame(&mut self) -> Option<Frame<'a>> {
        let frame = self.frames.pop();
        if frame.is_some() {
            self.popped += 1;
        }
        frame
    }

    /// Innermost frame.
    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame<'a>> {
        self.frames.last()
    }

    /// All frames, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[Frame<'a>] {
        &self.frames
    }

    /// Number of frames currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Total frames pushed and popped since creation.
    #[must_use]
    pub fn balance(&self) -> (usize, usize) {
        (self.pushed, self.popped)
    }

    /// Returns true if the nearest frame carrying contexts renders `tag`.
    #[must_use]
    pub fn is_context(&self, tag: ContextTag) -> bool {
        self.frames
            .iter()
            .rev()
            .find(|f| !f.contexts.is_empty())
            .is_some_and(|f| f.contexts.contains(&tag))
    }

    /// Returns true if any enclosing frame renders `tag`.
    #[must_use]
    pub fn has_parent_context(&self, tag: ContextTag) -> bool {
        self.parent_context_node(tag).is_some()
    }

    /// Owning node of the innermost frame that renders `tag`.
    #[must_use]
    pub fn parent_context_node(&self, tag: ContextTag) -> Option<NodeRef<'a>> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.contexts.contains(&tag))
            .map(|f| f.node)
    }

    /// Returns true if `path` refers to something known to be in scope.
    ///
    /// `@` references are checked against the global and loop-data
    /// allow-lists. Plain references are looked up in frame locals and
    /// block params, innermost first, after skipping one frame per `../`.
    #[must_use]
    pub fn is_known_variable(&self, path: &PathExpression) -> bool {
        let Some(head) = path.head() else {
            return false;
        };
        if path.data {
            return GLOBALS.contains(&head) || LOOP_DATA.contains(&head);
        }
        self.frames
            .iter()
            .rev()
            .skip(path.depth)
            .any(|frame| frame.binds(head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_lint_syntax::ast::{Program, SourceLocation, Statement};

    fn data_path(original: &str) -> PathExpression {
        let trimmed = original.trim_start_matches('@');
        PathExpression {
            data: original.starts_with('@'),
            depth: 0,
            parts: trimmed.split('.').map(String::from).collect(),
            original: original.to_string(),
            this: false,
            loc: SourceLocation::default(),
        }
    }

    fn parse(source: &str) -> Program {
        theme_lint_syntax::parse(source).unwrap()
    }

    #[test]
    fn template_contexts_follow_file_names() {
        assert_eq!(template_contexts("post.hbs"), vec![ContextTag::Post]);
        assert_eq!(template_contexts("post-featured.hbs"), vec![ContextTag::Post]);
        assert_eq!(template_contexts("page.hbs"), vec![ContextTag::Page]);
        assert_eq!(
            template_contexts("custom-landing.hbs"),
            vec![ContextTag::Post, ContextTag::Page]
        );
        assert_eq!(template_contexts("author.hbs"), vec![ContextTag::Author]);
        assert_eq!(template_contexts("tag-news.hbs"), vec![ContextTag::Tag]);
        assert!(template_contexts("index.hbs").is_empty());
        assert!(template_contexts("partials/post-card.hbs").is_empty());
    }

    #[test]
    fn template_frame_binds_context_local() {
        let program = parse("{{title}}");
        let mut scope = Scope::new();
        scope.push_template_frame(NodeRef::Program(&program), "post.hbs");

        assert!(scope.is_context(ContextTag::Post));
        assert!(scope.has_parent_context(ContextTag::Post));
        assert!(!scope.is_context(ContextTag::Page));
        assert!(scope.is_known_variable(&data_path("post")));
    }

    #[test]
    fn block_frames_carry_params_without_context() {
        let program = parse("{{#foreach posts as |item|}}{{item.title}}{{/foreach}}");
        let Statement::Block(block) = &program.body[0] else {
            panic!("expected block");
        };
        let mut scope = Scope::new();
        scope.push_template_frame(NodeRef::Program(&program), "post.hbs");
        scope.push_frame(NodeRef::Block(block));

        let frame = scope.current_frame().unwrap();
        assert_eq!(frame.block_params, vec!["item".to_string()]);
        assert!(frame.contexts.is_empty());
        assert_eq!(frame.helper_name(), Some("foreach"));
        // nearest frame with contexts is still the template
        assert!(scope.is_context(ContextTag::Post));
        assert!(scope.is_known_variable(&data_path("item")));

        let parent = scope.parent_context_node(ContextTag::Post).unwrap();
        assert!(parent.is_same(&NodeRef::Program(&program)));
    }

    #[test]
    fn relative_paths_skip_frames() {
        let program = parse("{{#foreach posts as |item|}}{{../item}}{{/foreach}}");
        let Statement::Block(block) = &program.body[0] else {
            panic!("expected block");
        };
        let mut scope = Scope::new();
        scope.push_template_frame(NodeRef::Program(&program), "index.hbs");
        scope.push_frame(NodeRef::Block(block));

        let mut parent_item = data_path("item");
        parent_item.depth = 1;
        assert!(!scope.is_known_variable(&parent_item));
    }

    #[test]
    fn globals_are_known_everywhere() {
        let scope = Scope::new();
        assert!(scope.is_known_variable(&data_path("@site.title")));
        assert!(scope.is_known_variable(&data_path("@custom.header_style")));
        assert!(scope.is_known_variable(&data_path("@index")));
        assert!(!scope.is_known_variable(&data_path("@bogus.thing")));
    }

    #[test]
    fn push_and_pop_are_counted() {
        let program = parse("x");
        let mut scope = Scope::new();
        scope.push_template_frame(NodeRef::Program(&program), "index.hbs");
        assert_eq!(scope.depth(), 1);
        assert!(scope.pop_frame().is_some());
        assert!(scope.pop_frame().is_none());
        assert_eq!(scope.balance(), (1, 1));
    }

    #[test]
    fn frameless_helpers() {
        assert!(!Scope::opens_frame(Some("if")));
        assert!(!Scope::opens_frame(Some("is")));
        assert!(Scope::opens_frame(Some("foreach")));
        assert!(Scope::opens_frame(None));
    }
}
