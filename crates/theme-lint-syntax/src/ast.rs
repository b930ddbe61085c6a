//! Template syntax tree.
//!
//! The tree mirrors the Handlebars AST: a [`Program`] holds a list of
//! [`Statement`]s, statements refer to [`Expression`]s, and blocks own nested
//! programs. Only ten node kinds are dispatched to lint rules (see
//! [`NodeKind`]); literals and hash pairs are plain values.

use serde::Serialize;

/// A point in the template source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed, in characters).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Start/end span of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// First character of the node.
    pub start: Position,
    /// Position just past the node.
    pub end: Position,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns true if this span begins at the very start of a file.
    #[must_use]
    pub fn is_file_start(&self) -> bool {
        self.start.line == 1 && self.start.column == 0
    }
}

/// The closed set of node kinds visited by the linter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    /// Template root or block body.
    Program,
    /// `{{foo}}`
    MustacheStatement,
    /// `{{#foo}}...{{/foo}}`
    BlockStatement,
    /// `{{> foo}}`
    PartialStatement,
    /// `{{#> foo}}...{{/foo}}`
    PartialBlockStatement,
    /// `foo.bar`, `@site.title`, `../foo`
    PathExpression,
    /// `(foo bar)`
    SubExpression,
    /// `{{#*inline "foo"}}...{{/inline}}`
    DecoratorBlock,
    /// Raw text between tags.
    ContentStatement,
    /// `{{! ... }}`
    CommentStatement,
}

impl NodeKind {
    /// Every dispatched kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Program,
        Self::MustacheStatement,
        Self::BlockStatement,
        Self::PartialStatement,
        Self::PartialBlockStatement,
        Self::PathExpression,
        Self::SubExpression,
        Self::DecoratorBlock,
        Self::ContentStatement,
        Self::CommentStatement,
    ];

    /// Returns the Handlebars type name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::MustacheStatement => "MustacheStatement",
            Self::BlockStatement => "BlockStatement",
            Self::PartialStatement => "PartialStatement",
            Self::PartialBlockStatement => "PartialBlockStatement",
            Self::PathExpression => "PathExpression",
            Self::SubExpression => "SubExpression",
            Self::DecoratorBlock => "DecoratorBlock",
            Self::ContentStatement => "ContentStatement",
            Self::CommentStatement => "CommentStatement",
        }
    }

    /// Returns true for kinds that open a new partial-visibility boundary.
    #[must_use]
    pub const fn is_block_boundary(self) -> bool {
        matches!(
            self,
            Self::BlockStatement | Self::PartialBlockStatement | Self::DecoratorBlock
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list of statements: the template root, a block body or an inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Statements in source order.
    pub body: Vec<Statement>,
    /// Names bound by `as |a b|` on the owning block.
    pub block_params: Vec<String>,
    /// Span of the body.
    pub loc: SourceLocation,
}

/// A top-level item of a [`Program`].
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `{{expr}}`
    Mustache(MustacheStatement),
    /// `{{#helper}}...{{/helper}}`
    Block(BlockStatement),
    /// `{{> partial}}`
    Partial(PartialStatement),
    /// `{{#> partial}}...{{/partial}}`
    PartialBlock(PartialBlockStatement),
    /// `{{#*inline "name"}}...{{/inline}}`
    DecoratorBlock(DecoratorBlock),
    /// Text.
    Content(ContentStatement),
    /// Comment.
    Comment(CommentStatement),
}

impl Statement {
    /// Returns the borrowed node view of this statement.
    #[must_use]
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Self::Mustache(n) => NodeRef::Mustache(n),
            Self::Block(n) => NodeRef::Block(n),
            Self::Partial(n) => NodeRef::Partial(n),
            Self::PartialBlock(n) => NodeRef::PartialBlock(n),
            Self::DecoratorBlock(n) => NodeRef::DecoratorBlock(n),
            Self::Content(n) => NodeRef::Content(n),
            Self::Comment(n) => NodeRef::Comment(n),
        }
    }
}

/// `{{path params hash}}` or `{{{path}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    /// Helper name or value path.
    pub path: Expression,
    /// Positional arguments.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// False for `{{{triple}}}` and `{{&amp}}` forms.
    pub escaped: bool,
    /// Span of the whole tag.
    pub loc: SourceLocation,
}

/// `{{#path params hash as |x|}}program{{else}}inverse{{/path}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// Helper name.
    pub path: Expression,
    /// Positional arguments.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// Main body.
    pub program: Option<Program>,
    /// `{{else}}` body.
    pub inverse: Option<Program>,
    /// Span from the open tag to the close tag.
    pub loc: SourceLocation,
}

/// `{{> name context key=value}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialStatement {
    /// Partial name: a path, literal or sub-expression.
    pub name: Expression,
    /// Context argument.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// Span of the tag.
    pub loc: SourceLocation,
}

/// `{{#> name}}fallback{{/name}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialBlockStatement {
    /// Partial name: a path, literal or sub-expression.
    pub name: Expression,
    /// Context argument.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// Fallback body, exposed to the partial as `@partial-block`.
    pub program: Program,
    /// Span from the open tag to the close tag.
    pub loc: SourceLocation,
}

/// `{{#*inline "name"}}body{{/inline}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorBlock {
    /// Decorator name (`inline`).
    pub path: Expression,
    /// Positional arguments; the first names the inline partial.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// Decorated body.
    pub program: Program,
    /// Span from the open tag to the close tag.
    pub loc: SourceLocation,
}

/// Literal template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStatement {
    /// Text content.
    pub value: String,
    /// Span of the text.
    pub loc: SourceLocation,
}

/// `{{! comment }}` or `{{!-- comment --}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStatement {
    /// Text between the comment delimiters.
    pub value: String,
    /// Span of the tag.
    pub loc: SourceLocation,
}

/// A value position inside a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `foo.bar`
    Path(PathExpression),
    /// `(helper arg)`
    SubExpression(Box<SubExpression>),
    /// `"text"`, `42`, `true`, `null`, `undefined`
    Literal(Literal),
}

impl Expression {
    /// Span of the expression.
    #[must_use]
    pub fn loc(&self) -> SourceLocation {
        match self {
            Self::Path(p) => p.loc,
            Self::SubExpression(s) => s.loc,
            Self::Literal(l) => l.loc,
        }
    }

    /// Returns the path if this is a path expression.
    #[must_use]
    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the string value if this is a string literal.
    #[must_use]
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(Literal {
                value: LiteralValue::String(s),
                ..
            }) => Some(s),
            _ => None,
        }
    }

    /// Returns the text a reader would use to name this expression.
    ///
    /// Paths yield their original spelling, literals their value; a
    /// sub-expression has no static name.
    #[must_use]
    pub fn static_name(&self) -> Option<String> {
        match self {
            Self::Path(p) => Some(p.original.clone()),
            Self::Literal(l) => Some(l.original.clone()),
            Self::SubExpression(_) => None,
        }
    }

    /// Returns the borrowed node view, for kinds that are dispatched.
    #[must_use]
    pub fn as_node(&self) -> Option<NodeRef<'_>> {
        match self {
            Self::Path(p) => Some(NodeRef::Path(p)),
            Self::SubExpression(s) => Some(NodeRef::SubExpression(s)),
            Self::Literal(_) => None,
        }
    }
}

/// A variable or helper reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    /// `@`-prefixed data reference.
    pub data: bool,
    /// Number of leading `../` segments.
    pub depth: usize,
    /// Segments after `this`/`../` prefixes.
    pub parts: Vec<String>,
    /// Source spelling.
    pub original: String,
    /// Path starts with `this` or `.`.
    pub this: bool,
    /// Span of the path.
    pub loc: SourceLocation,
}

impl PathExpression {
    /// First segment, if any.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.parts.first().map(String::as_str)
    }

    /// True for a bare one-segment name such as `foo`.
    ///
    /// Data references, `this`-rooted and `../` paths are never simple.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        !self.data && !self.this && self.depth == 0 && self.parts.len() == 1
    }

    /// Builds the path a literal stands for when it is used as a helper name.
    #[must_use]
    pub fn from_literal(literal: &Literal) -> Self {
        let name = match &literal.value {
            LiteralValue::String(s) => s.clone(),
            _ => literal.original.clone(),
        };
        Self {
            data: false,
            depth: 0,
            parts: vec![name.clone()],
            original: name,
            this: false,
            loc: literal.loc,
        }
    }
}

/// `(path params hash)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    /// Helper name.
    pub path: Expression,
    /// Positional arguments.
    pub params: Vec<Expression>,
    /// Named arguments.
    pub hash: Hash,
    /// Span including the parentheses.
    pub loc: SourceLocation,
}

/// Named arguments of a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hash {
    /// `key=value` pairs in source order.
    pub pairs: Vec<HashPair>,
    /// Span of all pairs.
    pub loc: SourceLocation,
}

impl Hash {
    /// Looks up a pair value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.pairs.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

/// One `key=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    /// Argument name.
    pub key: String,
    /// Argument value.
    pub value: Expression,
    /// Span from key to value.
    pub loc: SourceLocation,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Parsed value.
    pub value: LiteralValue,
    /// Source spelling without quotes.
    pub original: String,
    /// Span including quotes.
    pub loc: SourceLocation,
}

/// Literal payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `"text"` or `'text'`
    String(String),
    /// `42`, `-1.5`
    Number(f64),
    /// `true`, `false`
    Boolean(bool),
    /// `null`
    Null,
    /// `undefined`
    Undefined,
}

/// Borrowed view of any dispatched node.
///
/// Traversal state (ancestor chains, scope frames) holds these rather than
/// owned nodes. Two views denote the same node only if they point at the
/// same allocation; see [`NodeRef::is_same`].
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// See [`Program`].
    Program(&'a Program),
    /// See [`MustacheStatement`].
    Mustache(&'a MustacheStatement),
    /// See [`BlockStatement`].
    Block(&'a BlockStatement),
    /// See [`PartialStatement`].
    Partial(&'a PartialStatement),
    /// See [`PartialBlockStatement`].
    PartialBlock(&'a PartialBlockStatement),
    /// See [`PathExpression`].
    Path(&'a PathExpression),
    /// See [`SubExpression`].
    SubExpression(&'a SubExpression),
    /// See [`DecoratorBlock`].
    DecoratorBlock(&'a DecoratorBlock),
    /// See [`ContentStatement`].
    Content(&'a ContentStatement),
    /// See [`CommentStatement`].
    Comment(&'a CommentStatement),
}

impl<'a> NodeRef<'a> {
    /// Kind tag of the node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Program(_) => NodeKind::Program,
            Self::Mustache(_) => NodeKind::MustacheStatement,
            Self::Block(_) => NodeKind::BlockStatement,
            Self::Partial(_) => NodeKind::PartialStatement,
            Self::PartialBlock(_) => NodeKind::PartialBlockStatement,
            Self::Path(_) => NodeKind::PathExpression,
            Self::SubExpression(_) => NodeKind::SubExpression,
            Self::DecoratorBlock(_) => NodeKind::DecoratorBlock,
            Self::Content(_) => NodeKind::ContentStatement,
            Self::Comment(_) => NodeKind::CommentStatement,
        }
    }

    /// Span of the node.
    #[must_use]
    pub fn loc(&self) -> SourceLocation {
        match self {
            Self::Program(n) => n.loc,
            Self::Mustache(n) => n.loc,
            Self::Block(n) => n.loc,
            Self::Partial(n) => n.loc,
            Self::PartialBlock(n) => n.loc,
            Self::Path(n) => n.loc,
            Self::SubExpression(n) => n.loc,
            Self::DecoratorBlock(n) => n.loc,
            Self::Content(n) => n.loc,
            Self::Comment(n) => n.loc,
        }
    }

    /// The helper/name expression of call-like nodes.
    #[must_use]
    pub fn callee(&self) -> Option<&'a Expression> {
        match *self {
            Self::Mustache(n) => Some(&n.path),
            Self::Block(n) => Some(&n.path),
            Self::SubExpression(n) => Some(&n.path),
            Self::DecoratorBlock(n) => Some(&n.path),
            Self::Partial(n) => Some(&n.name),
            Self::PartialBlock(n) => Some(&n.name),
            _ => None,
        }
    }

    /// The spelled name of a call-like node's callee (`get`, `foreach`, ...).
    #[must_use]
    pub fn callee_name(&self) -> Option<&'a str> {
        match self.callee()? {
            Expression::Path(p) => Some(p.original.as_str()),
            Expression::Literal(l) => Some(l.original.as_str()),
            Expression::SubExpression(_) => None,
        }
    }

    /// Positional arguments of call-like nodes (empty otherwise).
    #[must_use]
    pub fn params(&self) -> &'a [Expression] {
        match *self {
            Self::Mustache(n) => &n.params,
            Self::Block(n) => &n.params,
            Self::SubExpression(n) => &n.params,
            Self::DecoratorBlock(n) => &n.params,
            Self::Partial(n) => &n.params,
            Self::PartialBlock(n) => &n.params,
            _ => &[],
        }
    }

    /// Named arguments of call-like nodes.
    #[must_use]
    pub fn hash(&self) -> Option<&'a Hash> {
        match *self {
            Self::Mustache(n) => Some(&n.hash),
            Self::Block(n) => Some(&n.hash),
            Self::SubExpression(n) => Some(&n.hash),
            Self::DecoratorBlock(n) => Some(&n.hash),
            Self::Partial(n) => Some(&n.hash),
            Self::PartialBlock(n) => Some(&n.hash),
            _ => None,
        }
    }

    /// Identity comparison: both views refer to the same node.
    #[must_use]
    pub fn is_same(&self, other: &NodeRef<'_>) -> bool {
        self.kind() == other.kind() && self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match *self {
            Self::Program(n) => erase(n),
            Self::Mustache(n) => erase(n),
            Self::Block(n) => erase(n),
            Self::Partial(n) => erase(n),
            Self::PartialBlock(n) => erase(n),
            Self::Path(n) => erase(n),
            Self::SubExpression(n) => erase(n),
            Self::DecoratorBlock(n) => erase(n),
            Self::Content(n) => erase(n),
            Self::Comment(n) => erase(n),
        }
    }
}

fn erase<T>(node: &T) -> *const () {
    (node as *const T).cast()
}
