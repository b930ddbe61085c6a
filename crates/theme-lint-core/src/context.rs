//! Per-run accumulator written by the usage-marking rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use theme_lint_syntax::ast::{NodeKind, NodeRef, SourceLocation};

/// Type and location of a node, detached from the tree.
///
/// Used to compare ancestor chains across traversals: two snapshots match
/// when kind and span are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeSnapshot {
    /// Node kind.
    pub kind: NodeKind,
    /// Node span.
    pub loc: SourceLocation,
}

impl NodeSnapshot {
    /// Snapshots a borrowed node.
    #[must_use]
    pub fn of(node: &NodeRef<'_>) -> Self {
        Self {
            kind: node.kind(),
            loc: node.loc(),
        }
    }
}

/// Snapshots a chain of ancestors, outermost first.
#[must_use]
pub fn snapshot_chain(parents: &[NodeRef<'_>]) -> Vec<NodeSnapshot> {
    parents.iter().map(NodeSnapshot::of).collect()
}

/// Decides whether an inline partial declared under `declared_in` can be
/// used from a site under `used_in`. Both chains are outermost first.
///
/// The declaration's ancestors are scanned from the nearest outward. The
/// first one also present in the usage chain proves a shared scope. A block
/// boundary, or the body or inverse program directly under one, reached
/// before that closes the declaration off. An exhausted chain means the
/// declaration sits at the top of its tree and is visible everywhere below
/// it.
#[must_use]
pub fn is_inline_partial_visible(declared_in: &[NodeSnapshot], used_in: &[NodeSnapshot]) -> bool {
    for (index, ancestor) in declared_in.iter().enumerate().rev() {
        if used_in.contains(ancestor) {
            return true;
        }
        let block_body = ancestor.kind == NodeKind::Program
            && index
                .checked_sub(1)
                .is_some_and(|outer| declared_in[outer].kind.is_block_boundary());
        if block_body || ancestor.kind.is_block_boundary() {
            return false;
        }
    }
    true
}

/// A `{{> name}}` or `{{#> name}}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedPartial {
    /// Name as written (source text for dynamic names).
    pub name: String,
    /// Name with path separators forced to `/`.
    pub normalized_name: String,
    /// Span of the partial statement.
    pub loc: SourceLocation,
    /// Source text of each positional argument.
    pub params: Vec<String>,
    /// Ancestors of the usage site, outermost first.
    pub parents: Vec<NodeSnapshot>,
    /// Name is computed by a sub-expression.
    pub dynamic: bool,
}

/// How a call-like node resolves at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelperKind {
    /// Certainly a helper call.
    Helper,
    /// A bare name that is not a known helper; resolved at render time.
    Ambiguous,
    /// A plain property lookup.
    Simple,
}

/// A helper reference recorded during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedHelper {
    /// Helper name.
    pub name: String,
    /// Classification of the call site.
    pub kind: HelperKind,
    /// Kind of the calling node.
    pub node: NodeKind,
    /// Span of the calling node.
    pub loc: SourceLocation,
}

/// An inline partial declared with `{{#*inline "name"}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePartial {
    /// Declared name.
    pub name: String,
    /// Ancestors of the declaration, outermost first. Empty for
    /// declarations inherited from an including template.
    pub parents: Vec<NodeSnapshot>,
    /// Span of the decorator block.
    pub loc: SourceLocation,
}

impl InlinePartial {
    /// Returns a copy visible to everything below an include.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            parents: Vec::new(),
            ..self.clone()
        }
    }
}

/// Usage recorded by one `Linter::verify` call.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Partial references, in traversal order.
    pub partials: Vec<UsedPartial>,
    /// Helper and ambiguous references, in traversal order.
    pub helpers: Vec<UsedHelper>,
    /// Inline partials declared in this template.
    pub inline_partials: Vec<InlinePartial>,
    /// `@custom.*` setting names, first use order, no duplicates.
    pub custom_theme_settings: Vec<String>,
    /// `@page.*` property names, first use order, no duplicates.
    pub used_page_properties: Vec<String>,
}

impl RunContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a custom theme setting reference.
    pub fn mark_custom_theme_setting(&mut self, name: &str) {
        if !self.custom_theme_settings.iter().any(|s| s == name) {
            self.custom_theme_settings.push(name.to_string());
        }
    }

    /// Records a page property reference.
    pub fn mark_page_property(&mut self, name: &str) {
        if !self.used_page_properties.iter().any(|p| p == name) {
            self.used_page_properties.push(name.to_string());
        }
    }
}

/// Theme-wide usage, merged from every template's [`RunContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeUsage {
    /// Helper names.
    pub helpers: BTreeSet<String>,
    /// Partial names.
    pub partials: BTreeSet<String>,
    /// Custom theme setting names.
    pub custom_theme_settings: BTreeSet<String>,
    /// Page properties.
    pub page_properties: BTreeSet<String>,
}

impl ThemeUsage {
    /// Merges one run's usage into the totals.
    pub fn absorb(&mut self, context: &RunContext) {
        self.helpers
            .extend(context.helpers.iter().map(|h| h.name.clone()));
        self.partials.extend(
            context
                .partials
                .iter()
                .filter(|p| !p.dynamic)
                .map(|p| p.normalized_name.clone()),
        );
        self.custom_theme_settings
            .extend(context.custom_theme_settings.iter().cloned());
        self.page_properties
            .extend(context.used_page_properties.iter().cloned());
    }
}
