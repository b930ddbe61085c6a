//! Helper classification of call-like nodes.
//!
//! ```text
//! {{foreach posts}}   helper     (has arguments)
//! {{#post}}           helper     (block)
//! {{(img_url x)}}     helper     (sub-expression)
//! {{asset}}           helper     (bare name of a known helper)
//! {{headline}}        ambiguous  (unknown bare name, decided at render time)
//! {{post.title}}      simple     (multi-segment path)
//! {{item}}            simple     (block param)
//! ```

use theme_lint_syntax::ast::{Expression, NodeRef, PathExpression};

use crate::catalog::Catalog;
use crate::context::HelperKind;
use crate::scope::Scope;

/// Returns the callee of a call-like node as a path.
///
/// A literal used as a helper name (`{{"foo" bar}}`) is canonicalized into
/// the equivalent path. Sub-expression callees have no path.
#[must_use]
pub fn callee_path(node: &NodeRef<'_>) -> Option<PathExpression> {
    match node.callee()? {
        Expression::Path(path) => Some(path.clone()),
        Expression::Literal(literal) => Some(PathExpression::from_literal(literal)),
        Expression::SubExpression(_) => None,
    }
}

/// Classifies a mustache, block or sub-expression.
///
/// Other node kinds are always [`HelperKind::Simple`].
#[must_use]
pub fn classify(node: &NodeRef<'_>, scope: &Scope<'_>, catalog: &Catalog) -> HelperKind {
    if !matches!(
        node,
        NodeRef::Mustache(_) | NodeRef::Block(_) | NodeRef::SubExpression(_)
    ) {
        return HelperKind::Simple;
    }
    let Some(path) = callee_path(node) else {
        return HelperKind::Simple;
    };
    if !path.is_simple() || is_block_param(&path, scope) {
        return HelperKind::Simple;
    }
    let has_arguments =
        !node.params().is_empty() || node.hash().is_some_and(|h| !h.pairs.is_empty());
    let known = path.head().is_some_and(|head| catalog.helpers.contains(head));
    if known || has_arguments || matches!(node, NodeRef::Block(_) | NodeRef::SubExpression(_)) {
        HelperKind::Helper
    } else {
        HelperKind::Ambiguous
    }
}

fn is_block_param(path: &PathExpression, scope: &Scope<'_>) -> bool {
    path.head().is_some_and(|head| {
        scope
            .frames()
            .iter()
            .any(|f| f.block_params.iter().any(|p| p == head))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_lint_syntax::ast::{Program, Statement};

    fn first(program: &Program) -> NodeRef<'_> {
        program.body[0].as_node()
    }

    fn classify_source(source: &str) -> HelperKind {
        let program = theme_lint_syntax::parse(source).unwrap();
        classify(&first(&program), &Scope::new(), &Catalog::with_default_helpers())
    }

    #[test]
    fn classifies_call_sites() {
        assert_eq!(classify_source("{{foreach posts}}"), HelperKind::Helper);
        assert_eq!(classify_source("{{asset \"x.css\"}}"), HelperKind::Helper);
        assert_eq!(classify_source("{{url absolute=true}}"), HelperKind::Helper);
        assert_eq!(classify_source("{{#post}}x{{/post}}"), HelperKind::Helper);
        assert_eq!(classify_source("{{headline}}"), HelperKind::Ambiguous);
        assert_eq!(classify_source("{{post.title}}"), HelperKind::Simple);
        assert_eq!(classify_source("{{@site.title}}"), HelperKind::Simple);
        assert_eq!(classify_source("{{../title}}"), HelperKind::Simple);
        assert_eq!(classify_source("hello"), HelperKind::Simple);
    }

    #[test]
    fn bare_known_helpers_are_not_ambiguous() {
        assert_eq!(classify_source("{{asset}}"), HelperKind::Helper);
        assert_eq!(classify_source("{{title}}"), HelperKind::Helper);

        let program = theme_lint_syntax::parse("{{asset}}").unwrap();
        assert_eq!(
            classify(&first(&program), &Scope::new(), &Catalog::new()),
            HelperKind::Ambiguous
        );
    }

    #[test]
    fn literal_callee_is_canonicalized() {
        let program = theme_lint_syntax::parse("{{\"t\" \"Hello\"}}").unwrap();
        let node = first(&program);
        let path = callee_path(&node).unwrap();
        assert_eq!(path.original, "t");
        assert!(path.is_simple());
        assert_eq!(classify(&node, &Scope::new(), &Catalog::new()), HelperKind::Helper);
    }

    #[test]
    fn block_params_shadow_helpers() {
        let program =
            theme_lint_syntax::parse("{{#foreach posts as |card|}}{{card}}{{/foreach}}").unwrap();
        let Statement::Block(block) = &program.body[0] else {
            panic!("expected block");
        };
        let inner = block.program.as_ref().unwrap().body[0].as_node();

        let mut scope = Scope::new();
        scope.push_frame(NodeRef::Block(block));
        let catalog = Catalog::new();
        assert_eq!(classify(&inner, &scope, &catalog), HelperKind::Simple);
        assert_eq!(classify(&inner, &Scope::new(), &catalog), HelperKind::Ambiguous);
    }
}
