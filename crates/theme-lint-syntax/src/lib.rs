//! # theme-lint-syntax
//!
//! Handlebars front end for theme-lint.
//!
//! This crate turns template text into the node model the linter walks:
//!
//! - [`ast`]: the closed set of template nodes ([`ast::Program`],
//!   [`ast::BlockStatement`], [`ast::PathExpression`], ...) and the borrowed
//!   [`ast::NodeRef`] view used during traversal
//! - [`parse`]: a hand-written Handlebars parser producing that tree
//! - [`ParseError`]: the `{message, line, column}` failure report
//!
//! Lines are 1-based and columns are 0-based, so the outermost program of
//! every template starts at `1:0`.
//!
//! ## Example
//!
//! ```
//! let program = theme_lint_syntax::parse("{{#foreach posts}}{{title}}{{/foreach}}")?;
//! assert_eq!(program.body.len(), 1);
//! # Ok::<(), theme_lint_syntax::ParseError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod error;
mod parser;

pub use error::ParseError;
pub use parser::{parse, ParseResult};
