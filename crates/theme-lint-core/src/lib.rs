//! # theme-lint-core
//!
//! Core engine for linting Handlebars themes.
//!
//! This crate provides the building blocks every rule runs on:
//!
//! - [`Scope`] tracks the lexical frames open at each node
//! - [`Rule`] trait for rules that react to node kinds
//! - [`Linter`] composes any number of rules into one traversal
//! - [`PartialWalker`] follows `{{> partial}}` includes across files
//! - [`Analyzer`] discovers and lints a whole theme directory
//!
//! | Rule | Code | Records |
//! |------|------|---------|
//! | `mark-used-partials` | TL100 | partial references |
//! | `mark-used-helpers` | TL101 | helper and ambiguous calls |
//! | `mark-declared-inline-partials` | TL102 | `{{#*inline}}` declarations |
//! | `mark-used-custom-theme-settings` | TL103 | `@custom.*` references |
//! | `mark-used-page-properties` | TL104 | `@page.*` references |
//!
//! ## Example
//!
//! ```ignore
//! use theme_lint_core::{Analyzer, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-theme")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod catalog;
mod config;
mod context;
mod linter;
mod markers;
mod partials;
mod rule;
mod scope;
mod types;

/// Validation of custom theme setting declarations.
pub mod visibility;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, MANIFEST_FILE};
pub use catalog::{
    load_custom_theme_settings, Catalog, CustomThemeSetting, ManifestError, SettingType,
    SettingValue, DEFAULT_HELPERS,
};
pub use config::{AnalyzerConfig, CatalogConfig, Config, ConfigError, RuleConfig};
pub use context::{
    is_inline_partial_visible, snapshot_chain, HelperKind, InlinePartial, NodeSnapshot,
    RunContext, ThemeUsage, UsedHelper, UsedPartial,
};
pub use linter::{rule_refs, Linter, VerifyOptions, PARSE_ERROR_CODE, PARSE_ERROR_NAME};
pub use markers::{
    usage_markers, MarkDeclaredInlinePartials, MarkUsedCustomThemeSettings, MarkUsedHelpers,
    MarkUsedPageProperties, MarkUsedPartials,
};
pub use partials::{
    normalize_path, FileSet, PartialCache, PartialWalker, ThemeFile, PARTIALS_DIR,
    TEMPLATE_EXTENSION,
};
pub use rule::{source_for_span, Rule, RuleBox, RuleContext};
pub use scope::{
    template_contexts, ContextTag, Frame, Scope, FRAMELESS_HELPERS, GLOBALS, LOOP_DATA,
};
pub use types::{
    offset_for, Diagnostic, DiagnosticReport, LintResult, Location, Severity, Suggestion,
};
pub use utils::allowance::{AllowCheck, AllowDirective};
