//! Cross-file partial resolution.
//!
//! [`PartialWalker::check`] lints a template, then follows every partial it
//! includes into the theme's `partials/` directory, recursively. Each partial
//! is linted once per walker: the first include wins and later includes
//! reuse the cached result, which also stops include cycles.

use std::collections::HashMap;

use theme_lint_syntax::ParseResult;
use tracing::debug;

use crate::catalog::Catalog;
use crate::context::{is_inline_partial_visible, InlinePartial, ThemeUsage};
use crate::linter::{Linter, VerifyOptions};
use crate::markers::usage_markers;
use crate::rule::{Rule, RuleBox};
use crate::types::Diagnostic;

/// Directory partial files live in, relative to the theme root.
pub const PARTIALS_DIR: &str = "partials/";

/// Template file extension.
pub const TEMPLATE_EXTENSION: &str = ".hbs";

/// Normalizes a file name to `/` separators.
#[must_use]
pub fn normalize_path(name: &str) -> String {
    name.replace('\\', "/")
}

/// One parsed template of a theme.
#[derive(Debug)]
pub struct ThemeFile {
    /// Name as given by the loader.
    pub file: String,
    /// Name relative to the theme root with `/` separators.
    pub normalized_file: String,
    /// Template text.
    pub content: String,
    /// Parser output for `content`.
    pub parsed: ParseResult,
}

impl ThemeFile {
    /// Parses `content` and builds a theme file.
    #[must_use]
    pub fn new(file: impl Into<String>, content: impl Into<String>) -> Self {
        let file = file.into();
        let content = content.into();
        let parsed = theme_lint_syntax::parse(&content);
        Self {
            normalized_file: normalize_path(&file),
            file,
            content,
            parsed,
        }
    }

    /// Returns true if this file lives under `partials/`.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.normalized_file.starts_with(PARTIALS_DIR)
    }

    /// Name other templates include this partial by (`card`, `icons/x`).
    #[must_use]
    pub fn partial_name(&self) -> Option<&str> {
        self.normalized_file
            .strip_prefix(PARTIALS_DIR)?
            .strip_suffix(TEMPLATE_EXTENSION)
    }
}

/// All templates of a theme, indexed by normalized name.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<ThemeFile>,
    index: HashMap<String, usize>,
}

impl FileSet {
    /// Builds a file set. Later files replace earlier ones with the same
    /// normalized name.
    #[must_use]
    pub fn new(files: Vec<ThemeFile>) -> Self {
        let mut set = Self::default();
        for file in files {
            set.insert(file);
        }
        set
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, file: ThemeFile) {
        if let Some(&slot) = self.index.get(&file.normalized_file) {
            self.files[slot] = file;
        } else {
            self.index
                .insert(file.normalized_file.clone(), self.files.len());
            self.files.push(file);
        }
    }

    /// Looks up a file by normalized name.
    #[must_use]
    pub fn get(&self, normalized_file: &str) -> Option<&ThemeFile> {
        self.index.get(normalized_file).map(|&i| &self.files[i])
    }

    /// Resolves an include name to its partial file.
    #[must_use]
    pub fn resolve_partial(&self, name: &str) -> Option<&ThemeFile> {
        self.get(&format!(
            "{PARTIALS_DIR}{}{TEMPLATE_EXTENSION}",
            normalize_path(name)
        ))
    }

    /// Include names of every partial file.
    pub fn partial_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().filter_map(ThemeFile::partial_name)
    }

    /// Every file, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ThemeFile> {
        self.files.iter()
    }

    /// Files that are not partials.
    pub fn templates(&self) -> impl Iterator<Item = &ThemeFile> {
        self.files.iter().filter(|f| !f.is_partial())
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the set has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Diagnostics of each partial already walked, by normalized file name.
pub type PartialCache = HashMap<String, Vec<Diagnostic>>;

/// Lints templates and the partials they include.
pub struct PartialWalker<'w> {
    files: &'w FileSet,
    catalog: &'w Catalog,
    markers: Vec<RuleBox>,
    rules: Vec<&'w dyn Rule>,
    cache: PartialCache,
    usage: ThemeUsage,
    verified: usize,
}

impl<'w> PartialWalker<'w> {
    /// Creates a walker running `rules` (plus the usage markers) over files
    /// of `files`.
    #[must_use]
    pub fn new(files: &'w FileSet, catalog: &'w Catalog, rules: Vec<&'w dyn Rule>) -> Self {
        Self {
            files,
            catalog,
            markers: usage_markers(),
            rules,
            cache: PartialCache::new(),
            usage: ThemeUsage::default(),
            verified: 0,
        }
    }

    /// Lints `file` and every partial reachable from it.
    ///
    /// `inline_partials` are declarations inherited from the including
    /// template. A partial already walked by this walker yields no
    /// diagnostics; its first walk reported them.
    pub fn check(&mut self, file: &ThemeFile, inline_partials: &[InlinePartial]) -> Vec<Diagnostic> {
        if file.is_partial() {
            if self.cache.contains_key(&file.normalized_file) {
                debug!(partial = %file.normalized_file, "partial already checked");
                return Vec::new();
            }
            self.cache.insert(file.normalized_file.clone(), Vec::new());
        }
        debug!(file = %file.normalized_file, inherited = inline_partials.len(), "checking template");

        let rules: Vec<&dyn Rule> = self
            .markers
            .iter()
            .map(|rule| &**rule)
            .chain(self.rules.iter().copied())
            .collect();
        let mut linter = Linter::new(self.catalog);
        let mut diagnostics = linter.verify(
            VerifyOptions::new(&file.content, &file.parsed, &file.normalized_file, rules)
                .inline_partials(inline_partials),
        );
        self.verified += 1;

        let context = linter.into_context();
        self.usage.absorb(&context);
        if file.is_partial() {
            self.cache
                .insert(file.normalized_file.clone(), diagnostics.clone());
        }

        let files = self.files;
        for used in &context.partials {
            if used.dynamic {
                continue;
            }
            let Some(target) = files.resolve_partial(&used.normalized_name) else {
                debug!(partial = %used.normalized_name, "partial target not found");
                continue;
            };
            let forwarded: Vec<InlinePartial> = inline_partials
                .iter()
                .chain(&context.inline_partials)
                .filter(|p| is_inline_partial_visible(&p.parents, &used.parents))
                .map(InlinePartial::detached)
                .collect();
            diagnostics.extend(self.check(target, &forwarded));
        }

        diagnostics
    }

    /// Returns true if the partial file was already walked.
    #[must_use]
    pub fn is_cached(&self, normalized_file: &str) -> bool {
        self.cache.contains_key(normalized_file)
    }

    /// Diagnostics per walked partial.
    #[must_use]
    pub fn cache(&self) -> &PartialCache {
        &self.cache
    }

    /// Number of `Linter::verify` calls made so far.
    #[must_use]
    pub fn verified(&self) -> usize {
        self.verified
    }

    /// Usage merged from every walked template.
    #[must_use]
    pub fn usage(&self) -> &ThemeUsage {
        &self.usage
    }

    /// Consumes the walker, returning merged usage.
    #[must_use]
    pub fn into_usage(self) -> ThemeUsage {
        self.usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_file_names() {
        let file = ThemeFile::new("partials\\icons\\twitter.hbs", "<svg/>");
        assert_eq!(file.normalized_file, "partials/icons/twitter.hbs");
        assert!(file.is_partial());
        assert_eq!(file.partial_name(), Some("icons/twitter"));

        let template = ThemeFile::new("post.hbs", "{{title}}");
        assert!(!template.is_partial());
        assert_eq!(template.partial_name(), None);
        assert!(template.parsed.is_ok());
    }

    #[test]
    fn file_set_resolves_partials() {
        let set = FileSet::new(vec![
            ThemeFile::new("index.hbs", "{{> card}}"),
            ThemeFile::new("partials/card.hbs", "card"),
            ThemeFile::new("partials/icons/x.hbs", "x"),
        ]);
        assert_eq!(set.len(), 3);
        assert!(set.resolve_partial("card").is_some());
        assert!(set.resolve_partial("icons\\x").is_some());
        assert!(set.resolve_partial("missing").is_none());
        let mut names: Vec<&str> = set.partial_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["card", "icons/x"]);
        assert_eq!(set.templates().count(), 1);
    }

    #[test]
    fn file_set_replaces_duplicates() {
        let set = FileSet::new(vec![
            ThemeFile::new("partials/card.hbs", "old"),
            ThemeFile::new("partials\\card.hbs", "new"),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("partials/card.hbs").unwrap().content, "new");
    }

    #[test]
    fn walker_follows_includes_and_records_usage() {
        let set = FileSet::new(vec![
            ThemeFile::new("index.hbs", "{{> card}}{{> missing}}"),
            ThemeFile::new("partials/card.hbs", "{{> icons/star}}{{@custom.accent}}"),
            ThemeFile::new("partials/icons/star.hbs", "{{asset \"star.svg\"}}"),
        ]);
        let catalog = Catalog::with_default_helpers();
        let mut walker = PartialWalker::new(&set, &catalog, Vec::new());
        let index = set.get("index.hbs").unwrap();
        let diagnostics = walker.check(index, &[]);

        assert!(diagnostics.is_empty());
        assert_eq!(walker.verified(), 3);
        assert!(walker.is_cached("partials/card.hbs"));
        assert!(walker.is_cached("partials/icons/star.hbs"));
        assert!(!walker.is_cached("index.hbs"));

        let usage = walker.into_usage();
        assert!(usage.partials.contains("missing"));
        assert!(usage.helpers.contains("asset"));
        assert!(usage.custom_theme_settings.contains("accent"));
    }

    #[test]
    fn walker_terminates_on_include_cycles() {
        let set = FileSet::new(vec![
            ThemeFile::new("index.hbs", "{{> a}}"),
            ThemeFile::new("partials/a.hbs", "{{> b}}"),
            ThemeFile::new("partials/b.hbs", "{{> a}}{{> b}}"),
        ]);
        let catalog = Catalog::new();
        let mut walker = PartialWalker::new(&set, &catalog, Vec::new());
        walker.check(set.get("index.hbs").unwrap(), &[]);
        assert_eq!(walker.verified(), 3);
    }
}
