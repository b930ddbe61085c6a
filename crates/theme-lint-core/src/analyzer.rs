//! Theme-wide analysis: discovery, partial walking and result assembly.

use crate::catalog::{load_custom_theme_settings, Catalog, ManifestError};
use crate::config::{Config, RuleConfig};
use crate::linter::{rule_refs, PARSE_ERROR_NAME};
use crate::partials::{normalize_path, FileSet, PartialWalker, ThemeFile, TEMPLATE_EXTENSION};
use crate::rule::{Rule, RuleBox};
use crate::types::{Diagnostic, LintResult};
use crate::visibility::validate_custom_theme_settings;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the theme manifest holding custom setting declarations.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the theme directory.
    #[error("Failed to walk theme directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Theme manifest could not be read.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    catalog: Option<Catalog>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the theme root directory.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the base catalog (default: [`Catalog::with_default_helpers`]).
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut catalog = self
            .catalog
            .unwrap_or_else(Catalog::with_default_helpers)
            .helpers(config.catalog.helpers.iter().cloned())
            .partials(config.catalog.partials.iter().cloned());
        catalog
            .custom_theme_settings
            .extend(config.catalog.custom.clone());

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            exclude,
            config,
            catalog,
        })
    }
}

/// Lints every template of a theme.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    catalog: Catalog,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the theme root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the exclude patterns in effect.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Returns the base catalog, before theme partials and the manifest are
    /// merged in.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Discovers, parses and lints the theme under the root directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the theme cannot be walked, a template cannot be
    /// read, or the manifest is malformed.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut files = Vec::new();
        for path in self.discover_files()? {
            let content = std::fs::read_to_string(&path)?;
            let name = path.strip_prefix(&self.root).unwrap_or(&path);
            files.push(ThemeFile::new(name.to_string_lossy(), content));
        }
        info!("Found {} templates to analyze", files.len());

        let mut catalog = self.catalog.clone();
        let manifest = self.root.join(MANIFEST_FILE);
        if self.config.analyzer.read_manifest && manifest.is_file() {
            let settings = load_custom_theme_settings(&manifest)?;
            debug!(count = settings.len(), "custom theme settings loaded from manifest");
            for (name, setting) in settings {
                catalog.custom_theme_settings.entry(name).or_insert(setting);
            }
        }

        Ok(self.analyze_files(&FileSet::new(files), catalog))
    }

    /// Lints an already loaded theme.
    ///
    /// Every top-level template is walked with its partials first; partials
    /// no template reaches are then linted on their own. Each partial is
    /// linted once per call.
    #[must_use]
    pub fn analyze_files(&self, files: &FileSet, catalog: Catalog) -> LintResult {
        let catalog = catalog.partials(files.partial_names().map(String::from));

        let rules: Vec<&dyn Rule> = rule_refs(&self.rules)
            .into_iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let mut walker = PartialWalker::new(files, &catalog, rules);
        let mut diagnostics = Vec::new();
        for template in files.templates() {
            diagnostics.extend(walker.check(template, &[]));
        }
        for partial in files.iter().filter(|f| f.is_partial()) {
            if !walker.is_cached(&partial.normalized_file) {
                debug!(partial = %partial.normalized_file, "linting unreached partial");
                diagnostics.extend(walker.check(partial, &[]));
            }
        }
        let files_checked = walker.verified();

        diagnostics.extend(validate_custom_theme_settings(&catalog));

        let mut result = LintResult {
            diagnostics: self.apply_severity_overrides(diagnostics),
            files_checked,
            usage: walker.into_usage(),
        };
        result.sort();

        info!(
            "Analysis complete: {} diagnostics in {} templates",
            result.diagnostics.len(),
            result.files_checked
        );
        result
    }

    /// Applies severity overrides from configuration. Parse failures keep
    /// their severity.
    fn apply_severity_overrides(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        for d in &mut diagnostics {
            if d.rule == PARSE_ERROR_NAME {
                continue;
            }
            if let Some(severity) = self.config.rule_severity(&d.rule) {
                d.severity = severity;
            }
        }
        diagnostics
    }

    /// Discovers every template under the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !path.to_string_lossy().ends_with(TEMPLATE_EXTENSION) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        if files.is_empty() {
            warn!("No templates found under {}", self.root.display());
        }
        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = normalize_path(&relative.to_string_lossy());
        let options = glob::MatchOptions {
            require_literal_separator: false,
            ..glob::MatchOptions::new()
        };

        self.exclude.iter().any(|pattern| {
            pattern.matches_with(&relative, options)
                || pattern.matches_with(&format!("/{relative}"), options)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
        assert!(analyzer.catalog().helpers.contains("foreach"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/theme")
            .exclude("**/node_modules/**")
            .exclude("assets/built/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/theme/node_modules/pkg/x.hbs")));
        assert!(analyzer.should_exclude(Path::new("/theme/assets/built/a.hbs")));
        assert!(!analyzer.should_exclude(Path::new("/theme/partials/card.hbs")));
    }

    #[test]
    fn test_config_merges_into_catalog() {
        let config = Config::parse(
            r#"
[catalog]
helpers = ["my_helper"]
partials = ["shared/footer"]
"#,
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .root(".")
            .config(config)
            .build()
            .unwrap();
        assert!(analyzer.catalog().helpers.contains("my_helper"));
        assert!(analyzer.catalog().partials.contains("shared/footer"));
    }

    #[test]
    fn test_parse_failure_survives_severity_override() {
        let config = Config::parse(
            r#"
[rules.parse-error]
severity = "info"
"#,
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .root(".")
            .config(config)
            .build()
            .unwrap();
        let files = FileSet::new(vec![ThemeFile::new("index.hbs", "{{title")]);
        let result = analyzer.analyze_files(&files, Catalog::with_default_helpers());
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].fatal);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
    }
}
