//! Check command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;
use theme_lint_core::{Analyzer, Config, RuleBox, Severity};
use theme_lint_rules::{all_rules, NoUnknownHelpers, NoUnknownPartials, Preset};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of `theme-lint check`.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// How to print results.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes; overrides the preset.
    pub rules: Option<String>,
    /// Preset given on the command line.
    pub preset: Option<Preset>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
}

/// Runs the check command. Returns `false` when diagnostics reach the
/// failure threshold.
pub fn run(path: &Path, options: CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let threshold = fail_threshold(&config)?;

    let rules = match &options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names)
        }
        None => preset_for(options.preset, &config)?.rules(),
    };
    let rules: Vec<RuleBox> = rules.into_iter().map(|r| configure(r, &config)).collect();

    let mut builder = Analyzer::builder().root(path).config(config);
    builder = builder.excludes(options.exclude);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Linting {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(!result.has_diagnostics_at(threshold))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn fail_threshold(config: &Config) -> Result<Severity> {
    match config.fail_on.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("error") => Ok(Severity::Error),
        Some("warning") => Ok(Severity::Warning),
        Some("info") => Ok(Severity::Info),
        Some(other) => bail!("Invalid fail_on value {other:?}: expected error, warning or info"),
    }
}

fn preset_for(cli: Option<Preset>, config: &Config) -> Result<Preset> {
    if let Some(preset) = cli {
        return Ok(preset);
    }
    match config.preset.as_deref() {
        None => Ok(Preset::Recommended),
        Some(name) => Preset::from_name(name)
            .with_context(|| format!("Unknown preset {name:?}: expected recommended, strict or minimal")),
    }
}

/// Picks rules by name or code, in the order given.
fn filter_rules(names: &[&str]) -> Vec<RuleBox> {
    let mut available = all_rules();
    let mut selected: Vec<RuleBox> = Vec::new();

    for name in names.iter().filter(|n| !n.is_empty()) {
        let matches = |rule: &RuleBox| rule.name() == *name || rule.code().eq_ignore_ascii_case(name);
        if selected.iter().any(matches) {
            continue;
        }
        match available.iter().position(matches) {
            Some(index) => selected.push(available.swap_remove(index)),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    selected
}

/// Applies rule-specific options from the config.
fn configure(rule: RuleBox, config: &Config) -> RuleBox {
    let Some(rule_config) = config.rules.get(rule.name()) else {
        return rule;
    };
    let allowed = rule_config.get_str_array("allowed");
    if allowed.is_empty() {
        return rule;
    }
    match rule.name() {
        "no-unknown-helpers" => Box::new(NoUnknownHelpers::new().allow(allowed)),
        "no-unknown-partials" => Box::new(NoUnknownPartials::new().allow(allowed)),
        _ => rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn filter_accepts_names_and_codes() {
        let rules = filter_rules(&["TL004", "no-unknown-partials", "tl004", "nope", ""]);
        assert_eq!(names(&rules), vec!["no-nested-async-helpers", "no-unknown-partials"]);
    }

    #[test]
    fn preset_resolution() {
        let mut config = Config::default();
        assert_eq!(preset_for(None, &config).unwrap(), Preset::Recommended);

        config.preset = Some("minimal".to_string());
        assert_eq!(preset_for(None, &config).unwrap(), Preset::Minimal);
        assert_eq!(preset_for(Some(Preset::Strict), &config).unwrap(), Preset::Strict);

        config.preset = Some("lenient".to_string());
        assert!(preset_for(None, &config).is_err());
    }

    #[test]
    fn fail_threshold_parsing() {
        let mut config = Config::default();
        assert_eq!(fail_threshold(&config).unwrap(), Severity::Error);
        config.fail_on = Some("Warning".to_string());
        assert_eq!(fail_threshold(&config).unwrap(), Severity::Warning);
        config.fail_on = Some("never".to_string());
        assert!(fail_threshold(&config).is_err());
    }

    #[test]
    fn run_reports_failure_and_honours_allow_lists() {
        let theme = tempfile::tempdir().unwrap();
        fs::write(theme.path().join("index.hbs"), "{{sparkle title}}{{> shared/nav}}").unwrap();

        let options = || CheckOptions {
            format: OutputFormat::Compact,
            rules: Some("no-unknown-helpers,no-unknown-partials".to_string()),
            ..CheckOptions::default()
        };
        assert!(!run(theme.path(), options(), &ConfigSource::Default).unwrap());

        let config = theme.path().join("theme-lint.toml");
        fs::write(
            &config,
            r#"
[rules.no-unknown-helpers]
allowed = ["sparkle"]

[rules.no-unknown-partials]
allowed = ["shared/nav"]
"#,
        )
        .unwrap();
        assert!(run(theme.path(), options(), &ConfigSource::Project(config)).unwrap());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let theme = tempfile::tempdir().unwrap();
        let source = ConfigSource::Explicit(theme.path().join("missing.toml"));
        let err = run(theme.path(), CheckOptions::default(), &source).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
