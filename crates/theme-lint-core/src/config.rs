//! Configuration types for theme-lint.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::catalog::CustomThemeSetting;

/// Top-level configuration for theme-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit code (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Extra reference data merged into the catalog.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Theme root directory (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether to read custom theme settings from the theme's `package.json`.
    #[serde(default = "default_true")]
    pub read_manifest: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/node_modules/**".to_string(), "**/assets/built/**".to_string()],
            respect_gitignore: true,
            read_manifest: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Extra helpers, partials and custom settings known to the theme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Helpers registered outside the theme (e.g. by an app plugin).
    #[serde(default)]
    pub helpers: Vec<String>,

    /// Partials provided outside the theme's `partials/` directory.
    #[serde(default)]
    pub partials: Vec<String>,

    /// Custom theme settings, in addition to those in `package.json`.
    #[serde(default)]
    pub custom: BTreeMap<String, CustomThemeSetting>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SettingType;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.analyzer.read_manifest);
        assert!(config.rules.is_empty());
        assert!(config.catalog.helpers.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"

[analyzer]
root = "./theme"
exclude = ["**/vendor/**"]

[catalog]
helpers = ["reading_time_plus"]
partials = ["shared/footer"]

[catalog.custom.header_style]
type = "select"
options = ["Landing", "Search"]
default = "Landing"

[rules.no-unknown-helpers]
enabled = true
severity = "warning"
ignore = ["legacy_helper"]

[rules.no-nested-async-helpers]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.analyzer.root, PathBuf::from("./theme"));
        assert_eq!(config.catalog.helpers, vec!["reading_time_plus"]);
        assert_eq!(
            config.catalog.custom["header_style"].kind,
            SettingType::Select
        );
        assert!(config.is_rule_enabled("no-unknown-helpers"));
        assert!(!config.is_rule_enabled("no-nested-async-helpers"));
        assert!(config.is_rule_enabled("unconfigured"));
        assert_eq!(
            config.rule_severity("no-unknown-helpers"),
            Some(crate::Severity::Warning)
        );

        let rule_config = config.rules.get("no-unknown-helpers").unwrap();
        assert_eq!(rule_config.get_str_array("ignore"), vec!["legacy_helper"]);
        assert!(rule_config.get_bool("missing", true));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::parse("preset = ["),
            Err(ConfigError::Parse { .. })
        ));
    }
}
