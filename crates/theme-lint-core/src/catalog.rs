//! Known helpers, partials and custom theme settings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Helpers available to every theme.
pub const DEFAULT_HELPERS: &[&str] = &[
    // handlebars built-ins
    "each",
    "if",
    "unless",
    "with",
    "lookup",
    "log",
    // theme helpers
    "asset",
    "author",
    "authors",
    "body_class",
    "cancel_link",
    "collection",
    "comment_count",
    "comments",
    "concat",
    "content",
    "date",
    "encode",
    "excerpt",
    "facebook_url",
    "foreach",
    "get",
    "ghost_foot",
    "ghost_head",
    "has",
    "img_url",
    "is",
    "link",
    "link_class",
    "match",
    "meta_description",
    "meta_title",
    "navigation",
    "next_post",
    "page_url",
    "pagination",
    "plural",
    "post",
    "post_class",
    "prev_post",
    "price",
    "raw",
    "reading_time",
    "readable_url",
    "recommendations",
    "search",
    "social_url",
    "split",
    "t",
    "tags",
    "tiers",
    "title",
    "total_members",
    "total_paid_members",
    "twitter_url",
    "url",
];

/// Kind of a custom theme setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// One of a fixed list of options.
    Select,
    /// On/off switch.
    Boolean,
    /// Hex color.
    Color,
    /// Uploaded image.
    Image,
    /// Free text.
    Text,
    /// Any type this version does not know.
    #[serde(other)]
    Unknown,
}

/// Default value of a custom theme setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// `true` / `false`
    Flag(bool),
    /// Any text value.
    Text(String),
}

impl SettingValue {
    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }
}

/// One `config.custom` entry of a theme manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomThemeSetting {
    /// Setting kind.
    #[serde(rename = "type")]
    pub kind: SettingType,
    /// Allowed values for select settings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Value used until the site owner changes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SettingValue>,
    /// Filter expression deciding when the setting is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Settings group (`site`, `homepage`, `post`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl CustomThemeSetting {
    /// Creates a select setting.
    #[must_use]
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: SettingType::Select,
            options: options.into_iter().map(Into::into).collect(),
            default: None,
            visibility: None,
            group: None,
        }
    }

    /// Creates a setting of a non-select kind.
    #[must_use]
    pub fn of_kind(kind: SettingType) -> Self {
        Self {
            kind,
            options: Vec::new(),
            default: None,
            visibility: None,
            group: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: SettingValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the visibility expression.
    #[must_use]
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }
}

/// Reference data rules validate templates against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Known helper names.
    pub helpers: BTreeSet<String>,
    /// Known partial names (`card`, `icons/twitter`).
    pub partials: BTreeSet<String>,
    /// Declared custom theme settings.
    pub custom_theme_settings: BTreeMap<String, CustomThemeSetting>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with [`DEFAULT_HELPERS`].
    #[must_use]
    pub fn with_default_helpers() -> Self {
        Self::new().helpers(DEFAULT_HELPERS.iter().copied())
    }

    /// Adds known helpers.
    #[must_use]
    pub fn helpers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.helpers.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds known partials.
    #[must_use]
    pub fn partials<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partials.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares a custom theme setting.
    #[must_use]
    pub fn custom_theme_setting(
        mut self,
        name: impl Into<String>,
        setting: CustomThemeSetting,
    ) -> Self {
        self.custom_theme_settings.insert(name.into(), setting);
        self
    }

    /// Returns the setting if `name` is a select setting.
    #[must_use]
    pub fn select_setting(&self, name: &str) -> Option<&CustomThemeSetting> {
        self.custom_theme_settings
            .get(name)
            .filter(|s| s.kind == SettingType::Select)
    }
}

/// Errors reading a theme manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// IO error reading the manifest.
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Manifest is not valid JSON or has the wrong shape.
    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    config: ManifestConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestConfig {
    #[serde(default)]
    custom: BTreeMap<String, CustomThemeSetting>,
}

/// Reads the `config.custom` section of a theme's `package.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid manifest.
pub fn load_custom_theme_settings(
    path: &Path,
) -> Result<BTreeMap<String, CustomThemeSetting>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_custom_theme_settings(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_custom_theme_settings(
    content: &str,
) -> Result<BTreeMap<String, CustomThemeSetting>, serde_json::Error> {
    let manifest: Manifest = serde_json::from_str(content)?;
    Ok(manifest.config.custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_knows_core_helpers() {
        let catalog = Catalog::with_default_helpers();
        for name in ["foreach", "get", "ghost_head", "if", "match", "img_url"] {
            assert!(catalog.helpers.contains(name), "{name} missing");
        }
        assert!(catalog.partials.is_empty());
    }

    #[test]
    fn parses_manifest_custom_settings() {
        let json = r#"{
            "name": "casper",
            "config": {
                "posts_per_page": 25,
                "custom": {
                    "header_style": {
                        "type": "select",
                        "options": ["Landing", "Search", "Off"],
                        "default": "Landing"
                    },
                    "show_logo": { "type": "boolean", "default": true, "group": "homepage" },
                    "accent": { "type": "shiny" }
                }
            }
        }"#;

        let settings = parse_custom_theme_settings(json).unwrap();
        assert_eq!(settings.len(), 3);
        let header = &settings["header_style"];
        assert_eq!(header.kind, SettingType::Select);
        assert_eq!(header.default, Some(SettingValue::Text("Landing".into())));
        assert_eq!(settings["show_logo"].default, Some(SettingValue::Flag(true)));
        assert_eq!(settings["accent"].kind, SettingType::Unknown);
    }

    #[test]
    fn manifest_without_custom_section_is_empty() {
        let settings = parse_custom_theme_settings(r#"{"name": "plain"}"#).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn select_setting_filters_kind() {
        let catalog = Catalog::new()
            .custom_theme_setting("style", CustomThemeSetting::select(["a", "b"]))
            .custom_theme_setting("logo", CustomThemeSetting::of_kind(SettingType::Image));
        assert!(catalog.select_setting("style").is_some());
        assert!(catalog.select_setting("logo").is_none());
        assert!(catalog.select_setting("missing").is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_custom_theme_settings(Path::new("/nonexistent/package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}
