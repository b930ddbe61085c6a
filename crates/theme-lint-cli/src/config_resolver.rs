//! Locating the configuration file for a theme.
//!
//! Priority order:
//!
//! 1. `--config` flag (or `$THEME_LINT_CONFIG`)
//! 2. `{theme}/theme-lint.toml` or `{theme}/.theme-lint.toml`
//! 3. `$THEME_LINT_CONFIG_DIR/config.toml`, else `~/.theme-lint/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found next to the theme.
    Project(PathBuf),
    /// Found in the user's global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Path of the config file, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config comes from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// File names looked up in the theme directory, in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["theme-lint.toml", ".theme-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "THEME_LINT_CONFIG_DIR";

/// Resolves the configuration for the theme at `theme_dir`.
#[must_use]
pub fn resolve(theme_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(theme_dir, explicit, global_config_dir())
}

fn resolve_in(theme_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| theme_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found theme config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Global config directory: `$THEME_LINT_CONFIG_DIR`, else `~/.theme-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".theme-lint"))
}
