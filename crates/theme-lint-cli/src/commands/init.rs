//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "theme-lint.toml";

const DEFAULT_CONFIG: &str = r#"# theme-lint configuration

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that fails the run: "error" (default), "warning" or "info"
# fail_on = "warning"

[analyzer]
# Theme root (default: current directory)
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/assets/built/**",
]

# Respect .gitignore files
respect_gitignore = true

# Read custom theme settings from package.json (config.custom)
read_manifest = true

[catalog]
# Helpers registered outside the theme
# helpers = ["my_helper"]

# Partials provided outside partials/
# partials = ["icons/custom"]

# Custom settings in addition to package.json
# [catalog.custom.header_style]
# type = "select"
# options = ["Landing", "Search"]
# default = "Landing"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-unknown-helpers]
enabled = true
# severity = "warning"
# allowed = ["my_helper"]

[rules.no-unknown-partials]
enabled = true
# allowed = ["provided/by-app"]

# [rules.no-limit-all-in-get-helper]
# severity = "error"
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: theme-lint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_lint_core::Config;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("no-unknown-helpers"));
        assert!(config.analyzer.read_manifest);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), false).unwrap();
        assert!(write_config(dir.path(), false).is_err());
        write_config(dir.path(), true).unwrap();
    }
}
