//! List rules command implementation.

use std::fmt::Write as _;
use theme_lint_core::Severity;
use theme_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

fn codes(preset: Preset) -> String {
    preset
        .rules()
        .iter()
        .map(|r| r.code())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render() -> String {
    let mut out = String::from("Available rules:\n\n");
    let _ = writeln!(out, "{:<7} {:<47} {:<8} Description", "Code", "Name", "Level");
    let _ = writeln!(out, "{}", "-".repeat(110));

    for rule in all_rules() {
        let level = match rule.default_severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        let _ = writeln!(
            out,
            "{:<7} {:<47} {:<8} {}",
            rule.code(),
            rule.name(),
            level,
            rule.description()
        );
    }

    let _ = writeln!(out, "\nPresets:");
    let _ = writeln!(out, "  recommended  - {} (default)", codes(Preset::Recommended));
    let _ = writeln!(out, "  strict       - all rules");
    let _ = writeln!(out, "  minimal      - {}", codes(Preset::Minimal));

    let _ = writeln!(out, "\nUse --rules to pick specific rules, e.g.:");
    let _ = writeln!(out, "  theme-lint check --rules no-unknown-partials,no-unknown-helpers");
    let _ = writeln!(out, "  theme-lint check --rules TL001,TL004");
    out
}
