//! Validation of custom theme setting declarations.
//!
//! A setting's `visibility` is a filter expression over other settings:
//!
//! ```text
//! header_style:[Landing, Search]+show_logo:true
//! (navigation_layout:-Stacked,accent:-"#fff")
//! ```
//!
//! Conditions are `key:value`, `key:-value` (negated) or `key:[a, b]`,
//! joined with `+` (and) or `,` (or) and grouped with parentheses.

use crate::catalog::{Catalog, CustomThemeSetting, SettingType};
use crate::types::{Diagnostic, Location, Severity};

/// Rule code for custom setting validation.
pub const CODE: &str = "TL050";

/// Rule name for custom setting validation.
pub const NAME: &str = "valid-custom-theme-settings";

/// Module id diagnostics are reported against.
pub const MANIFEST: &str = "package.json";

/// One `key:value` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Setting the condition reads.
    pub key: String,
    /// Values compared against.
    pub values: Vec<String>,
    /// Condition is `key:-value`.
    pub negated: bool,
}

/// Parsed visibility expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// A single test.
    Condition(Condition),
    /// Every branch must hold (`+`).
    And(Vec<Filter>),
    /// Any branch may hold (`,`).
    Or(Vec<Filter>),
}

impl Filter {
    /// Every condition in the expression, left to right.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        match self {
            Self::Condition(c) => vec![c],
            Self::And(branches) | Self::Or(branches) => {
                branches.iter().flat_map(Self::conditions).collect()
            }
        }
    }
}

/// Malformed visibility expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct FilterError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the expression.
    pub offset: usize,
}

/// Parses a visibility expression.
///
/// # Errors
///
/// Returns an error describing the first syntax problem.
pub fn parse_filter(input: &str) -> Result<Filter, FilterError> {
    let mut parser = FilterParser { input, pos: 0 };
    let filter = parser.or()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected input"));
    }
    Ok(filter)
}

struct FilterParser<'s> {
    input: &'s str,
    pos: usize,
}

impl FilterParser<'_> {
    fn error(&self, message: &str) -> FilterError {
        FilterError {
            message: message.to_string(),
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Filter, FilterError> {
        let mut branches = vec![self.and()?];
        while self.eat(',') {
            branches.push(self.and()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Filter::Or(branches)
        })
    }

    fn and(&mut self) -> Result<Filter, FilterError> {
        let mut branches = vec![self.group()?];
        while self.eat('+') {
            branches.push(self.group()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Filter::And(branches)
        })
    }

    fn group(&mut self) -> Result<Filter, FilterError> {
        if self.eat('(') {
            let inner = self.or()?;
            if !self.eat(')') {
                return Err(self.error("expected `)`"));
            }
            return Ok(inner);
        }
        self.condition().map(Filter::Condition)
    }

    fn condition(&mut self) -> Result<Condition, FilterError> {
        self.skip_ws();
        let key = self.word();
        if key.is_empty() {
            return Err(self.error("expected a setting name"));
        }
        if !self.eat(':') {
            return Err(self.error("expected `:` after setting name"));
        }
        let negated = self.eat('-');
        let values = if self.eat('[') {
            let mut values = vec![self.value()?];
            while self.eat(',') {
                values.push(self.value()?);
            }
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            values
        } else {
            vec![self.value()?]
        };
        Ok(Condition {
            key,
            values,
            negated,
        })
    }

    fn value(&mut self) -> Result<String, FilterError> {
        self.skip_ws();
        if let Some(quote @ ('\'' | '"')) = self.peek() {
            self.pos += 1;
            let rest = &self.input[self.pos..];
            let Some(end) = rest.find(quote) else {
                return Err(self.error("unterminated quoted value"));
            };
            let value = rest[..end].to_string();
            self.pos += end + 1;
            return Ok(value);
        }
        let value = self.word();
        if value.is_empty() {
            return Err(self.error("expected a value"));
        }
        Ok(value)
    }

    fn word(&mut self) -> String {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '#')))
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }
}

/// Validates every custom theme setting of the catalog.
///
/// Reports select settings without options, defaults outside a select's
/// options, malformed visibility expressions, and visibility conditions
/// that name unknown settings or impossible select values.
#[must_use]
pub fn validate_custom_theme_settings(catalog: &Catalog) -> Vec<Diagnostic> {
    let settings = &catalog.custom_theme_settings;
    let mut diagnostics = Vec::new();
    let mut report = |message: String| {
        diagnostics.push(Diagnostic::new(
            CODE,
            NAME,
            Severity::Error,
            Location::new(MANIFEST, 1, 0),
            message,
        ));
    };

    for (name, setting) in settings {
        if setting.kind == SettingType::Select {
            check_select(name, setting, &mut report);
        }

        let Some(visibility) = &setting.visibility else {
            continue;
        };
        let filter = match parse_filter(visibility) {
            Ok(filter) => filter,
            Err(err) => {
                report(format!(
                    "Custom theme setting `{name}` has invalid visibility syntax: {err}"
                ));
                continue;
            }
        };
        for condition in filter.conditions() {
            let Some(target) = settings.get(&condition.key) else {
                report(format!(
                    "Custom theme setting `{name}` visibility references unknown setting `{}`",
                    condition.key
                ));
                continue;
            };
            if target.kind != SettingType::Select {
                continue;
            }
            for value in &condition.values {
                if !target.options.iter().any(|o| o.eq_ignore_ascii_case(value)) {
                    report(format!(
                        "Custom theme setting `{name}` visibility tests `{}` for `{value}`, which is not one of its options",
                        condition.key
                    ));
                }
            }
        }
    }

    diagnostics
}

fn check_select(name: &str, setting: &CustomThemeSetting, report: &mut impl FnMut(String)) {
    if setting.options.is_empty() {
        report(format!(
            "Custom theme setting `{name}` is a select but declares no options"
        ));
        return;
    }
    match setting.default.as_ref().and_then(|d| d.as_text()) {
        Some(default) if !setting.options.iter().any(|o| o == default) => report(format!(
            "Custom theme setting `{name}` default `{default}` is not one of its options"
        )),
        None => report(format!(
            "Custom theme setting `{name}` is a select but has no text default"
        )),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SettingValue;

    fn condition(key: &str, values: &[&str], negated: bool) -> Filter {
        Filter::Condition(Condition {
            key: key.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
            negated,
        })
    }

    #[test]
    fn parses_conditions_and_connectives() {
        assert_eq!(
            parse_filter("header_style:Landing").unwrap(),
            condition("header_style", &["Landing"], false)
        );
        assert_eq!(
            parse_filter("a:-x+b:[y, 'z w']").unwrap(),
            Filter::And(vec![
                condition("a", &["x"], true),
                condition("b", &["y", "z w"], false),
            ])
        );
        assert_eq!(
            parse_filter("(a:x,b:y)+c:true").unwrap(),
            Filter::And(vec![
                Filter::Or(vec![condition("a", &["x"], false), condition("b", &["y"], false)]),
                condition("c", &["true"], false),
            ])
        );
    }

    #[test]
    fn rejects_malformed_expressions() {
        for bad in ["", "a", "a:", "a:[x", "(a:x", "a:x)", "a:'x", ":x"] {
            assert!(parse_filter(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn multibyte_whitespace_is_skipped() {
        assert_eq!(
            parse_filter("a:x\u{a0}+\u{3000}b:y").unwrap(),
            Filter::And(vec![condition("a", &["x"], false), condition("b", &["y"], false)])
        );
        assert_eq!(parse_filter("\u{a0}a:x").unwrap(), condition("a", &["x"], false));

        let catalog = Catalog::new()
            .custom_theme_setting("style", select(&["A", "B"], "A"))
            .custom_theme_setting(
                "caption",
                CustomThemeSetting::of_kind(SettingType::Text).with_visibility("\u{a0}style:A"),
            )
            .custom_theme_setting(
                "broken",
                CustomThemeSetting::of_kind(SettingType::Text).with_visibility("style:\u{a0}"),
            );
        let messages: Vec<String> = validate_custom_theme_settings(&catalog)
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(
            messages,
            vec!["Custom theme setting `broken` has invalid visibility syntax: expected a value at offset 8"]
        );
    }

    fn select(options: &[&str], default: &str) -> CustomThemeSetting {
        CustomThemeSetting::select(options.iter().copied())
            .with_default(SettingValue::Text(default.to_string()))
    }

    #[test]
    fn valid_settings_produce_no_diagnostics() {
        let catalog = Catalog::new()
            .custom_theme_setting("header_style", select(&["Landing", "Search"], "Landing"))
            .custom_theme_setting(
                "header_text",
                CustomThemeSetting::of_kind(SettingType::Text)
                    .with_visibility("header_style:[landing, Search]"),
            );
        assert!(validate_custom_theme_settings(&catalog).is_empty());
    }

    #[test]
    fn reports_each_kind_of_problem() {
        let catalog = Catalog::new()
            .custom_theme_setting("empty", CustomThemeSetting::select(Vec::<String>::new()))
            .custom_theme_setting("style", select(&["A", "B"], "C"))
            .custom_theme_setting(
                "broken",
                CustomThemeSetting::of_kind(SettingType::Text).with_visibility("style:[A"),
            )
            .custom_theme_setting(
                "orphan",
                CustomThemeSetting::of_kind(SettingType::Text).with_visibility("nope:x+style:D"),
            );

        let messages: Vec<String> = validate_custom_theme_settings(&catalog)
            .into_iter()
            .map(|d| d.message)
            .collect();
        insta::assert_snapshot!(messages.join("\n"), @r###"
        Custom theme setting `broken` has invalid visibility syntax: expected `]` at offset 8
        Custom theme setting `empty` is a select but declares no options
        Custom theme setting `orphan` visibility references unknown setting `nope`
        Custom theme setting `orphan` visibility tests `style` for `D`, which is not one of its options
        Custom theme setting `style` default `C` is not one of its options
        "###);
    }
}
