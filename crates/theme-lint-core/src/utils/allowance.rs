//! Comment-based allowance directives.
//!
//! Supports template comments like:
//! ```text
//! {{!-- theme-lint: allow(no-unknown-helpers) reason="provided by the routes file" --}}
//! {{! theme-lint: allow(no-unknown-globals, no-unknown-partials) }}
//! ```
//!
//! A directive applies to diagnostics on its own line and on the line
//! below it.

use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks template source for allowance comments with reason.
///
/// # Arguments
///
/// * `content` - Template source
/// * `line` - Line number to check (1-indexed)
/// * `rule_name` - Name of the rule to check for
///
/// # Returns
///
/// `AllowCheck::Allowed` with optional reason if an allowance directive is found.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.split('\n').collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        for directive in parse_allow_directives(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses every allowance directive in the comments of one line.
fn parse_allow_directives(line: &str) -> Vec<AllowDirective> {
    let mut directives = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("{{") {
        let after = rest[open + 2..].trim_start_matches('~');
        let Some(body) = after.strip_prefix('!') else {
            rest = &rest[open + 2..];
            continue;
        };
        let (comment, remainder) = if let Some(long) = body.strip_prefix("--") {
            split_comment(long, "--")
        } else {
            split_comment(body, "")
        };
        if let Some(directive) = parse_allow_directive(comment) {
            directives.push(directive);
        }
        rest = remainder;
    }

    directives
}

/// Splits a comment body at its terminator (`--}}` or `}}`, with optional `~`).
fn split_comment<'s>(body: &'s str, dashes: &str) -> (&'s str, &'s str) {
    let closers = [format!("{dashes}~}}}}"), format!("{dashes}}}}}")];
    let end = closers
        .iter()
        .filter_map(|c| body.find(c.as_str()).map(|at| (at, c.len())))
        .min_by_key(|(at, _)| *at);
    match end {
        Some((at, len)) => (&body[..at], &body[at + len..]),
        None => (body, ""),
    }
}

/// Parses an allowance directive from comment text.
fn parse_allow_directive(comment: &str) -> Option<AllowDirective> {
    let directive = comment.trim().strip_prefix("theme-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules_str = &allow_content[..paren_end];

    let rules: HashSet<String> = rules_str
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = if let Some(reason_part) = rest.strip_prefix("reason=") {
        let reason_part = reason_part.trim();
        if reason_part.starts_with('"') && reason_part.len() > 1 {
            let end = reason_part[1..].find('"').map(|i| i + 1)?;
            Some(reason_part[1..end].to_string())
        } else {
            None
        }
    } else {
        None
    };

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> Option<AllowDirective> {
        parse_allow_directives(line).into_iter().next()
    }

    #[test]
    fn test_parse_long_comment_directive() {
        let directive = single("{{!-- theme-lint: allow(no-unknown-helpers) --}}").unwrap();
        assert!(directive.rules.contains("no-unknown-helpers"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_short_comment_directive_with_reason() {
        let directive =
            single("{{! theme-lint: allow(no-unknown-globals) reason=\"set by routes\" }}").unwrap();
        assert!(directive.rules.contains("no-unknown-globals"));
        assert_eq!(directive.reason, Some("set by routes".to_string()));
    }

    #[test]
    fn test_parse_multiple_rules_and_whitespace_control() {
        let directive = single("  {{~!-- theme-lint: allow(rule1, rule2, rule3) --~}}").unwrap();
        assert!(directive.rules.contains("rule1"));
        assert!(directive.rules.contains("rule2"));
        assert!(directive.rules.contains("rule3"));
    }

    #[test]
    fn test_ignores_plain_comments_and_mustaches() {
        assert!(single("{{! just a note }}").is_none());
        assert!(single("{{title}} theme-lint: allow(x)").is_none());
        assert!(single("{{!-- theme-lint: allow() --}}").is_none());
    }

    #[test]
    fn test_finds_directive_after_mustache() {
        let directives =
            parse_allow_directives("{{title}} {{!-- theme-lint: allow(no-unknown-helpers) --}}");
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn test_check_allow_previous_and_same_line() {
        let content = "<div>\n{{!-- theme-lint: allow(no-unknown-helpers) --}}\n{{shiny}}\n{{other}}";

        assert!(check_allow_with_reason(content, 3, "no-unknown-helpers").is_allowed());
        assert!(check_allow_with_reason(content, 2, "no-unknown-helpers").is_allowed());
        assert!(!check_allow_with_reason(content, 4, "no-unknown-helpers").is_allowed());
        assert!(!check_allow_with_reason(content, 3, "other-rule").is_allowed());
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content =
            "{{!-- theme-lint: allow(all) reason=\"vendored template\" --}}\n{{shiny}}";
        let result = check_allow_with_reason(content, 2, "no-unknown-helpers");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("vendored template"));
    }

    #[test]
    fn test_check_allow_denied() {
        let result = check_allow_with_reason("{{shiny}}", 1, "no-unknown-helpers");
        assert_eq!(result, AllowCheck::Denied);
        assert_eq!(result.reason(), None);
    }
}
