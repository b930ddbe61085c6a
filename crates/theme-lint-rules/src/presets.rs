//! Rule presets for common configurations.

use crate::{
    NoAuthorHelperInPostContext, NoImgUrlInConditionals, NoLimitAllInGetHelper,
    NoMultiParamConditionals, NoNestedAsyncHelpers, NoPrevNextPostOutsidePostContext,
    NoPriceDataMonthlyYearly, NoTierBenefitAsObject, NoTierPriceAsObject,
    NoUnknownCustomThemeSelectValueInMatch, NoUnknownCustomThemeSettings, NoUnknownGlobals,
    NoUnknownHelpers, NoUnknownPageProperties, NoUnknownPartials,
};
use theme_lint_core::RuleBox;

/// Preset configurations for theme-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, including the advisory ones.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Looks a preset up by its config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }
}

/// Returns the recommended set of rules.
///
/// Everything that breaks rendering: unknown references (TL001-TL003,
/// TL010-TL012), context misuse (TL004-TL006), removed price and tier
/// shapes (TL007-TL009) and ignored conditions (TL013).
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoUnknownPartials::new()),
        Box::new(NoUnknownHelpers::new()),
        Box::new(NoUnknownGlobals::new()),
        Box::new(NoNestedAsyncHelpers::new()),
        Box::new(NoAuthorHelperInPostContext::new()),
        Box::new(NoPrevNextPostOutsidePostContext::new()),
        Box::new(NoPriceDataMonthlyYearly::new()),
        Box::new(NoTierPriceAsObject::new()),
        Box::new(NoTierBenefitAsObject::new()),
        Box::new(NoUnknownCustomThemeSettings::new()),
        Box::new(NoUnknownCustomThemeSelectValueInMatch::new()),
        Box::new(NoUnknownPageProperties::new()),
        Box::new(NoMultiParamConditionals::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules plus the performance and correctness
/// warnings:
/// - `no-limit-all-in-get-helper` (TL014)
/// - `no-img-url-in-conditionals` (TL015)
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    let mut rules = recommended_rules();
    rules.push(Box::new(NoLimitAllInGetHelper::new()));
    rules.push(Box::new(NoImgUrlInConditionals::new()));
    rules
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes the reference checks:
/// - `no-unknown-partials` (TL001)
/// - `no-unknown-helpers` (TL002)
/// - `no-unknown-globals` (TL003)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoUnknownPartials::new()),
        Box::new(NoUnknownHelpers::new()),
        Box::new(NoUnknownGlobals::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    strict_rules()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Minimal.rules().len(), 3);
        assert_eq!(Preset::Recommended.rules().len(), 13);
        assert_eq!(Preset::Strict.rules().len(), 15);
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let rules = all_rules();
        let codes: HashSet<_> = rules.iter().map(|r| r.code()).collect();
        let names: HashSet<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(codes.len(), rules.len());
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Preset::from_name("Strict"), Some(Preset::Strict));
        assert_eq!(Preset::from_name("minimal"), Some(Preset::Minimal));
        assert_eq!(Preset::from_name("loose"), None);
    }
}
