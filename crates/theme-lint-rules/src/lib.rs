//! # theme-lint-rules
//!
//! Built-in lint rules for theme-lint.
//!
//! Each rule inspects Handlebars templates through the scope-aware visitor in
//! `theme-lint-core` and reports problems that would break or degrade a
//! rendered theme.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | TL001 | `no-unknown-partials` | Forbids includes of partials that do not exist |
//! | TL002 | `no-unknown-helpers` | Forbids calls to helpers that are not registered |
//! | TL003 | `no-unknown-globals` | Forbids `@` references that are never provided |
//! | TL004 | `no-nested-async-helpers` | Forbids async helpers inside other async helpers |
//! | TL005 | `no-author-helper-in-post-context` | Forbids `{{author}}` in post templates |
//! | TL006 | `no-prev-next-post-outside-post-context` | Forbids `prev_post`/`next_post` outside posts |
//! | TL007 | `no-price-data-monthly-yearly` | Forbids `@price.monthly` and `@price.yearly` |
//! | TL008 | `no-tier-price-as-object` | Forbids `monthly_price.x` inside tiers |
//! | TL009 | `no-tier-benefit-as-object` | Forbids `{{name}}` on tier benefits |
//! | TL010 | `no-unknown-custom-theme-settings` | Forbids undeclared `@custom` settings |
//! | TL011 | `no-unknown-custom-theme-select-value-in-match` | Forbids impossible select values in `{{match}}` |
//! | TL012 | `no-unknown-page-properties` | Forbids unknown `@page` properties |
//! | TL013 | `no-multi-param-conditionals` | Forbids `if`/`unless` with several conditions |
//! | TL014 | `no-limit-all-in-get-helper` | Warns about `limit="all"` in `{{#get}}` |
//! | TL015 | `no-img-url-in-conditionals` | Warns about `img_url` as a condition |
//!
//! ## Usage
//!
//! ```ignore
//! use theme_lint_core::Analyzer;
//! use theme_lint_rules::{NoUnknownPartials, NoNestedAsyncHelpers};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-theme")
//!     .rule(NoUnknownPartials::new())
//!     .rule(NoNestedAsyncHelpers::new())
//!     .build()?;
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod no_author_helper_in_post_context;
mod no_img_url_in_conditionals;
mod no_limit_all_in_get_helper;
mod no_multi_param_conditionals;
mod no_nested_async_helpers;
mod no_prev_next_post_outside_post_context;
mod no_price_data_monthly_yearly;
mod no_tier_benefit_as_object;
mod no_tier_price_as_object;
mod no_unknown_custom_theme_select_value_in_match;
mod no_unknown_custom_theme_settings;
mod no_unknown_globals;
mod no_unknown_helpers;
mod no_unknown_page_properties;
mod no_unknown_partials;
mod presets;

#[cfg(test)]
mod test_support;

pub use no_author_helper_in_post_context::NoAuthorHelperInPostContext;
pub use no_img_url_in_conditionals::NoImgUrlInConditionals;
pub use no_limit_all_in_get_helper::NoLimitAllInGetHelper;
pub use no_multi_param_conditionals::NoMultiParamConditionals;
pub use no_nested_async_helpers::{NoNestedAsyncHelpers, ASYNC_HELPERS};
pub use no_prev_next_post_outside_post_context::NoPrevNextPostOutsidePostContext;
pub use no_price_data_monthly_yearly::NoPriceDataMonthlyYearly;
pub use no_tier_benefit_as_object::NoTierBenefitAsObject;
pub use no_tier_price_as_object::NoTierPriceAsObject;
pub use no_unknown_custom_theme_select_value_in_match::NoUnknownCustomThemeSelectValueInMatch;
pub use no_unknown_custom_theme_settings::NoUnknownCustomThemeSettings;
pub use no_unknown_globals::NoUnknownGlobals;
pub use no_unknown_helpers::NoUnknownHelpers;
pub use no_unknown_page_properties::{NoUnknownPageProperties, PAGE_PROPERTIES};
pub use no_unknown_partials::NoUnknownPartials;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};

/// Re-export core types for convenience.
pub use theme_lint_core::{Diagnostic, Rule, Severity};
