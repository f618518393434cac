//! Three-tier title matcher.
//!
//! Tiers run in strict order and the first one with a unique candidate wins:
//!
//! 1. **exact**: case-insensitive equality on the raw title.
//! 2. **norm_exact**: equality on the normalized title.
//! 3. **like_unique**: the Steam title's normalized form is a substring of
//!    exactly one product's normalized title across the whole catalog. Only
//!    attempted when the normalized title has at least `min_like_length`
//!    characters, so short titles cannot fan out to dozens of products.
//!
//! A tier with several candidates never picks one; it falls through, and the
//! last tier degrades to `none`. Adding products can therefore only turn a
//! match into a lower tier or `none`, never into a different product at the
//! same tier.

use steam_gog_catalog::{MatchMethod, MatchResult, normalize};

use crate::index::{Lookup, TitleIndex};

/// Minimum normalized title length (in characters) for the substring tier.
pub const DEFAULT_MIN_LIKE_LENGTH: usize = 6;

/// Tunables for a matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub min_like_length: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_like_length: DEFAULT_MIN_LIKE_LENGTH,
        }
    }
}

/// Result of matching one Steam title against the index.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub method: MatchMethod,
    pub gog_product_id: Option<i64>,
    pub score: f64,
    /// Whether any tier saw more than one candidate.
    pub ambiguous: bool,
}

impl MatchOutcome {
    fn matched(method: MatchMethod, gog_product_id: i64, ambiguous: bool) -> Self {
        Self {
            method,
            gog_product_id: Some(gog_product_id),
            score: method.score(),
            ambiguous,
        }
    }

    fn unmatched(ambiguous: bool) -> Self {
        Self {
            method: MatchMethod::None,
            gog_product_id: None,
            score: MatchMethod::None.score(),
            ambiguous,
        }
    }

    /// Attach the Steam app id to produce a storable result.
    pub fn into_result(self, steam_app_id: i64) -> MatchResult {
        MatchResult {
            steam_app_id,
            gog_product_id: self.gog_product_id,
            match_method: self.method,
            match_score: self.score,
        }
    }
}

/// Match a Steam title against the index.
///
/// Never fails: an unmatched title is a valid outcome with method `none`.
pub fn match_title(steam_title: &str, index: &TitleIndex, config: &MatchConfig) -> MatchOutcome {
    let mut ambiguous = false;

    match index.exact_lookup(steam_title) {
        Lookup::Unique(id) => return MatchOutcome::matched(MatchMethod::Exact, id, ambiguous),
        Lookup::Ambiguous(ids) => {
            log::debug!("'{}': {} exact candidates, falling through", steam_title, ids.len());
            ambiguous = true;
        }
        Lookup::NotFound => {}
    }

    let normalized = normalize(steam_title);
    if normalized.is_empty() {
        return MatchOutcome::unmatched(ambiguous);
    }

    match index.normalized_lookup(&normalized) {
        Lookup::Unique(id) => return MatchOutcome::matched(MatchMethod::NormExact, id, ambiguous),
        Lookup::Ambiguous(ids) => {
            log::debug!(
                "'{}': {} normalized candidates, falling through",
                steam_title,
                ids.len()
            );
            ambiguous = true;
        }
        Lookup::NotFound => {}
    }

    if normalized.chars().count() < config.min_like_length {
        return MatchOutcome::unmatched(ambiguous);
    }

    match index.containing(&normalized, 2) {
        Lookup::Unique(id) => MatchOutcome::matched(MatchMethod::LikeUnique, id, ambiguous),
        Lookup::Ambiguous(_) => {
            log::debug!("'{}': substring match is ambiguous", steam_title);
            MatchOutcome::unmatched(true)
        }
        Lookup::NotFound => MatchOutcome::unmatched(ambiguous),
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
