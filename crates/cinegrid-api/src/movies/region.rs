//! Region/language heuristic for list post-filtering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vote floor for unwindowed and `released` listings.
pub const DEFAULT_VOTE_FLOOR: u32 = 10;

/// Vote floor for regions in the special-language table.
pub const RELAXED_VOTE_FLOOR: u32 = 3;

/// High-volume non-English regions and their primary original language.
const SPECIAL_LANGUAGES: &[(&str, &str)] = &[("KR", "ko"), ("JP", "ja"), ("CN", "zh"), ("IN", "hi")];

/// Primary original language for a special region, if any.
#[must_use]
pub fn special_language(country: &str) -> Option<&'static str> {
    SPECIAL_LANGUAGES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(country))
        .map(|&(_, language)| language)
}

/// How the country and language checks combine when a region is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMatch {
    /// Country matches or language matches.
    #[default]
    Either,
    /// Country matches and language matches.
    Both,
    /// Country matches; language is ignored.
    CountryOnly,
}

impl FromStr for RegionMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "either" => Ok(Self::Either),
            "both" => Ok(Self::Both),
            "country_only" => Ok(Self::CountryOnly),
            other => Err(format!(
                "unknown region match {other:?} (expected either, both or country_only)"
            )),
        }
    }
}

impl fmt::Display for RegionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Either => "either",
            Self::Both => "both",
            Self::CountryOnly => "country_only",
        })
    }
}

/// Region predicate applied to each upstream item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter {
    /// Upper-case ISO 3166-1 code.
    pub country: String,
    /// Expected original language; `None` outside the special table.
    pub language: Option<&'static str>,
    /// Combination rule.
    pub mode: RegionMatch,
}

impl RegionFilter {
    /// Builds the predicate for a selected country.
    #[must_use]
    pub fn new(country: &str, mode: RegionMatch) -> Self {
        Self {
            country: country.to_ascii_uppercase(),
            language: special_language(country),
            mode,
        }
    }

    /// Whether this region relaxes the vote floor.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.language.is_some()
    }

    /// Whether an item with these countries and original language belongs
    /// to the region.
    #[must_use]
    pub fn matches(&self, countries: &[String], original_language: &str) -> bool {
        let country_match = countries
            .iter()
            .any(|code| code.eq_ignore_ascii_case(&self.country));
        let language_match = self
            .language
            .is_none_or(|language| language.eq_ignore_ascii_case(original_language));

        match self.mode {
            RegionMatch::Either => country_match || language_match,
            RegionMatch::Both => country_match && language_match,
            RegionMatch::CountryOnly => country_match,
        }
    }
}
