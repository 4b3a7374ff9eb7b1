//! Translation of a [`ListQuery`] into an upstream request plus the
//! post-filter its results must pass.

use chrono::{Months, NaiveDate};

use super::query::{ListQuery, ReleaseWindow, SortKey};
use super::region::{DEFAULT_VOTE_FLOOR, RELAXED_VOTE_FLOOR, RegionFilter, RegionMatch};
use crate::tmdb::{DiscoverMovieParams, SearchMovieParams, TmdbMovieResult};

/// Monetization types sent with every discover request.
const WATCH_MONETIZATION_TYPES: &str = "flatrate|free|ads|rent|buy";

/// Release types sent with every discover request.
const RELEASE_TYPES: &str = "1|2|3|4|5|6";

/// Length of the `released` window.
const RELEASED_WINDOW_MONTHS: u32 = 3;

/// Settings shared by every translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Upstream response language (e.g. "ko-KR").
    pub language: String,
    /// Region predicate combination rule.
    pub region_match: RegionMatch,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            language: String::from("ko-KR"),
            region_match: RegionMatch::default(),
        }
    }
}

/// The upstream call a list query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRequest {
    /// `discover/movie`
    Discover(DiscoverMovieParams),
    /// `search/movie`
    Search(SearchMovieParams),
}

/// Post-filter applied to upstream list items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFilter {
    /// Keep items sharing at least one of these genres (empty: no check).
    pub genre_ids: Vec<u32>,
    /// Region predicate, when a region is selected.
    pub region: Option<RegionFilter>,
    /// Earliest accepted release date.
    pub date_from: Option<NaiveDate>,
    /// Latest accepted release date.
    pub date_to: Option<NaiveDate>,
    /// Minimum vote count, enforced only for `released`.
    pub vote_floor: Option<u32>,
}

impl ResultFilter {
    /// Whether an upstream item survives the post-filter.
    #[must_use]
    pub fn accepts(&self, item: &TmdbMovieResult) -> bool {
        if !has_title(item) || !has_image(item) {
            return false;
        }

        if self
            .region
            .as_ref()
            .is_some_and(|region| !region.matches(&country_codes(item), &item.original_language))
        {
            return false;
        }

        if !self.genre_ids.is_empty()
            && !item.genre_ids.iter().any(|id| self.genre_ids.contains(id))
        {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = release_date(item) else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from)
                || self.date_to.is_some_and(|to| date > to)
            {
                return false;
            }
        }

        self.vote_floor
            .is_none_or(|floor| item.vote_count >= floor)
    }
}

/// A translated list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Upstream call to issue.
    pub request: UpstreamRequest,
    /// Filter for the returned items.
    pub filter: ResultFilter,
}

/// Maps a list query onto an upstream request and a result filter.
///
/// `today` is the region-local date the release windows are anchored to;
/// `cache_buster` is forwarded as the upstream `timestamp` parameter.
#[must_use]
pub fn translate(
    query: &ListQuery,
    today: NaiveDate,
    options: &TranslateOptions,
    cache_buster: i64,
) -> Translation {
    let region = query
        .region
        .as_deref()
        .map(|country| RegionFilter::new(country, options.region_match));
    let base_floor = if region.as_ref().is_some_and(RegionFilter::is_special) {
        RELAXED_VOTE_FLOOR
    } else {
        DEFAULT_VOTE_FLOOR
    };

    let (date_from, date_to, upstream_floor, sort) = match query.release_window {
        ReleaseWindow::Upcoming => (Some(today), None, 0, SortKey::ReleaseDateAsc),
        ReleaseWindow::Released => {
            let from = today
                .checked_sub_months(Months::new(RELEASED_WINDOW_MONTHS))
                .unwrap_or(NaiveDate::MIN);
            (Some(from), Some(today), base_floor, query.sort)
        }
        ReleaseWindow::Any => (None, None, base_floor, query.sort),
    };
    let vote_floor = (query.release_window == ReleaseWindow::Released).then_some(base_floor);

    let request = if let Some(ref text) = query.free_text {
        let mut params = SearchMovieParams::new(text.clone())
            .language(options.language.clone())
            .page(query.page);
        params.region.clone_from(&query.region);
        params.cache_buster = Some(cache_buster);
        UpstreamRequest::Search(params)
    } else {
        let mut params = DiscoverMovieParams::default()
            .language(options.language.clone())
            .page(query.page)
            .sort_by(sort.as_str());
        params.vote_count_gte = upstream_floor;
        params.release_date_gte = date_from;
        params.release_date_lte = date_to;
        params.with_genres.clone_from(&query.genre_ids);
        if let Some(ref filter) = region {
            params.region = Some(filter.country.clone());
            params.with_origin_country = Some(filter.country.clone());
            params.with_original_language = filter.language.map(String::from);
        }
        params.watch_monetization_types = Some(String::from(WATCH_MONETIZATION_TYPES));
        params.release_types = Some(String::from(RELEASE_TYPES));
        params.cache_buster = Some(cache_buster);
        UpstreamRequest::Discover(params)
    };

    Translation {
        request,
        filter: ResultFilter {
            genre_ids: query.genre_ids.clone(),
            region,
            date_from,
            date_to,
            vote_floor,
        },
    }
}

fn has_title(item: &TmdbMovieResult) -> bool {
    item.title.as_deref().is_some_and(|t| !t.trim().is_empty())
}

fn has_image(item: &TmdbMovieResult) -> bool {
    let present = |path: Option<&str>| path.is_some_and(|p| !p.is_empty());
    present(item.poster_path.as_deref()) || present(item.backdrop_path.as_deref())
}

/// Parses the item's `YYYY-MM-DD` release date; blank or malformed is `None`.
pub(crate) fn release_date(item: &TmdbMovieResult) -> Option<NaiveDate> {
    item.release_date
        .as_deref()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

/// Production-country codes followed by origin countries, deduplicated.
pub(crate) fn country_codes(item: &TmdbMovieResult) -> Vec<String> {
    let production: Vec<&str> = item
        .production_countries
        .iter()
        .map(|c| c.iso_3166_1.as_str())
        .collect();
    merge_countries(&production, &item.origin_country)
}

/// Merges two country-code lists preserving first-seen order.
pub(crate) fn merge_countries(production: &[&str], origin: &[String]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    let all = production
        .iter()
        .copied()
        .chain(origin.iter().map(String::as_str));
    for code in all {
        if !code.is_empty() && !codes.iter().any(|c| c == code) {
            codes.push(String::from(code));
        }
    }
    codes
}
