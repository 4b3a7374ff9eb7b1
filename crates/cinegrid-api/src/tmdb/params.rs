//! TMDB request parameter types.

use chrono::NaiveDate;

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default sort order for `discover/movie`.
const DEFAULT_SORT_BY: &str = "popularity.desc";

/// Parameters for the `discover/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverMovieParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
    /// Sort order (e.g., "popularity.desc").
    pub sort_by: String,
    /// Include adult content.
    pub include_adult: bool,
    /// Minimum vote count (`vote_count.gte`).
    pub vote_count_gte: u32,
    /// Earliest primary release date (`primary_release_date.gte`).
    pub release_date_gte: Option<NaiveDate>,
    /// Latest primary release date (`primary_release_date.lte`).
    pub release_date_lte: Option<NaiveDate>,
    /// Genre IDs; any-of semantics (pipe-joined upstream).
    pub with_genres: Vec<u32>,
    /// Release region (ISO 3166-1).
    pub region: Option<String>,
    /// Origin country filter (ISO 3166-1).
    pub with_origin_country: Option<String>,
    /// Original language filter (ISO 639-1).
    pub with_original_language: Option<String>,
    /// Watch monetization types (pipe-joined, e.g. "flatrate|free").
    pub watch_monetization_types: Option<String>,
    /// Release types (pipe-joined, e.g. "1|2|3").
    pub release_types: Option<String>,
    /// Cache-busting token sent as `timestamp`.
    pub cache_buster: Option<i64>,
}

impl Default for DiscoverMovieParams {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            sort_by: String::from(DEFAULT_SORT_BY),
            include_adult: false,
            vote_count_gte: 0,
            release_date_gte: None,
            release_date_lte: None,
            with_genres: Vec::new(),
            region: None,
            with_origin_country: None,
            with_original_language: None,
            watch_monetization_types: None,
            release_types: None,
            cache_buster: None,
        }
    }
}

impl DiscoverMovieParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }
}

/// Parameters for the `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
    /// Region filter (ISO 3166-1).
    pub region: Option<String>,
    /// Include adult content.
    pub include_adult: bool,
    /// Cache-busting token sent as `timestamp`.
    pub cache_buster: Option<i64>,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            region: None,
            include_adult: false,
            cache_buster: None,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}
