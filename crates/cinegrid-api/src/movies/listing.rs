//! Movie list service: translate, call upstream, post-filter, reshape.

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::query::{ListQuery, MAX_PAGE};
use super::translate::{TranslateOptions, UpstreamRequest, country_codes, translate};
use crate::tmdb::{TmdbApi, TmdbMovieResult};

/// A movie as shown in a result grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Release date as sent upstream (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Overview text.
    pub overview: String,
    /// Popularity score.
    pub popularity: f64,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Production and origin country codes.
    pub production_countries: Vec<String>,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
}

/// Keeps non-empty strings only.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<TmdbMovieResult> for MovieSummary {
    fn from(item: TmdbMovieResult) -> Self {
        let production_countries = country_codes(&item);
        let title = item.title.unwrap_or_default();
        Self {
            id: item.id,
            original_title: item.original_title.unwrap_or_else(|| title.clone()),
            title,
            poster_path: non_empty(item.poster_path),
            backdrop_path: non_empty(item.backdrop_path),
            release_date: non_empty(item.release_date),
            vote_average: item.vote_average,
            vote_count: item.vote_count,
            overview: item.overview.unwrap_or_default(),
            popularity: item.popularity,
            original_language: item.original_language,
            production_countries,
            genre_ids: item.genre_ids,
        }
    }
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    /// Page number echoed from upstream.
    pub page: u32,
    /// Upstream total pages, capped at 100.
    pub total_pages: u32,
    /// Upstream total results.
    pub total_results: u32,
    /// Filtered results.
    pub results: Vec<MovieSummary>,
}

/// Settings for the list service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// Translation settings.
    pub translate: TranslateOptions,
    /// Offset "today" is computed in.
    pub utc_offset: FixedOffset,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            translate: TranslateOptions::default(),
            utc_offset: default_offset(),
        }
    }
}

/// Default offset "today" is computed in (UTC+9).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 32_400;

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current date at the given offset.
#[must_use]
pub fn today_at(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Current epoch milliseconds, used as the upstream cache-busting token.
#[must_use]
pub fn cache_buster_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// Runs a list query against the current date and clock.
///
/// # Errors
///
/// Returns an error if the upstream call fails.
pub async fn list_movies<A>(api: &A, query: &ListQuery, options: &ListingOptions) -> Result<MoviePage>
where
    A: TmdbApi + Sync,
{
    list_movies_at(
        api,
        query,
        &options.translate,
        today_at(options.utc_offset),
        cache_buster_now(),
    )
    .await
}

/// Runs a list query anchored at `today` with an explicit cache-busting token.
///
/// # Errors
///
/// Returns an error if the upstream call fails. No partial results are
/// returned.
#[instrument(skip_all, fields(page = query.page, today = %today))]
pub async fn list_movies_at<A>(
    api: &A,
    query: &ListQuery,
    options: &TranslateOptions,
    today: NaiveDate,
    cache_buster: i64,
) -> Result<MoviePage>
where
    A: TmdbApi + Sync,
{
    let translation = translate(query, today, options, cache_buster);

    let response = match translation.request {
        UpstreamRequest::Discover(ref params) => api
            .discover_movies(params)
            .await
            .context("failed to discover movies")?,
        UpstreamRequest::Search(ref params) => api
            .search_movies(params)
            .await
            .context("failed to search movies")?,
    };

    let upstream_count = response.results.len();
    let results: Vec<MovieSummary> = response
        .results
        .into_iter()
        .filter(|item| translation.filter.accepts(item))
        .map(MovieSummary::from)
        .collect();

    tracing::debug!(
        upstream = upstream_count,
        kept = results.len(),
        "Filtered movie list"
    );

    Ok(MoviePage {
        page: response.page,
        total_pages: response.total_pages.min(MAX_PAGE),
        total_results: response.total_results,
        results,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::movies::query::{RawListParams, ReleaseWindow};
    use crate::movies::region::RegionMatch;
    use crate::movies::test_support::{StubApi, discover_fixture, search_fixture};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn stub_with(list: crate::tmdb::TmdbMovieListResponse) -> StubApi {
        StubApi {
            list: Some(list),
            ..StubApi::default()
        }
    }

    fn kr_released() -> ListQuery {
        ListQuery::from_raw(&RawListParams {
            page: Some(String::from("1")),
            region: Some(String::from("KR")),
            release_status: Some(String::from("released")),
            ..RawListParams::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_kr_released_keeps_only_korean_items() {
        // Arrange
        let api = stub_with(discover_fixture());

        // Act
        let page = list_movies_at(&api, &kr_released(), &TranslateOptions::default(), today(), 1)
            .await
            .unwrap();

        // Assert
        let ids: Vec<u64> = page.results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1_017_163, 838_209, 1_174_218]);
        assert!(
            page.results
                .iter()
                .all(|m| m.production_countries.contains(&String::from("KR")))
        );
        assert_eq!(StubApi::count(&api.discover_calls), 1);
        let sent = api.last_discover.lock().unwrap().clone().unwrap();
        assert_eq!(sent.with_origin_country.as_deref(), Some("KR"));
        assert_eq!(sent.with_original_language.as_deref(), Some("ko"));
    }

    #[tokio::test]
    async fn test_region_match_modes_differ() {
        // Arrange
        let mut list = discover_fixture();
        let template = list
            .results
            .iter()
            .find(|item| item.id == 1_209_290)
            .cloned()
            .unwrap();
        let mut us_japanese = template.clone();
        us_japanese.id = 1;
        us_japanese.origin_country = vec![String::from("US")];
        us_japanese.production_countries.clear();
        us_japanese.original_language = String::from("ja");
        let mut jp_english = template;
        jp_english.id = 2;
        jp_english.origin_country = vec![String::from("JP")];
        jp_english.production_countries.clear();
        jp_english.original_language = String::from("en");
        list.results.push(us_japanese);
        list.results.push(jp_english);
        let api = stub_with(list);
        let query = ListQuery {
            region: Some(String::from("JP")),
            ..ListQuery::default()
        };
        let options = |region_match| TranslateOptions {
            region_match,
            ..TranslateOptions::default()
        };

        // Act
        let with_either = list_movies_at(&api, &query, &options(RegionMatch::Either), today(), 1)
            .await
            .unwrap();
        let with_both = list_movies_at(&api, &query, &options(RegionMatch::Both), today(), 1)
            .await
            .unwrap();
        let with_country = list_movies_at(&api, &query, &options(RegionMatch::CountryOnly), today(), 1)
            .await
            .unwrap();

        // Assert
        let ids = |page: &MoviePage| page.results.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids(&with_either), vec![1_209_290, 1_012_201, 1, 2]);
        assert_eq!(ids(&with_both), vec![1_209_290, 1_012_201]);
        assert_eq!(ids(&with_country), vec![1_209_290, 1_012_201, 2]);
    }

    #[tokio::test]
    async fn test_total_pages_capped() {
        // Arrange
        let api = stub_with(discover_fixture());

        // Act
        let page = list_movies_at(&api, &ListQuery::default(), &TranslateOptions::default(), today(), 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.total_pages, 100);
        assert_eq!(page.total_results, 4983);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_total_pages_below_cap_echoed() {
        // Arrange
        let api = stub_with(search_fixture());
        let query = ListQuery {
            free_text: Some(String::from("기생충")),
            ..ListQuery::default()
        };

        // Act
        let page = list_movies_at(&api, &query, &TranslateOptions::default(), today(), 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.total_pages, 1);
        assert_eq!(StubApi::count(&api.search_calls), 1);
        assert_eq!(StubApi::count(&api.discover_calls), 0);
        assert!(
            page.results
                .iter()
                .all(|m| !m.title.is_empty() && (m.poster_path.is_some() || m.backdrop_path.is_some()))
        );
    }

    #[tokio::test]
    async fn test_upcoming_results_not_before_today() {
        // Arrange
        let api = stub_with(discover_fixture());
        let query = ListQuery {
            release_window: ReleaseWindow::Upcoming,
            ..ListQuery::default()
        };
        let reference = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();

        // Act
        let page = list_movies_at(&api, &query, &TranslateOptions::default(), reference, 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results.len(), 2);
        for movie in &page.results {
            let date = NaiveDate::parse_from_str(movie.release_date.as_deref().unwrap(), "%Y-%m-%d").unwrap();
            assert!(date >= reference);
        }
    }

    #[tokio::test]
    async fn test_cache_buster_does_not_change_results() {
        // Arrange
        let api = stub_with(discover_fixture());
        let query = kr_released();

        // Act
        let first = list_movies_at(&api, &query, &TranslateOptions::default(), today(), 1_000)
            .await
            .unwrap();
        let second = list_movies_at(&api, &query, &TranslateOptions::default(), today(), 2_000)
            .await
            .unwrap();

        // Assert
        assert_eq!(first.results, second.results);
        let sent = api.last_discover.lock().unwrap().clone().unwrap();
        assert_eq!(sent.cache_buster, Some(2_000));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_error() {
        // Arrange
        let api = StubApi::default();

        // Act
        let result = list_movies_at(&api, &ListQuery::default(), &TranslateOptions::default(), today(), 1).await;

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_merges_countries_and_blanks() {
        // Arrange
        let item: TmdbMovieResult = serde_json::from_str(
            r#"{"id":9,"title":"T","original_title":"O","release_date":"","poster_path":"","backdrop_path":"/b.jpg","origin_country":["KR"],"production_countries":[{"iso_3166_1":"US","name":"United States of America"},{"iso_3166_1":"KR","name":"South Korea"}]}"#,
        )
        .unwrap();

        // Act
        let summary = MovieSummary::from(item);

        // Assert
        assert_eq!(summary.production_countries, vec!["US", "KR"]);
        assert!(summary.release_date.is_none());
        assert!(summary.poster_path.is_none());
        assert_eq!(summary.backdrop_path.as_deref(), Some("/b.jpg"));
    }

    #[test]
    fn test_default_offset_is_kst() {
        // Arrange & Act
        let options = ListingOptions::default();

        // Assert
        assert_eq!(options.utc_offset.local_minus_utc(), 32_400);
    }
}
