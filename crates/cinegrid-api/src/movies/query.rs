//! List query parsing and validation.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Highest page the listing endpoint will serve.
pub const MAX_PAGE: u32 = 100;

/// Raw query-string parameters of the list endpoint, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawListParams {
    /// Page number.
    pub page: Option<String>,
    /// Comma-joined genre ids.
    pub genre: Option<String>,
    /// Country code or "all".
    pub region: Option<String>,
    /// Free-text search.
    pub query: Option<String>,
    /// Sort order.
    pub sort: Option<String>,
    /// `upcoming`, `released` or anything else for no window.
    pub release_status: Option<String>,
}

/// Validation failure for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidQuery {
    /// `page` is not a non-negative integer.
    Page(String),
    /// A genre id is not an integer.
    Genre(String),
    /// `region` is not a two-letter country code or "all".
    Region(String),
    /// `sort` is not a supported sort order.
    Sort(String),
}

impl fmt::Display for InvalidQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(value) => write!(f, "invalid page: {value:?}"),
            Self::Genre(value) => write!(f, "invalid genre id: {value:?}"),
            Self::Region(value) => write!(f, "invalid region: {value:?}"),
            Self::Sort(value) => write!(f, "unsupported sort order: {value:?}"),
        }
    }
}

impl std::error::Error for InvalidQuery {}

/// Supported upstream sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// `popularity.desc`
    #[default]
    PopularityDesc,
    /// `popularity.asc`
    PopularityAsc,
    /// `vote_average.desc`
    VoteAverageDesc,
    /// `vote_average.asc`
    VoteAverageAsc,
    /// `primary_release_date.desc`
    ReleaseDateDesc,
    /// `primary_release_date.asc`
    ReleaseDateAsc,
    /// `revenue.desc`
    RevenueDesc,
    /// `title.asc`
    TitleAsc,
    /// `title.desc`
    TitleDesc,
}

impl SortKey {
    /// Upstream `sort_by` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PopularityDesc => "popularity.desc",
            Self::PopularityAsc => "popularity.asc",
            Self::VoteAverageDesc => "vote_average.desc",
            Self::VoteAverageAsc => "vote_average.asc",
            Self::ReleaseDateDesc => "primary_release_date.desc",
            Self::ReleaseDateAsc => "primary_release_date.asc",
            Self::RevenueDesc => "revenue.desc",
            Self::TitleAsc => "title.asc",
            Self::TitleDesc => "title.desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = InvalidQuery;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "popularity.desc" => Ok(Self::PopularityDesc),
            "popularity.asc" => Ok(Self::PopularityAsc),
            "vote_average.desc" => Ok(Self::VoteAverageDesc),
            "vote_average.asc" => Ok(Self::VoteAverageAsc),
            "primary_release_date.desc" => Ok(Self::ReleaseDateDesc),
            "primary_release_date.asc" => Ok(Self::ReleaseDateAsc),
            "revenue.desc" => Ok(Self::RevenueDesc),
            "title.asc" => Ok(Self::TitleAsc),
            "title.desc" => Ok(Self::TitleDesc),
            other => Err(InvalidQuery::Sort(String::from(other))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release-date window applied to a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReleaseWindow {
    /// No date bound.
    #[default]
    Any,
    /// Release date on or after today.
    Upcoming,
    /// Release date within the trailing three months.
    Released,
}

impl ReleaseWindow {
    /// Parses a `release_status` value. Unrecognised values mean no window.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "upcoming" => Self::Upcoming,
            "released" => Self::Released,
            _ => Self::Any,
        }
    }
}

/// A validated movie list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number in `1..=MAX_PAGE`.
    pub page: u32,
    /// Genre ids; an item matches if it has any of them.
    pub genre_ids: Vec<u32>,
    /// Upper-case ISO 3166-1 country code; `None` means all regions.
    pub region: Option<String>,
    /// Free-text search; routes the query to `search/movie`.
    pub free_text: Option<String>,
    /// Sort order.
    pub sort: SortKey,
    /// Release-date window.
    pub release_window: ReleaseWindow,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            genre_ids: Vec::new(),
            region: None,
            free_text: None,
            sort: SortKey::default(),
            release_window: ReleaseWindow::default(),
        }
    }
}

/// Returns the trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl ListQuery {
    /// Validates raw query parameters.
    ///
    /// The page is clamped into `1..=MAX_PAGE`; genre ids are deduplicated
    /// in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidQuery`] for a non-numeric page or genre id, a
    /// malformed region code, or an unsupported sort order.
    pub fn from_raw(raw: &RawListParams) -> Result<Self, InvalidQuery> {
        let page = match non_blank(raw.page.as_ref()) {
            None => 1,
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| InvalidQuery::Page(String::from(value)))?
                .clamp(1, u64::from(MAX_PAGE)),
        };
        let page = u32::try_from(page).unwrap_or(MAX_PAGE);

        let mut genre_ids = Vec::new();
        if let Some(genres) = non_blank(raw.genre.as_ref()) {
            for part in genres.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let id = part
                    .parse::<u32>()
                    .map_err(|_| InvalidQuery::Genre(String::from(part)))?;
                if !genre_ids.contains(&id) {
                    genre_ids.push(id);
                }
            }
        }

        let region = match non_blank(raw.region.as_ref()) {
            None => None,
            Some(value) if value.eq_ignore_ascii_case("all") => None,
            Some(value) => {
                if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(InvalidQuery::Region(String::from(value)));
                }
                Some(value.to_ascii_uppercase())
            }
        };

        let sort = match non_blank(raw.sort.as_ref()) {
            None => SortKey::default(),
            Some(value) => value.parse()?,
        };

        let release_window = non_blank(raw.release_status.as_ref())
            .map_or(ReleaseWindow::Any, ReleaseWindow::parse);

        Ok(Self {
            page,
            genre_ids,
            region,
            free_text: non_blank(raw.query.as_ref()).map(String::from),
            sort,
            release_window,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn raw() -> RawListParams {
        RawListParams::default()
    }

    #[test]
    fn test_empty_params_use_defaults() {
        // Arrange & Act
        let query = ListQuery::from_raw(&raw()).unwrap();

        // Assert
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_page_is_clamped() {
        // Arrange
        let zero = RawListParams {
            page: Some(String::from("0")),
            ..raw()
        };
        let huge = RawListParams {
            page: Some(String::from("9999999999")),
            ..raw()
        };

        // Act & Assert
        assert_eq!(ListQuery::from_raw(&zero).unwrap().page, 1);
        assert_eq!(ListQuery::from_raw(&huge).unwrap().page, MAX_PAGE);
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        // Arrange
        let params = RawListParams {
            page: Some(String::from("two")),
            ..raw()
        };

        // Act
        let result = ListQuery::from_raw(&params);

        // Assert
        assert_eq!(result, Err(InvalidQuery::Page(String::from("two"))));
    }

    #[test]
    fn test_genres_parsed_and_deduplicated() {
        // Arrange
        let params = RawListParams {
            genre: Some(String::from("28, 12,,28")),
            ..raw()
        };

        // Act
        let query = ListQuery::from_raw(&params).unwrap();

        // Assert
        assert_eq!(query.genre_ids, vec![28, 12]);
    }

    #[test]
    fn test_non_numeric_genre_rejected() {
        // Arrange
        let params = RawListParams {
            genre: Some(String::from("28,action")),
            ..raw()
        };

        // Act
        let result = ListQuery::from_raw(&params);

        // Assert
        assert_eq!(result, Err(InvalidQuery::Genre(String::from("action"))));
    }

    #[test]
    fn test_region_normalised() {
        // Arrange
        let kr = RawListParams {
            region: Some(String::from("kr")),
            ..raw()
        };
        let all = RawListParams {
            region: Some(String::from("all")),
            ..raw()
        };
        let bad = RawListParams {
            region: Some(String::from("KOR")),
            ..raw()
        };

        // Act & Assert
        assert_eq!(
            ListQuery::from_raw(&kr).unwrap().region.as_deref(),
            Some("KR")
        );
        assert!(ListQuery::from_raw(&all).unwrap().region.is_none());
        assert!(ListQuery::from_raw(&bad).is_err());
    }

    #[test]
    fn test_blank_free_text_is_absent() {
        // Arrange
        let params = RawListParams {
            query: Some(String::from("   ")),
            ..raw()
        };

        // Act
        let query = ListQuery::from_raw(&params).unwrap();

        // Assert
        assert!(query.free_text.is_none());
    }

    #[test]
    fn test_sort_keys() {
        // Arrange & Act & Assert
        assert_eq!(
            "vote_average.desc".parse::<SortKey>(),
            Ok(SortKey::VoteAverageDesc)
        );
        assert_eq!(SortKey::ReleaseDateAsc.as_str(), "primary_release_date.asc");
        assert_eq!(
            "release_date.desc".parse::<SortKey>(),
            Err(InvalidQuery::Sort(String::from("release_date.desc")))
        );
    }

    #[test]
    fn test_release_window_parsing() {
        // Arrange & Act & Assert
        assert_eq!(ReleaseWindow::parse("upcoming"), ReleaseWindow::Upcoming);
        assert_eq!(ReleaseWindow::parse("released"), ReleaseWindow::Released);
        assert_eq!(ReleaseWindow::parse("all"), ReleaseWindow::Any);
        assert_eq!(ReleaseWindow::parse("soon"), ReleaseWindow::Any);
    }
}
