//! TMDB API response types.

use serde::{Deserialize, Serialize};

// --- Movie lists (discover / search) ---

/// Response from the `discover/movie` and `search/movie` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Result items.
    #[serde(default)]
    pub results: Vec<TmdbMovieResult>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// Serde default for a missing `page` field.
const fn first_page() -> u32 {
    1
}

/// A single movie list item.
///
/// Upstream omits or nulls several fields for sparse entries, so everything
/// except `id` is defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieResult {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: Option<String>,
    /// Original title.
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Production countries, present on some list payloads.
    #[serde(default)]
    pub production_countries: Vec<TmdbProductionCountry>,
    /// Release date (YYYY-MM-DD, empty string or null).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- Movie Details ---

/// Response from the `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: Option<String>,
    /// Original title.
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Production countries.
    #[serde(default)]
    pub production_countries: Vec<TmdbProductionCountry>,
    /// Release date.
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Release status (e.g., "Released", "Post Production").
    pub status: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// Production country entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    #[serde(default)]
    pub name: String,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Movie Credits ---

/// Response from the `movie/{movie_id}/credits` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: u64,
    /// Cast in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastCredit>,
    /// Crew in upstream order.
    #[serde(default)]
    pub crew: Vec<TmdbCrewCredit>,
}

/// A single cast credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastCredit {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character name.
    #[serde(default)]
    pub character: String,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A single crew credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewCredit {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g., "Director").
    #[serde(default)]
    pub job: String,
    /// Department (e.g., "Directing").
    #[serde(default)]
    pub department: String,
    /// Profile image path.
    pub profile_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}
