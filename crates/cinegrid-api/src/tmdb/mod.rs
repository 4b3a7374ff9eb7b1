//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! (`discover/movie`, `search/movie`, `movie/{id}`, `movie/{id}/credits`).

mod api;
mod client;
mod params;
mod rate_limiter;
mod retry;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use params::{DiscoverMovieParams, SearchMovieParams};
pub use retry::RetryPolicy;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    TmdbCastCredit, TmdbCredits, TmdbCrewCredit, TmdbGenre, TmdbMovieDetails,
    TmdbMovieListResponse, TmdbMovieResult, TmdbProductionCountry,
};
