//! Movie detail fetching with a TTL cache in front of the upstream.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::listing::{MovieSummary, non_empty};
use super::translate::merge_countries;
use crate::cache::TtlCache;
use crate::tmdb::{TmdbApi, TmdbCredits, TmdbGenre, TmdbMovieDetails};

/// Default lifetime of a cached detail payload (2 hours).
pub const DEFAULT_DETAIL_TTL: Duration = Duration::from_secs(7200);

/// Maximum cast members kept.
const MAX_CAST: usize = 10;

/// Maximum crew members kept.
const MAX_CREW: usize = 10;

/// Crew jobs worth showing.
const KEY_CREW_JOBS: &[&str] = &[
    "Director",
    "Screenplay",
    "Writer",
    "Novel",
    "Producer",
    "Original Music Composer",
    "Director of Photography",
];

/// A billed cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person name.
    pub name: String,
    /// Character played.
    pub character: String,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// A key crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person name.
    pub name: String,
    /// Job title.
    pub job: String,
    /// Department.
    pub department: String,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// Full movie detail with credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Summary fields, flattened into the payload.
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Genres with names.
    pub genres: Vec<TmdbGenre>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Release status.
    pub status: Option<String>,
    /// Name of the first credited director.
    pub director: Option<String>,
    /// Top-billed cast.
    pub cast: Vec<CastMember>,
    /// Key crew in upstream order.
    pub crew: Vec<CrewMember>,
}

impl MovieDetail {
    /// Merges primary metadata with credits.
    #[must_use]
    pub fn merge(details: TmdbMovieDetails, credits: TmdbCredits) -> Self {
        let production: Vec<&str> = details
            .production_countries
            .iter()
            .map(|c| c.iso_3166_1.as_str())
            .collect();
        let production_countries = merge_countries(&production, &details.origin_country);
        let title = details.title.unwrap_or_default();

        let summary = MovieSummary {
            id: details.id,
            original_title: details.original_title.unwrap_or_else(|| title.clone()),
            title,
            poster_path: non_empty(details.poster_path),
            backdrop_path: non_empty(details.backdrop_path),
            release_date: non_empty(details.release_date),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            overview: details.overview.unwrap_or_default(),
            popularity: details.popularity,
            original_language: details.original_language,
            production_countries,
            genre_ids: details.genres.iter().map(|g| g.id).collect(),
        };

        let director = credits
            .crew
            .iter()
            .find(|c| c.job == "Director")
            .map(|c| c.name.clone());

        let cast = credits
            .cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                name: c.name,
                character: c.character,
                profile_path: non_empty(c.profile_path),
            })
            .collect();

        let crew = credits
            .crew
            .into_iter()
            .filter(|c| KEY_CREW_JOBS.contains(&c.job.as_str()))
            .take(MAX_CREW)
            .map(|c| CrewMember {
                name: c.name,
                job: c.job,
                department: c.department,
                profile_path: non_empty(c.profile_path),
            })
            .collect();

        Self {
            summary,
            runtime: details.runtime.filter(|&minutes| minutes > 0),
            genres: details.genres,
            tagline: non_empty(details.tagline),
            status: non_empty(details.status),
            director,
            cast,
            crew,
        }
    }
}

/// Fetches movie details and credits, caching the merged result.
#[derive(Debug)]
pub struct DetailFetcher<A, C> {
    api: Arc<A>,
    cache: C,
    language: String,
    ttl: Duration,
}

impl<A, C> DetailFetcher<A, C>
where
    A: TmdbApi + Send + Sync,
    C: TtlCache<MovieDetail>,
{
    /// Creates a fetcher using `language` for upstream requests.
    pub fn new(api: Arc<A>, cache: C, language: impl Into<String>, ttl: Duration) -> Self {
        Self {
            api,
            cache,
            language: language.into(),
            ttl,
        }
    }

    /// The cache backing this fetcher.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the detail for `movie_id`, from cache when fresh.
    ///
    /// On a miss, details and credits are requested concurrently; both must
    /// succeed before anything is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if either upstream call fails.
    #[instrument(skip_all, fields(movie_id = movie_id))]
    pub async fn fetch(&self, movie_id: u64) -> Result<MovieDetail> {
        let key = cache_key(movie_id);
        if let Some(detail) = self.cache.get(&key) {
            tracing::debug!("Movie detail cache hit");
            return Ok(detail);
        }

        let (details, credits) = tokio::try_join!(
            self.api.movie_details(movie_id, &self.language),
            self.api.movie_credits(movie_id, &self.language),
        )
        .with_context(|| format!("failed to fetch movie {movie_id}"))?;

        let detail = MovieDetail::merge(details, credits);
        self.cache.set(&key, detail.clone(), self.ttl);
        tracing::debug!(ttl_secs = self.ttl.as_secs(), "Movie detail cached");
        Ok(detail)
    }
}

/// Cache key for a movie id.
fn cache_key(movie_id: u64) -> String {
    format!("movie_{movie_id}")
}
