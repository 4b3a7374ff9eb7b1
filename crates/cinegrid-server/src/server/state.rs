//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use cinegrid_api::cache::MemoryCache;
use cinegrid_api::movies::{DetailFetcher, ListingOptions, MovieDetail};
use cinegrid_api::tmdb::TmdbClient;

/// Detail fetcher as wired into the server.
pub type Details = DetailFetcher<TmdbClient, MemoryCache<MovieDetail>>;

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState {
    /// Upstream client for list queries.
    pub api: Arc<TmdbClient>,
    /// Cached detail fetcher; shares `api`.
    pub details: Details,
    /// List service settings.
    pub listing: ListingOptions,
}

impl AppState {
    /// Wires the client, cache and list settings together.
    #[must_use]
    pub fn new(api: TmdbClient, listing: ListingOptions, detail_ttl: Duration) -> Self {
        let api = Arc::new(api);
        let details = DetailFetcher::new(
            Arc::clone(&api),
            MemoryCache::new(),
            listing.translate.language.clone(),
            detail_ttl,
        );
        Self {
            api,
            details,
            listing,
        }
    }
}
