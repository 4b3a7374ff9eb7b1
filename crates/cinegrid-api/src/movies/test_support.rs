//! Scripted `TmdbApi` implementation with call counters.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};

use crate::tmdb::{
    DiscoverMovieParams, SearchMovieParams, TmdbApi, TmdbCredits, TmdbMovieDetails,
    TmdbMovieListResponse,
};

/// Serves canned responses; `None` makes the corresponding call fail.
#[derive(Debug, Default)]
pub struct StubApi {
    pub list: Option<TmdbMovieListResponse>,
    pub details: Option<TmdbMovieDetails>,
    pub credits: Option<TmdbCredits>,
    pub discover_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub credits_calls: AtomicUsize,
    pub last_discover: Mutex<Option<DiscoverMovieParams>>,
}

impl StubApi {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn discover_fixture() -> TmdbMovieListResponse {
    let json = include_str!("../../../../fixtures/tmdb/discover_kr_released.json");
    serde_json::from_str(json).unwrap()
}

pub fn search_fixture() -> TmdbMovieListResponse {
    let json = include_str!("../../../../fixtures/tmdb/search_movie_parasite.json");
    serde_json::from_str(json).unwrap()
}

pub fn details_fixture() -> TmdbMovieDetails {
    let json = include_str!("../../../../fixtures/tmdb/movie_details_496243.json");
    serde_json::from_str(json).unwrap()
}

pub fn credits_fixture() -> TmdbCredits {
    let json = include_str!("../../../../fixtures/tmdb/movie_credits_496243.json");
    serde_json::from_str(json).unwrap()
}

impl TmdbApi for StubApi {
    async fn discover_movies(&self, params: &DiscoverMovieParams) -> Result<TmdbMovieListResponse> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_discover.lock().unwrap() = Some(params.clone());
        match self.list {
            Some(ref list) => Ok(list.clone()),
            None => bail!("TMDB API error (HTTP 500 Internal Server Error): stub"),
        }
    }

    async fn search_movies(&self, _params: &SearchMovieParams) -> Result<TmdbMovieListResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        match self.list {
            Some(ref list) => Ok(list.clone()),
            None => bail!("TMDB API error (HTTP 500 Internal Server Error): stub"),
        }
    }

    async fn movie_details(&self, _movie_id: u64, _language: &str) -> Result<TmdbMovieDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        match self.details {
            Some(ref details) => Ok(details.clone()),
            None => bail!("TMDB API error (HTTP 404 Not Found): stub"),
        }
    }

    async fn movie_credits(&self, _movie_id: u64, _language: &str) -> Result<TmdbCredits> {
        self.credits_calls.fetch_add(1, Ordering::SeqCst);
        match self.credits {
            Some(ref credits) => Ok(credits.clone()),
            None => bail!("TMDB API error (HTTP 503 Service Unavailable): stub"),
        }
    }
}
