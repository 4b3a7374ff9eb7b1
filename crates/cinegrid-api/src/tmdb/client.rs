//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::params::{DiscoverMovieParams, SearchMovieParams};
use super::rate_limiter::TmdbRateLimiter;
use super::retry::RetryPolicy;
use super::types::{TmdbCredits, TmdbErrorResponse, TmdbMovieDetails, TmdbMovieListResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default per-request transport timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
    /// Retry policy for transient failures.
    retry_policy: RetryPolicy,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
            retry_policy: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the retry policy (default: 3 retries, 1s base backoff).
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the per-request transport timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        if api_token.trim().is_empty() {
            bail!("api_token is required");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Waits for the next rate-limiter slot.
    async fn acquire_slot(&self) {
        let wait = self.rate_limiter.lock().await.reserve(Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    /// Sends a GET request with Bearer auth, query params, and rate limiting.
    /// Transient failures are retried according to the client's `RetryPolicy`.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        let max_retries = self.retry_policy.max_retries;

        let mut retries = 0u32;
        loop {
            self.acquire_slot().await;

            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let response = match self.http_client.execute(request).await {
                Ok(response) => response,
                Err(err) if RetryPolicy::is_retryable_error(&err) && retries < max_retries => {
                    retries = retries.saturating_add(1);
                    tracing::warn!(
                        retry = retries,
                        max_retries,
                        error = %err,
                        "TMDB API transport failure. Retrying..."
                    );
                    tokio::time::sleep(self.retry_policy.backoff(retries)).await;
                    continue;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("request failed: {path}"));
                }
            };

            let status = response.status();

            if RetryPolicy::is_retryable_status(status) {
                if retries >= max_retries {
                    bail!("TMDB API error (HTTP {status}) after {max_retries} retries: {path}");
                }
                retries = retries.saturating_add(1);
                tracing::warn!(
                    retry = retries,
                    max_retries,
                    status = status.as_u16(),
                    "TMDB API transient error. Retrying..."
                );
                tokio::time::sleep(self.retry_policy.backoff(retries)).await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

/// Joins ids with `|` (TMDB's OR separator).
fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

/// Builds the query string pairs for `discover/movie`.
fn discover_query(params: &DiscoverMovieParams) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&str, String)> = vec![
        ("language", params.language.clone()),
        ("page", params.page.to_string()),
        ("sort_by", params.sort_by.clone()),
        ("include_adult", params.include_adult.to_string()),
        ("vote_count.gte", params.vote_count_gte.to_string()),
    ];
    if let Some(date) = params.release_date_gte {
        query.push(("primary_release_date.gte", date.format("%Y-%m-%d").to_string()));
    }
    if let Some(date) = params.release_date_lte {
        query.push(("primary_release_date.lte", date.format("%Y-%m-%d").to_string()));
    }
    if !params.with_genres.is_empty() {
        query.push(("with_genres", join_ids(&params.with_genres)));
    }
    if let Some(ref region) = params.region {
        query.push(("region", region.clone()));
    }
    if let Some(ref country) = params.with_origin_country {
        query.push(("with_origin_country", country.clone()));
    }
    if let Some(ref language) = params.with_original_language {
        query.push(("with_original_language", language.clone()));
    }
    if let Some(ref types) = params.watch_monetization_types {
        query.push(("with_watch_monetization_types", types.clone()));
    }
    if let Some(ref types) = params.release_types {
        query.push(("with_release_type", types.clone()));
    }
    if let Some(token) = params.cache_buster {
        query.push(("timestamp", token.to_string()));
    }
    query
}

/// Builds the query string pairs for `search/movie`.
fn search_query(params: &SearchMovieParams) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&str, String)> = vec![
        ("query", params.query.clone()),
        ("language", params.language.clone()),
        ("page", params.page.to_string()),
        ("include_adult", params.include_adult.to_string()),
    ];
    if let Some(ref region) = params.region {
        query.push(("region", region.clone()));
    }
    if let Some(token) = params.cache_buster {
        query.push(("timestamp", token.to_string()));
    }
    query
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(page = params.page))]
    async fn discover_movies(&self, params: &DiscoverMovieParams) -> Result<TmdbMovieListResponse> {
        self.get_json("discover/movie", &discover_query(params))
            .await
    }

    #[instrument(skip_all, fields(page = params.page))]
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<TmdbMovieListResponse> {
        self.get_json("search/movie", &search_query(params)).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64, language: &str) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_credits(&self, movie_id: u64, language: &str) -> Result<TmdbCredits> {
        let path = format!("movie/{movie_id}/credits");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }
}
