//! `AppConfig` struct, TOML read/write and environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::FixedOffset;
use cinegrid_api::movies::{DEFAULT_UTC_OFFSET_SECS, ListingOptions, RegionMatch, TranslateOptions};
use cinegrid_api::tmdb::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Environment variable holding the TMDB bearer token.
pub const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream TMDB settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// List endpoint settings.
    #[serde(default)]
    pub listing: ListingConfig,
    /// Detail cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Directory holding the front-end bundle.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3000,
            static_dir: PathBuf::from("frontend"),
        }
    }
}

/// Upstream TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// Bearer token; `TMDB_API_TOKEN` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Base URL override (e.g. a local mock).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Response language for list and detail requests.
    pub language: String,
    /// Per-request transport timeout in seconds.
    pub timeout_secs: u64,
    /// Minimum interval between requests in milliseconds.
    pub min_interval_ms: u64,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry in milliseconds; doubles per retry.
    pub retry_backoff_ms: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: None,
            language: String::from("ko-KR"),
            timeout_secs: 10,
            min_interval_ms: 25,
            max_retries: 3,
            retry_backoff_ms: 1000,
        }
    }
}

impl TmdbConfig {
    /// Retry policy built from the configured values.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// List endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingConfig {
    /// How country and language checks combine for a selected region.
    pub region_match: RegionMatch,
    /// UTC offset, in seconds, that "today" is computed in.
    pub utc_offset_secs: i32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            region_match: RegionMatch::default(),
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
        }
    }
}

/// Detail cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a cached detail payload in seconds.
    pub detail_ttl_secs: u64,
    /// Interval between expired-entry sweeps in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            detail_ttl_secs: 7200,
            sweep_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Applies `TMDB_API_TOKEN` and `PORT` from `lookup`.
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.tmdb.api_token = Some(token);
        }
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {port:?}"))?;
        }
        Ok(())
    }

    /// The configured TMDB token.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-blank token is configured.
    pub fn require_api_token(&self) -> Result<&str> {
        match self.tmdb.api_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => bail!(
                "TMDB credential is missing: set {TOKEN_ENV} or tmdb.api_token in config.toml"
            ),
        }
    }

    /// Rejects values that cannot drive a running server.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmdb.timeout_secs` or `cache.sweep_interval_secs`
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.tmdb.timeout_secs == 0 {
            bail!("tmdb.timeout_secs must be greater than zero");
        }
        if self.cache.sweep_interval_secs == 0 {
            bail!("cache.sweep_interval_secs must be greater than zero");
        }
        Ok(())
    }

    /// List service options built from the configured values.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured UTC offset is out of range.
    pub fn listing_options(&self) -> Result<ListingOptions> {
        let utc_offset = FixedOffset::east_opt(self.listing.utc_offset_secs).with_context(|| {
            format!(
                "listing.utc_offset_secs out of range: {}",
                self.listing.utc_offset_secs
            )
        })?;
        Ok(ListingOptions {
            translate: TranslateOptions {
                language: self.tmdb.language.clone(),
                region_match: self.listing.region_match,
            },
            utc_offset,
        })
    }
}
