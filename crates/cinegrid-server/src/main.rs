//! cinegrid - TMDB movie browsing proxy and front-end host.

/// Application configuration (TOML).
mod config;
/// HTTP server.
mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use crate::server::AppState;
use cinegrid_api::cache::MemoryCache;
use cinegrid_api::movies::{DetailFetcher, ListQuery, MovieDetail, RawListParams, list_movies};
use cinegrid_api::tmdb::TmdbClient;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP proxy and serve the front-end.
    Serve(ServeArgs),
    /// Run one list query and print the results.
    Movies(MoviesArgs),
    /// Fetch one movie's detail and credits.
    Movie(MovieArgs),
    /// Write a default config file.
    Init(InitArgs),
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `serve` subcommand.
#[derive(clap::Args)]
struct ServeArgs {
    /// Listen port (overrides config and `PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Bind address (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Front-end directory (overrides config).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// Page number (1-100).
    #[arg(long)]
    page: Option<u32>,

    /// Comma-separated genre IDs (e.g. "28,12").
    #[arg(long)]
    genre: Option<String>,

    /// Two-letter country code, or "all".
    #[arg(long)]
    region: Option<String>,

    /// Free-text title search.
    #[arg(long)]
    query: Option<String>,

    /// Sort order (e.g. "popularity.desc").
    #[arg(long)]
    sort: Option<String>,

    /// Release window: "upcoming" or "released".
    #[arg(long)]
    release_status: Option<String>,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    id: u64,
}

/// Loads the config file and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config cannot be read, an override is invalid,
/// or a value fails validation.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir.map(PathBuf::as_path))?;
    let mut config = AppConfig::load(&config_path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    tracing::debug!(path = %config_path.display(), "Loaded config");
    Ok(config)
}

/// Builds a `TmdbClient` from the loaded config.
///
/// # Errors
///
/// Returns an error if no token is configured, the base URL is invalid, or
/// the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = config.require_api_token()?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(config.tmdb.timeout_secs))
        .min_interval(Duration::from_millis(config.tmdb.min_interval_ms))
        .retry_policy(config.tmdb.retry_policy());

    if let Some(ref raw) = config.tmdb.base_url {
        let mut raw = raw.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).with_context(|| format!("invalid tmdb.base_url: {raw}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Runs the `serve` subcommand.
///
/// # Errors
///
/// Returns an error if the token is missing, the config is invalid, or the
/// server fails to bind.
async fn run_serve(args: ServeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut config = load_config(dir)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(static_dir) = args.static_dir {
        config.server.static_dir = static_dir;
    }

    let client = build_tmdb_client(&config)?;
    let listing = config.listing_options()?;
    let state = Arc::new(AppState::new(
        client,
        listing,
        Duration::from_secs(config.cache.detail_ttl_secs),
    ));

    server::serve(
        state,
        &config.server,
        Duration::from_secs(config.cache.sweep_interval_secs),
    )
    .await
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if the query is invalid, the token is missing, or the
/// upstream request fails.
#[instrument(skip_all)]
async fn run_movies(args: MoviesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let raw = RawListParams {
        page: args.page.map(|p| p.to_string()),
        genre: args.genre,
        region: args.region,
        query: args.query,
        sort: args.sort,
        release_status: args.release_status,
    };
    let query = ListQuery::from_raw(&raw)?;

    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let listing = config.listing_options()?;

    let page = list_movies(&client, &query, &listing)
        .await
        .context("movie list request failed")?;

    tracing::info!(
        "Page {}/{} ({} total, {} shown)",
        page.page,
        page.total_pages,
        page.total_results,
        page.results.len()
    );
    tracing::info!("ID\tRelease\t\tVotes\tCountries\tTitle");
    for movie in &page.results {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t\t{}",
            movie.id,
            movie.release_date.as_deref().unwrap_or("-"),
            movie.vote_average,
            movie.production_countries.join(","),
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the token is missing or either upstream request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let fetcher = DetailFetcher::new(
        Arc::new(client),
        MemoryCache::<MovieDetail>::new(),
        config.tmdb.language.clone(),
        Duration::from_secs(config.cache.detail_ttl_secs),
    );

    let detail = fetcher.fetch(args.id).await?;

    tracing::info!("ID:        {}", detail.summary.id);
    tracing::info!("Title:     {}", detail.summary.title);
    tracing::info!("Original:  {}", detail.summary.original_title);
    if let Some(ref tagline) = detail.tagline {
        tracing::info!("Tagline:   {tagline}");
    }
    tracing::info!(
        "Release:   {}",
        detail.summary.release_date.as_deref().unwrap_or("-")
    );
    if let Some(runtime) = detail.runtime {
        tracing::info!("Runtime:   {runtime} min");
    }
    tracing::info!(
        "Genres:    {}",
        detail
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!("Director:  {}", detail.director.as_deref().unwrap_or("-"));
    for member in &detail.cast {
        tracing::info!("  {}\t{}", member.name, member.character);
    }
    for member in &detail.crew {
        tracing::info!("  {}\t{}", member.job, member.name);
    }

    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config exists without `--force` or cannot be
/// written.
fn run_init(args: &InitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir.map(PathBuf::as_path))?;
    if config_path.exists() && !args.force {
        bail!(
            "config already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::default().save(&config_path)?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => run_serve(args, cli.dir.as_ref()).await,
        Commands::Movies(args) => run_movies(args, cli.dir.as_ref()).await,
        Commands::Movie(args) => run_movie(&args, cli.dir.as_ref()).await,
        Commands::Init(args) => run_init(&args, cli.dir.as_ref()),
    }
}
