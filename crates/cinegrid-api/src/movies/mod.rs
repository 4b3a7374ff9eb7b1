//! Movie list and detail services.
//!
//! A list request is parsed into a [`ListQuery`], translated into a
//! `discover/movie` or `search/movie` call, post-filtered and reshaped into
//! a [`MoviePage`]. Detail requests go through [`DetailFetcher`], which
//! joins the details and credits calls and caches the merged payload.

mod detail;
mod listing;
mod query;
mod region;
mod translate;

#[cfg(test)]
mod test_support;

pub use detail::{CastMember, CrewMember, DEFAULT_DETAIL_TTL, DetailFetcher, MovieDetail};
pub use listing::{
    DEFAULT_UTC_OFFSET_SECS, ListingOptions, MoviePage, MovieSummary, cache_buster_now,
    list_movies, list_movies_at, today_at,
};
pub use query::{InvalidQuery, ListQuery, MAX_PAGE, RawListParams, ReleaseWindow, SortKey};
pub use region::{
    DEFAULT_VOTE_FLOOR, RELAXED_VOTE_FLOOR, RegionFilter, RegionMatch, special_language,
};
pub use translate::{ResultFilter, TranslateOptions, Translation, UpstreamRequest, translate};
