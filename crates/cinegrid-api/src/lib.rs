//! Movie catalogue library for cinegrid.
//!
//! Provides the TMDB API client, the movie list/detail services built on
//! top of it, and the TTL cache they share.

/// TTL cache abstraction and in-memory implementation.
pub mod cache;

/// Static genre and country tables.
pub mod catalog;

/// Movie list translation and detail fetching.
pub mod movies;

/// TMDB API client.
pub mod tmdb;
