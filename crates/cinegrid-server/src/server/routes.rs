//! API route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use cinegrid_api::catalog::{self, Table};
use cinegrid_api::movies::{self, ListQuery, MovieDetail, MoviePage, RawListParams};

use super::error::ApiError;
use super::state::AppState;

/// `GET /api/movies`
///
/// # Errors
///
/// Returns `InvalidQuery` for malformed parameters and `ListFailed` when the
/// upstream call fails.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawListParams>,
) -> Result<Json<MoviePage>, ApiError> {
    let query = ListQuery::from_raw(&raw)?;
    let page = movies::list_movies(state.api.as_ref(), &query, &state.listing)
        .await
        .map_err(ApiError::ListFailed)?;
    Ok(Json(page))
}

/// `GET /api/movies/{id}`
///
/// # Errors
///
/// Returns `InvalidQuery` for a non-numeric id and `DetailFailed` when either
/// upstream call fails.
pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MovieDetail>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        ApiError::InvalidQuery(format!("invalid movie id: {}", rejection.body_text()))
    })?;
    let detail = state
        .details
        .fetch(id)
        .await
        .map_err(ApiError::DetailFailed)?;
    Ok(Json(detail))
}

/// `GET /api/genres`
pub async fn genres() -> Json<Table<u32>> {
    Json(catalog::genres())
}

/// `GET /api/countries`
pub async fn countries() -> Json<Table<&'static str>> {
    Json(catalog::countries())
}

/// Fallback for unmatched `/api/...` paths.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
