//! Error-to-HTTP response conversion.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure message for the list endpoint.
const LIST_FAILED: &str = "영화 데이터를 가져오는데 실패했습니다.";

/// Failure message for the detail endpoint.
const DETAIL_FAILED: &str = "영화 상세 정보를 가져오는데 실패했습니다.";

/// Message for an unknown API path.
const NOT_FOUND: &str = "요청한 API를 찾을 수 없습니다.";

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request parameters.
    InvalidQuery(String),
    /// No API route matches the request path.
    NotFound,
    /// Upstream failure while listing movies.
    ListFailed(anyhow::Error),
    /// Upstream failure while fetching a movie detail.
    DetailFailed(anyhow::Error),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ListFailed(_) | Self::DetailFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "invalid_query",
            Self::NotFound => "not_found",
            Self::ListFailed(_) | Self::DetailFailed(_) => "upstream_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuery(message) => f.write_str(message),
            Self::NotFound => f.write_str(NOT_FOUND),
            Self::ListFailed(_) => f.write_str(LIST_FAILED),
            Self::DetailFailed(_) => f.write_str(DETAIL_FAILED),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidQuery(_) | Self::NotFound => None,
            Self::ListFailed(err) | Self::DetailFailed(err) => Some(&**err),
        }
    }
}

impl From<cinegrid_api::movies::InvalidQuery> for ApiError {
    fn from(err: cinegrid_api::movies::InvalidQuery) -> Self {
        Self::InvalidQuery(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::ListFailed(ref err) | Self::DetailFailed(ref err) => {
                tracing::error!(status = %status, error = %format!("{err:#}"), "Upstream request failed");
            }
            Self::InvalidQuery(ref message) => {
                tracing::debug!(status = %status, error = %message, "Rejected request");
            }
            Self::NotFound => {}
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        (status, Json(body)).into_response()
    }
}
