//! Router assembly.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use super::state::AppState;

/// Builds the application router.
///
/// API responses carry no-store headers. When `static_dir` is given, unknown
/// paths are served from it with `index.html` as the fallback document.
pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let api = Router::new()
        .route("/movies", get(routes::list_movies))
        .route("/movies/{id}", get(routes::movie_detail))
        .route("/genres", get(routes::genres))
        .route("/countries", get(routes::countries))
        .fallback(routes::api_not_found)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("-1"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ));

    let mut app = Router::new()
        .route("/health", get(routes::health))
        .nest("/api", api);

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(
            ServeDir::new(dir)
                .append_index_html_on_directories(true)
                .fallback(ServeFile::new(index)),
        );
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cinegrid_api::movies::ListingOptions;
    use cinegrid_api::tmdb::{RetryPolicy, TmdbClient};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DISCOVER_JSON: &str = include_str!("../../../../fixtures/tmdb/discover_kr_released.json");
    const DETAILS_JSON: &str = include_str!("../../../../fixtures/tmdb/movie_details_496243.json");
    const CREDITS_JSON: &str = include_str!("../../../../fixtures/tmdb/movie_credits_496243.json");

    fn state_for(server: &MockServer) -> Arc<AppState> {
        let base_url = Url::parse(&format!("{}/3/", server.uri())).unwrap();
        let client = TmdbClient::builder()
            .base_url(base_url)
            .api_token("test-token")
            .user_agent("cinegrid-test/0.1")
            .min_interval(Duration::ZERO)
            .retry_policy(RetryPolicy {
                max_retries: 0,
                base_backoff: Duration::ZERO,
            })
            .build()
            .unwrap();
        Arc::new(AppState::new(
            client,
            ListingOptions::default(),
            Duration::from_secs(60),
        ))
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        // Arrange
        let server = MockServer::start().await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, _, body) = send(app, "/health").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_genres_in_display_order_with_no_store_headers() {
        // Arrange
        let server = MockServer::start().await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, headers, body) = send(app, "/api/genres").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(headers[CACHE_CONTROL].to_str().unwrap().contains("no-store"));
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "-1");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("{\"액션\":28"));
    }

    #[tokio::test]
    async fn test_countries() {
        // Arrange
        let server = MockServer::start().await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, _, body) = send(app, "/api/countries").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let value = json(&body);
        assert_eq!(value["한국"], "KR");
        assert_eq!(value["일본"], "JP");
    }

    #[tokio::test]
    async fn test_list_movies_filters_by_region() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .and(query_param("with_origin_country", "KR"))
            .and(query_param("with_original_language", "ko"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DISCOVER_JSON))
            .expect(1)
            .mount(&server)
            .await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, headers, body) = send(app, "/api/movies?page=1&region=KR").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(headers[CACHE_CONTROL].to_str().unwrap().contains("no-store"));
        let value = json(&body);
        assert_eq!(value["page"], 1);
        assert_eq!(value["total_pages"], 100);
        let ids: Vec<u64> = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1_017_163, 838_209, 1_174_218]);
    }

    #[tokio::test]
    async fn test_list_movies_invalid_sort_is_400_without_upstream_call() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DISCOVER_JSON))
            .expect(0)
            .mount(&server)
            .await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, _, body) = send(app, "/api/movies?sort=loudest").await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["code"], "invalid_query");
    }

    #[tokio::test]
    async fn test_list_movies_upstream_failure_is_500() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, _, body) = send(app, "/api/movies").await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value = json(&body);
        assert_eq!(value["error"], "영화 데이터를 가져오는데 실패했습니다.");
        assert_eq!(value["code"], "upstream_error");
    }

    #[tokio::test]
    async fn test_movie_detail_cached_after_first_fetch() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/496243"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAILS_JSON))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/496243/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CREDITS_JSON))
            .expect(1)
            .mount(&server)
            .await;
        let app = build_router(state_for(&server), None);

        // Act
        let (first_status, _, first) = send(app.clone(), "/api/movies/496243").await;
        let (second_status, _, second) = send(app, "/api/movies/496243").await;

        // Assert
        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(first, second);
        let value = json(&first);
        assert_eq!(value["title"], "기생충");
        assert_eq!(value["director"], "봉준호");
        assert_eq!(value["cast"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_movie_detail_credits_failure_is_500() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/496243"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAILS_JSON))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/496243/credits"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#,
            ))
            .mount(&server)
            .await;
        let state = state_for(&server);
        let app = build_router(Arc::clone(&state), None);

        // Act
        let (status, _, body) = send(app, "/api/movies/496243").await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["error"], "영화 상세 정보를 가져오는데 실패했습니다.");
        assert!(state.details.cache().is_empty());
    }

    #[tokio::test]
    async fn test_movie_detail_non_numeric_id_is_400() {
        // Arrange
        let server = MockServer::start().await;
        let app = build_router(state_for(&server), None);

        // Act
        let (status, _, body) = send(app, "/api/movies/abc").await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["code"], "invalid_query");
    }

    #[tokio::test]
    async fn test_static_fallback_serves_index() {
        // Arrange
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>cinegrid</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
        let app = build_router(state_for(&server), Some(dir.path()));

        // Act
        let (index_status, _, index) = send(app.clone(), "/").await;
        let (asset_status, _, asset) = send(app.clone(), "/app.js").await;
        let (deep_status, _, deep) = send(app, "/some/client/route").await;

        // Assert
        assert_eq!(index_status, StatusCode::OK);
        assert_eq!(index, b"<h1>cinegrid</h1>");
        assert_eq!(asset_status, StatusCode::OK);
        assert_eq!(asset, b"console.log(1);");
        assert_eq!(deep_status, StatusCode::OK);
        assert_eq!(deep, b"<h1>cinegrid</h1>");
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404_with_static_dir() {
        // Arrange
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>cinegrid</h1>").unwrap();
        let app = build_router(state_for(&server), Some(dir.path()));

        // Act
        let (status, _, body) = send(app, "/api/shows").await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["code"], "not_found");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        // Arrange
        let server = MockServer::start().await;
        let app = build_router(state_for(&server), None);
        let request = Request::builder()
            .uri("/api/genres")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
