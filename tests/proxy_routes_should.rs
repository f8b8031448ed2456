use std::collections::HashMap;
use std::sync::Arc;

use api::ApplicationServer;
use api::mocks::{UpstreamTestFixture, test_config};
use api::server::services::Services;
use api::upstream::TokenStatus;
use api::upstream::arslan::ArslanEndpoint;
use axum::Router;
use axum::body::Body;
use axum::extract::Query;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// a stand in for api.imdbapi.dev that only knows one title
async fn spawn_imdb() -> String {
    let app = Router::new().route(
        "/search/titles",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let query = params.get("query").cloned().unwrap_or_default();
            axum::Json(json!({
                "titles": [{ "id": "tt0372784", "primaryTitle": "Batman Begins", "query": query }]
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn mocked_router(fixture: UpstreamTestFixture) -> Router {
    ApplicationServer::router(fixture.into_services(test_config("http://127.0.0.1:9")), None)
}

#[tokio::test]
async fn reject_imdb_search_without_q() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (status, body) = get_json(router, "/api/imdb/search").await;

    // assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter: q");
}

#[tokio::test]
async fn reject_imdb_search_with_blank_q() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (status, body) = get_json(router, "/api/imdb/search?q=%20%20").await;

    // assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter: q");
}

#[tokio::test]
async fn send_imdb_the_trimmed_query() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_imdb
        .expect_search_titles()
        .withf(|query: &str| query == "batman")
        .times(1)
        .returning(|_| Ok(json!({ "titles": [] })));
    let router = mocked_router(fixture);

    // act
    let (status, _) = get_json(router, "/api/imdb/search?q=%20batman%20").await;

    // assert
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn return_titles_from_imdb() {
    // arrange
    let base = spawn_imdb().await;
    let services = Services::new(Arc::new(test_config(&base))).unwrap();
    let router = ApplicationServer::router(services, None);

    // act
    let (status, body) = get_json(router, "/api/imdb/search?q=batman").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    let titles = body["titles"].as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["query"], "batman");
}

#[tokio::test]
async fn pass_imdb_upstream_errors_as_500() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture.mock_imdb.expect_search_titles().returning(|_| {
        Err(api::server::error::Error::Upstream(
            "imdb returned 503 Service Unavailable".to_string(),
        ))
    });
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(router, "/api/imdb/search?q=batman").await;

    // assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn forward_arslan_search_text() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_arslan
        .expect_fetch()
        .withf(|endpoint: &ArslanEndpoint, value: &str| {
            endpoint.path == "/movie/sinhalasub/search" && value == "avatar"
        })
        .times(1)
        .returning(|_, _| Ok(json!({ "status": true, "result": [] })));
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(router, "/api/arslan/sinhalasub/search?text=avatar").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
}

#[tokio::test]
async fn reject_arslan_calls_missing_their_param() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (search, search_body) = get_json(router.clone(), "/api/arslan/pirate/search").await;
    let (movie, movie_body) =
        get_json(router.clone(), "/api/arslan/pirate/movie?text=avatar").await;
    let (unknown, _) = get_json(router, "/api/arslan/pirate/tvshow?url=https://x.test").await;

    // assert
    assert_eq!(search, StatusCode::BAD_REQUEST);
    assert_eq!(search_body["error"], "Missing required query parameter: text");
    assert_eq!(movie, StatusCode::BAD_REQUEST);
    assert_eq!(movie_body["error"], "Missing required query parameter: url");
    assert_eq!(unknown, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_bad_tmdb_path_values() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (media, _) = get_json(router.clone(), "/api/tmdb/popular/book").await;
    let (id, _) = get_json(router, "/api/tmdb/detail/movie/abc").await;

    // assert
    assert_eq!(media, StatusCode::BAD_REQUEST);
    assert_eq!(id, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_health_without_calling_upstream() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture.mock_tokens.expect_status().returning(|| TokenStatus {
        cached: false,
        age_seconds: None,
        ttl_seconds: 3600,
    });
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(router, "/health").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["tmdb"]["api_key_configured"], true);
    assert_eq!(body["services"]["moviebox_token"]["cached"], false);
}

#[tokio::test]
async fn answer_unknown_routes_with_json_404() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (status, body) = get_json(router, "/api/nothing/here").await;

    // assert
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
