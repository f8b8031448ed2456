use std::sync::Arc;

use api::ApplicationServer;
use api::mocks::{UpstreamTestFixture, test_config};
use api::server::error::Error;
use api::server::services::Services;
use api::upstream::moviebox::{EpisodeRef, SearchRequest};
use api::upstream::showbox::{EmbedLink, EmbedQuery};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use serde_json::{Value, json};
use tower::ServiceExt;

fn mocked_router(fixture: UpstreamTestFixture) -> Router {
    ApplicationServer::router(fixture.into_services(test_config("http://127.0.0.1:9")), None)
}

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

fn play_body() -> Value {
    json!({
        "code": 0,
        "data": {
            "streams": [
                {
                    "id": "1", "format": "MP4", "url": "https://cdn.test/360.mp4",
                    "resolutions": "360", "size": "1000", "duration": 2400, "codecName": "h264"
                },
                {
                    "id": "2", "format": "MP4", "url": "https://cdn.test/1080.mp4",
                    "resolutions": 1080, "size": 5000, "duration": "2400", "codecName": "h265"
                }
            ]
        }
    })
}

fn embed(provider: &str, url: &str) -> EmbedLink {
    EmbedLink {
        provider: provider.to_string(),
        url: url.to_string(),
        quality: "HD".to_string(),
    }
}

#[tokio::test]
async fn settle_on_embed_when_links_exist() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_showbox
        .expect_links()
        .withf(|q: &EmbedQuery| q.title == "Dune" && q.season.is_none())
        .times(1)
        .returning(|_| Ok(vec![embed("vidsrc", "https://embed.test/dune")]));
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(router, "/api/watch/sources?title=Dune").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "embed");
    assert_eq!(body["active"], "embed");
    assert_eq!(body["loading"], false);
    assert_eq!(body["current"]["url"], "https://embed.test/dune");
    assert!(body["direct_streams"].is_null());
}

#[tokio::test]
async fn fall_back_to_direct_when_no_embed_links() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_showbox
        .expect_links()
        .times(1)
        .returning(|_| Ok(vec![]));
    fixture
        .mock_moviebox
        .expect_search()
        .withf(|r: &SearchRequest| r.keyword == "Severance" && r.subject_type == 2)
        .times(1)
        .returning(|_| {
            Ok(json!({
                "code": 0,
                "data": { "items": [
                    { "subjectId": "11", "title": "Severance Pay", "subjectType": 1 },
                    {
                        "subjectId": "42", "title": "Severance", "subjectType": 2,
                        "genre": null, "cover": null
                    }
                ]}
            }))
        });
    fixture
        .mock_moviebox
        .expect_play()
        .withf(|e: &EpisodeRef| e.subject_id == "42" && e.season == 1 && e.episode == 2)
        .times(1)
        .returning(|_| Ok(play_body()));
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(
        router,
        "/api/watch/sources?title=Severance&kind=series&season=1&episode=2",
    )
    .await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "direct");
    assert_eq!(body["active"], "direct");
    assert_eq!(body["embed_links"], json!([]));
    assert_eq!(body["direct_streams"].as_array().unwrap().len(), 2);
    assert_eq!(body["current"]["type"], "direct");
    assert_eq!(body["current"]["resolution"], "360");
}

#[tokio::test]
async fn flag_error_when_embed_lookup_fails() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_showbox
        .expect_links()
        .times(1)
        .returning(|_| Err(Error::Upstream("showbox returned 502".to_string())));
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(router, "/api/watch/sources?title=Dune&subjectId=77").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "failed");
    assert_eq!(body["active"], "embed");
    assert_eq!(body["error"], true);
    assert_eq!(body["loading"], false);
    assert!(body["current"].is_null());
}

#[tokio::test]
async fn apply_manual_switch_and_selection() {
    // arrange
    let mut fixture = UpstreamTestFixture::new();
    fixture
        .mock_showbox
        .expect_links()
        .times(1)
        .returning(|_| Ok(vec![embed("a", "https://embed.test/a")]));
    fixture
        .mock_moviebox
        .expect_play()
        .withf(|e: &EpisodeRef| e.subject_id == "77" && e.season == 0 && e.episode == 0)
        .times(1)
        .returning(|_| Ok(play_body()));
    let router = mocked_router(fixture);

    // act
    let (status, body) = get_json(
        router,
        "/api/watch/sources?title=Dune&subjectId=77&source=direct&index=1",
    )
    .await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "direct");
    assert_eq!(body["selected"], 1);
    assert_eq!(body["current"]["url"], "https://cdn.test/1080.mp4");
    assert_eq!(body["embed_links"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reject_missing_or_blank_title_and_unknown_kind() {
    // arrange
    let router = mocked_router(UpstreamTestFixture::new());

    // act
    let (missing, missing_body) = get_json(router.clone(), "/api/watch/sources?kind=movie").await;
    let (blank, blank_body) = get_json(router.clone(), "/api/watch/sources?title=%20%20").await;
    let (unknown, _) = get_json(router, "/api/watch/sources?title=Dune&kind=podcast").await;

    // assert
    assert_eq!(missing, StatusCode::BAD_REQUEST);
    assert_eq!(missing_body["error"], "Missing required query parameter: title");
    assert_eq!(blank, StatusCode::BAD_REQUEST);
    assert_eq!(blank_body["error"], "Missing required query parameter: title");
    assert_eq!(unknown, StatusCode::BAD_REQUEST);
}

// showbox answering with a null list has to count as "no links", not as a failed lookup
async fn spawn_upstream_with_null_links() -> String {
    let app = Router::new()
        .route(
            "/api/links",
            get(|| async { axum::Json(json!({ "links": null })) }),
        )
        .route(
            "/wefeed-h5-bff/app/get-latest-app-pkgs",
            get(|| async { ([("x-user", r#"{"token":"t"}"#)], axum::Json(json!({}))) }),
        )
        .route(
            "/wefeed-h5-bff/web/subject/play",
            get(|| async { axum::Json(play_body()) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn fall_back_to_direct_when_showbox_sends_null_links() {
    // arrange
    let base = spawn_upstream_with_null_links().await;
    let services = Services::new(Arc::new(test_config(&base))).unwrap();
    let router = ApplicationServer::router(services, None);

    // act
    let (status, body) = get_json(router, "/api/watch/sources?title=Dune&subjectId=77").await;

    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "direct");
    assert_eq!(body["error"], false);
    assert_eq!(body["embed_links"], json!([]));
    assert_eq!(body["direct_streams"].as_array().unwrap().len(), 2);
}
