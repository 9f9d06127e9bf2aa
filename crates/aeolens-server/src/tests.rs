use std::sync::Arc;
use std::time::Duration;

use aeolens_core::{
    BlockDetection, EngineConfig, ErrorKind, FetchError, FetchedPage, Orchestrator, PageFetcher,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use crate::{router, shutdown_on, status_for};

const ARTICLE: &str = r#"<html><head><title>How to compost at home</title>
<meta name="description" content="A short guide to composting kitchen scraps."></head>
<body><main><h1>How to compost at home</h1>
<p>Composting turns kitchen scraps into soil. Mix greens and browns, keep it damp and turn it often.</p>
</main></body></html>"#;

/// Serves one article; `/blocked` answers with a Cloudflare challenge
struct StubFetcher;

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match url.path() {
            "/blocked" => Err(FetchError::Blocked(BlockDetection {
                is_blocked: true,
                block_type: "cloudflare_challenge".to_string(),
                evidence: vec!["HTTP 403".to_string()],
                aeo_impact: "Challenge page served".to_string(),
                recommendation: "Allow verified bots".to_string(),
            })),
            "/down" => Err(FetchError::Timeout),
            _ => Ok(FetchedPage {
                url: url.clone(),
                status_code: 200,
                html: ARTICLE.to_string(),
                block_detection: None,
            }),
        }
    }

    async fn probe(&self, _url: &Url) -> Result<u16, FetchError> {
        Ok(404)
    }
}

fn app() -> axum::Router {
    let config = EngineConfig {
        site_level: false,
        ..EngineConfig::default()
    };
    router(Arc::new(Orchestrator::new(StubFetcher, config)))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn analyze_returns_report() {
    let (status, body) = send(post_json(json!({
        "url": "example.com/compost",
        "targetKeywords": ["compost"]
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], "https://example.com/compost");
    assert_eq!(body["targetKeywords"], json!(["compost"]));
    assert!(body["overallScore"].as_u64().unwrap() <= 100);
    assert!(body["analyzers"]["siteLevelEEAT"].is_null());
    assert!(body["recommendations"].as_array().unwrap().len() <= 15);
}

#[tokio::test]
async fn keywords_are_optional() {
    let (status, body) = send(post_json(json!({ "url": "https://example.com/compost" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyzers"]["queryMatch"]["grade"], "N/A");
}

#[tokio::test]
async fn invalid_url_is_bad_request() {
    let (status, body) = send(post_json(json!({ "url": "ftp://example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid URL"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"targetKeywords\": []}"))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn blocked_page_is_unprocessable() {
    let (status, body) = send(post_json(json!({ "url": "https://example.com/blocked" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["blockDetection"]["blockType"], "cloudflare_challenge");
}

#[tokio::test]
async fn fetch_failure_is_bad_gateway() {
    let (status, body) = send(post_json(json!({ "url": "https://example.com/down" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("blockDetection").is_none());
}

#[test]
fn status_codes_per_error_kind() {
    assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(ErrorKind::Blocked), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(status_for(ErrorKind::Fetch), StatusCode::BAD_GATEWAY);
    assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn shutdown_follows_the_signal() {
    shutdown_on(async { Ok(()) }).await;
}

#[tokio::test(start_paused = true)]
async fn broken_signal_listener_keeps_serving() {
    let signal = async { Err(std::io::Error::other("no signal handler")) };
    let waited = tokio::time::timeout(Duration::from_secs(3600), shutdown_on(signal)).await;
    assert!(waited.is_err());
}
