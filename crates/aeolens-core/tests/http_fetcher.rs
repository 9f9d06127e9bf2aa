//! HttpFetcher against a local mock server

#![cfg(feature = "http")]

use std::io::Write;

use aeolens_core::{FetchConfig, FetchError, HttpFetcher, PageFetcher};
use url::Url;

const ARTICLE: &str = r#"<html><head><title>Composting basics</title></head>
<body><main><p>Compost turns kitchen scraps and garden waste into a dark, crumbly soil
improver. Mix greens and browns, keep the heap as damp as a wrung-out sponge and turn it
every couple of weeks. Most heaps are ready in three to six months, depending on the
weather, the mix of materials and how often the pile gets turned.</p></main></body></html>"#;

const CHALLENGE: &str = r#"<!DOCTYPE html><html><head><title>Just a moment...</title></head>
<body><div id="cf-browser-verification"><script>window._cf_chl_opt={};</script></div></body></html>"#;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(FetchConfig::default()).expect("client builds")
}

fn url(server: &mockito::Server, path: &str) -> Url {
    Url::parse(&format!("{}{path}", server.url())).unwrap()
}

#[tokio::test]
async fn fetches_html_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/guide")
        .match_header("accept-language", "en-US,en;q=0.9")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(ARTICLE)
        .create_async()
        .await;

    let page = fetcher().fetch(&url(&server, "/guide")).await.unwrap();
    mock.assert_async().await;

    assert_eq!(page.status_code, 200);
    assert_eq!(page.url.path(), "/guide");
    assert!(page.html.contains("Composting basics"));
    assert!(page.block_detection.is_none());
}

#[tokio::test]
async fn sends_browser_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header("user-agent", mockito::Matcher::Regex("^Mozilla/5.0".into()))
        .with_status(200)
        .with_body(ARTICLE)
        .create_async()
        .await;

    fetcher().fetch(&url(&server, "/")).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn cloudflare_challenge_is_blocked() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/guide")
        .with_status(403)
        .with_header("server", "cloudflare")
        .with_body(CHALLENGE)
        .create_async()
        .await;

    let err = fetcher().fetch(&url(&server, "/guide")).await.unwrap_err();
    match err {
        FetchError::Blocked(block) => {
            assert!(block.is_blocked);
            assert_eq!(block.block_type, "cloudflare_challenge");
            assert!(block.evidence.iter().any(|e| e.contains("cloudflare")));
        }
        other => panic!("expected a block, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_blocked() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/guide")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let err = fetcher().fetch(&url(&server, "/guide")).await.unwrap_err();
    assert!(matches!(err, FetchError::Blocked(ref b) if b.block_type == "rate_limited"));
}

#[tokio::test]
async fn missing_page_is_a_status_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone")
        .with_status(404)
        .with_body("<html><body><h1>Not found</h1></body></html>")
        .create_async()
        .await;

    let err = fetcher().fetch(&url(&server, "/gone")).await.unwrap_err();
    match err {
        FetchError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/gone"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn javascript_wall_is_reported_but_not_blocking() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/app")
        .with_status(200)
        .with_body(r#"<html><body><noscript>Please enable JavaScript to use this app.</noscript><div id="root"></div></body></html>"#)
        .create_async()
        .await;

    let page = fetcher().fetch(&url(&server, "/app")).await.unwrap();
    let block = page.block_detection.expect("javascript wall detected");
    assert!(!block.is_blocked);
    assert_eq!(block.block_type, "javascript_required");
}

#[tokio::test]
async fn follows_redirects_to_the_final_url() {
    let mut server = mockito::Server::new_async().await;
    let target = format!("{}/new-home", server.url());
    let _old = server
        .mock("GET", "/old")
        .with_status(301)
        .with_header("location", &target)
        .create_async()
        .await;
    let _new = server
        .mock("GET", "/new-home")
        .with_status(200)
        .with_body(ARTICLE)
        .create_async()
        .await;

    let page = fetcher().fetch(&url(&server, "/old")).await.unwrap();
    assert_eq!(page.url.path(), "/new-home");
    assert_eq!(page.status_code, 200);
}

#[tokio::test]
async fn probe_reports_head_status() {
    let mut server = mockito::Server::new_async().await;
    let _about = server
        .mock("HEAD", "/about")
        .with_status(200)
        .create_async()
        .await;
    let _terms = server
        .mock("HEAD", "/terms")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = fetcher();
    assert_eq!(fetcher.probe(&url(&server, "/about")).await.unwrap(), 200);
    assert_eq!(fetcher.probe(&url(&server, "/terms")).await.unwrap(), 404);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let fetcher = fetcher();
    let err = fetcher
        .fetch(&Url::parse("http://127.0.0.1:9/").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout));
}

fn small_fetcher(max_body_bytes: usize) -> HttpFetcher {
    HttpFetcher::new(FetchConfig {
        max_body_bytes,
        ..FetchConfig::default()
    })
    .expect("client builds")
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/huge")
        .with_status(200)
        .with_body(ARTICLE.repeat(4))
        .create_async()
        .await;

    let err = small_fetcher(ARTICLE.len())
        .fetch(&url(&server, "/huge"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { limit } if limit == ARTICLE.len()));
}

#[tokio::test]
async fn chunked_body_is_cut_off_at_the_limit() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/stream")
        .with_status(200)
        .with_chunked_body(|w| {
            for _ in 0..8 {
                w.write_all(ARTICLE.as_bytes())?;
            }
            Ok(())
        })
        .create_async()
        .await;

    let err = small_fetcher(ARTICLE.len() * 2)
        .fetch(&url(&server, "/stream"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { .. }));

    let page = small_fetcher(ARTICLE.len() * 8)
        .fetch(&url(&server, "/stream"))
        .await
        .unwrap();
    assert_eq!(page.html.len(), ARTICLE.len() * 8);
}
