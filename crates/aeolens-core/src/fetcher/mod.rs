//! Page retrieval
//!
//! The engine only depends on the [`PageFetcher`] trait; [`HttpFetcher`] is the
//! reqwest-backed implementation used by the binaries.

mod block_detection;

pub use block_detection::detect_block;

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;
use crate::types::BlockDetection;

/// A fetched HTML document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    pub status_code: u16,
    pub html: String,
    /// Non-blocking findings such as a JavaScript wall
    pub block_detection: Option<BlockDetection>,
}

/// Source of pages and path probes
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page; bot blocks surface as [`FetchError::Blocked`]
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;

    /// HEAD a URL and report its status code
    async fn probe(&self, url: &Url) -> Result<u16, FetchError>;
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, SERVER};
    use reqwest::{Client, Response, redirect};
    use url::Url;

    use super::{FetchedPage, PageFetcher, detect_block};
    use crate::config::FetchConfig;
    use crate::error::FetchError;

    const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

    /// reqwest-backed fetcher with browser-like headers
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        config: FetchConfig,
    }

    impl HttpFetcher {
        pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
            headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

            let client = Client::builder()
                .user_agent(config.user_agent.clone())
                .default_headers(headers)
                .redirect(redirect::Policy::limited(config.max_redirects))
                .timeout(config.timeout)
                .build()
                .map_err(|e| FetchError::Client(e.to_string()))?;

            Ok(Self { client, config })
        }

        pub fn config(&self) -> &FetchConfig {
            &self.config
        }
    }

    fn map_error(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }

    /// Collect the body, failing as soon as it passes `limit` bytes
    async fn read_body(mut response: Response, limit: usize) -> Result<String, FetchError> {
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_error)? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    #[async_trait]
    impl PageFetcher for HttpFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            let response = self
                .client
                .get(url.as_str())
                .send()
                .await
                .map_err(map_error)?;

            let status = response.status().as_u16();
            let final_url = response.url().clone();
            let server = response
                .headers()
                .get(SERVER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let html = read_body(response, self.config.max_body_bytes).await?;

            let detection = detect_block(status, server.as_deref(), &html);
            if let Some(block) = detection.as_ref().filter(|b| b.is_blocked) {
                tracing::warn!(url = %url, block_type = %block.block_type, "fetch blocked");
                return Err(FetchError::Blocked(block.clone()));
            }
            if !(200..300).contains(&status) {
                return Err(FetchError::Status {
                    status,
                    url: final_url.to_string(),
                });
            }

            tracing::debug!(url = %final_url, status, bytes = html.len(), "page fetched");
            Ok(FetchedPage {
                url: final_url,
                status_code: status,
                html,
                block_detection: detection,
            })
        }

        async fn probe(&self, url: &Url) -> Result<u16, FetchError> {
            let response = self
                .client
                .head(url.as_str())
                .timeout(self.config.probe_timeout)
                .send()
                .await
                .map_err(map_error)?;
            Ok(response.status().as_u16())
        }
    }
}
