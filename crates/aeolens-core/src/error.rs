//! Error types for the scoring engine.
//!
//! Heuristics never fail; only URL validation, the page fetch and the
//! orchestration boundary produce errors.

use thiserror::Error;

use crate::types::BlockDetection;

/// Errors raised by a [`PageFetcher`](crate::fetcher::PageFetcher)
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// DNS, TLS or connection failure
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a bot-block page
    #[error("access blocked ({})", .0.block_type)]
    Blocked(BlockDetection),

    /// The response body passed [`FetchConfig::max_body_bytes`](crate::FetchConfig::max_body_bytes)
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// Non-success status that is not a bot block
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Errors surfaced by an orchestration run
#[derive(Debug, Error)]
pub enum AeoError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),

    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    /// An analyzer task panicked or could not be joined
    #[error("Analysis failed: {0}")]
    Analyzer(String),
}

/// Coarse error classification used by the outer surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Blocked,
    Fetch,
    Internal,
}

impl AeoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AeoError::InvalidUrl(_) | AeoError::InvalidKeyword(_) => ErrorKind::Validation,
            AeoError::Fetch(FetchError::Blocked(_)) => ErrorKind::Blocked,
            AeoError::Fetch(_) => ErrorKind::Fetch,
            AeoError::Analyzer(_) => ErrorKind::Internal,
        }
    }

    /// Block metadata when the fetch was refused by a bot filter
    pub fn block_detection(&self) -> Option<&BlockDetection> {
        match self {
            AeoError::Fetch(FetchError::Blocked(info)) => Some(info),
            _ => None,
        }
    }
}

/// Result type alias using AeoError.
pub type Result<T> = std::result::Result<T, AeoError>;
