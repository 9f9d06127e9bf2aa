//! # aeolens-core
//!
//! Deterministic scoring of a web page's readiness to be cited by AI answer
//! engines (Answer Engine Optimization).
//!
//! This library provides:
//! - Five independent page analyzers (technical foundation, content structure,
//!   page-level E-E-A-T, query match, AI visibility) and a site-level analyzer
//! - Text statistics and JSON-LD helpers shared by the analyzers
//! - Priority sorting and merging of recommendations
//! - A [`PageFetcher`] abstraction with a reqwest implementation and bot-block detection
//! - The [`Orchestrator`] that combines everything into a weighted overall score
//!
//! ## Features
//!
//! - `default`: includes `http`
//! - `http`: [`HttpFetcher`], a reqwest-backed [`PageFetcher`]
//!
//! ## Example
//!
//! ```no_run
//! use aeolens_core::{AnalysisOutcome, EngineConfig, Orchestrator};
//!
//! # async fn example() -> aeolens_core::Result<()> {
//! let orchestrator = Orchestrator::with_http(EngineConfig::default())?;
//! let keywords = vec!["composting".to_string()];
//!
//! match orchestrator.run_complete_analysis("example.com/composting", &keywords).await {
//!     AnalysisOutcome::Success(result) => println!("{} ({})", result.overall_score, result.overall_grade),
//!     AnalysisOutcome::Failure(err) => eprintln!("{}", err.error),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Page analyzers can also be run directly on HTML you already have:
//!
//! ```
//! use aeolens_core::analyzers::{AnalysisContext, ExecutionMode, run_page_analyzers};
//!
//! let url = url::Url::parse("https://example.com/").unwrap();
//! let ctx = AnalysisContext::new(Vec::new(), chrono::Utc::now());
//! let results = run_page_analyzers("<html><body><p>Hi</p></body></html>", &url, &ctx, ExecutionMode::Sequential);
//! assert!(results.technical_foundation.score <= 100);
//! ```

pub mod analyzers;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod recommendations;
pub mod schema;
pub mod scoring;
pub mod text;
pub mod types;
pub mod url_utils;

// Re-export commonly used types
pub use analyzers::{AnalysisContext, AnalyzerKind, ExecutionMode, PageAnalyzerResults};
pub use config::{EngineConfig, FetchConfig};
pub use error::{AeoError, ErrorKind, FetchError, Result};
pub use fetcher::{FetchedPage, PageFetcher, detect_block};
pub use orchestrator::{AnalysisOutcome, ErrorResult, Orchestrator, OverallResult, Weights};
pub use recommendations::TaggedRecommendation;
pub use types::{AnalyzerResult, BlockDetection, Category, Grade, Priority, Recommendation};

#[cfg(feature = "http")]
pub use fetcher::HttpFetcher;
