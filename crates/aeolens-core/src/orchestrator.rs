//! End-to-end analysis of one URL
//!
//! Validates input, fetches the page once, runs the five page analyzers on a
//! blocking worker while the site-level analyzer probes the domain, then
//! combines everything into a weighted [`OverallResult`]. Every failure ends up
//! as an [`ErrorResult`]; nothing escapes [`Orchestrator::run_complete_analysis`].

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use url::Url;
use uuid::Uuid;

use crate::analyzers::{
    AnalysisContext, AnalyzerKind, PageAnalyzerResults, run_page_analyzers, site_eeat,
};
use crate::config::EngineConfig;
use crate::error::{AeoError, ErrorKind, Result};
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::recommendations::{MAX_OVERALL_RECOMMENDATIONS, TaggedRecommendation, merge_recommendations};
use crate::scoring::grade_from_score;
use crate::types::{AnalyzerResult, BlockDetection, Grade};
use crate::url_utils::normalize_input_url;

/// Contribution of each page analyzer to the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub technical_foundation: f64,
    pub content_structure: f64,
    #[serde(rename = "pageLevelEEAT")]
    pub page_level_eeat: f64,
    pub query_match: f64,
    pub ai_visibility: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            technical_foundation: 0.25,
            content_structure: 0.25,
            page_level_eeat: 0.20,
            query_match: 0.15,
            ai_visibility: 0.15,
        }
    }
}

impl Weights {
    pub fn of(&self, kind: AnalyzerKind) -> f64 {
        match kind {
            AnalyzerKind::TechnicalFoundation => self.technical_foundation,
            AnalyzerKind::ContentStructure => self.content_structure,
            AnalyzerKind::PageLevelEeat => self.page_level_eeat,
            AnalyzerKind::QueryMatch => self.query_match,
            AnalyzerKind::AiVisibility => self.ai_visibility,
            AnalyzerKind::SiteLevelEeat => 0.0,
        }
    }
}

/// `round(Σ score·weight)` over the page analyzers in [`AnalyzerKind::PAGE_LEVEL`] order
pub fn weighted_score(scores: [u32; 5], weights: &Weights) -> u32 {
    let total: f64 = AnalyzerKind::PAGE_LEVEL
        .iter()
        .zip(scores)
        .map(|(kind, score)| score as f64 * weights.of(*kind))
        .sum();
    total.round() as u32
}

/// Per-analyzer results; the site-level slot is `null` when it was skipped or failed
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerResults {
    #[serde(flatten)]
    pub page: PageAnalyzerResults,

    #[serde(rename = "siteLevelEEAT")]
    pub site_level_eeat: Option<AnalyzerResult>,
}

/// Successful analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    pub success: bool,
    pub analysis_id: Uuid,
    pub url: String,
    pub target_keywords: Vec<String>,
    pub overall_score: u32,
    pub overall_grade: Grade,
    /// Milliseconds from fetch start
    pub processing_time: u64,
    pub analyzed_at: DateTime<Utc>,
    pub analyzers: AnalyzerResults,
    pub recommendations: Vec<TaggedRecommendation>,
    pub weights: Weights,
    pub block_detection: Option<BlockDetection>,
}

/// Failed analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_detection: Option<BlockDetection>,
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl From<&AeoError> for ErrorResult {
    fn from(err: &AeoError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            block_detection: err.block_detection().cloned(),
            kind: err.kind(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(Box<OverallResult>),
    Failure(ErrorResult),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

/// Runs complete analyses with a shared fetcher
pub struct Orchestrator<F> {
    fetcher: F,
    config: EngineConfig,
    weights: Weights,
}

#[cfg(feature = "http")]
impl Orchestrator<crate::fetcher::HttpFetcher> {
    /// Orchestrator backed by a reqwest client built from `config.fetch`
    pub fn with_http(config: EngineConfig) -> Result<Self> {
        let fetcher = crate::fetcher::HttpFetcher::new(config.fetch.clone())?;
        Ok(Self::new(fetcher, config))
    }
}

impl<F: PageFetcher> Orchestrator<F> {
    pub fn new(fetcher: F, config: EngineConfig) -> Self {
        Self {
            fetcher,
            config,
            weights: Weights::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze `url`, converting every error into an [`ErrorResult`]
    pub async fn run_complete_analysis(&self, url: &str, keywords: &[String]) -> AnalysisOutcome {
        match self.analyze(url, keywords).await {
            Ok(result) => AnalysisOutcome::Success(Box::new(result)),
            Err(err) => {
                tracing::warn!(url, error = %err, "analysis failed");
                AnalysisOutcome::Failure(ErrorResult::from(&err))
            }
        }
    }

    /// Analyze `url`, surfacing errors as [`AeoError`]
    pub async fn analyze(&self, url: &str, keywords: &[String]) -> Result<OverallResult> {
        let url = normalize_input_url(url)?;
        let keywords = validate_keywords(keywords)?;

        let started = Instant::now();
        let analyzed_at = Utc::now();
        tracing::info!(url = %url, keywords = keywords.len(), "starting analysis");

        let FetchedPage {
            url: final_url,
            html,
            block_detection,
            ..
        } = self.fetcher.fetch(&url).await?;

        let ctx = AnalysisContext::new(keywords.clone(), analyzed_at);
        let mode = self.config.execution;
        let page_url = final_url.clone();
        let page_task =
            tokio::task::spawn_blocking(move || run_page_analyzers(&html, &page_url, &ctx, mode));

        let (page, site) = tokio::join!(page_task, self.site_level(&final_url));
        let page = page.map_err(|e| AeoError::Analyzer(e.to_string()))?;

        let scores: [u32; 5] =
            AnalyzerKind::PAGE_LEVEL.map(|kind| page.get(kind).map_or(0, |r| r.score));
        let overall_score = weighted_score(scores, &self.weights);

        let sources = page
            .iter()
            .map(|(kind, result)| (kind.name(), result.recommendations.as_slice()))
            .chain(site.iter().map(|result| {
                (
                    AnalyzerKind::SiteLevelEeat.name(),
                    result.recommendations.as_slice(),
                )
            }));
        let recommendations = merge_recommendations(sources, MAX_OVERALL_RECOMMENDATIONS);

        let processing_time = started.elapsed().as_millis() as u64;
        tracing::info!(
            url = %url,
            score = overall_score,
            elapsed_ms = processing_time,
            site_level = site.is_some(),
            "analysis complete"
        );

        Ok(OverallResult {
            success: true,
            analysis_id: Uuid::new_v4(),
            url: url.to_string(),
            target_keywords: keywords,
            overall_score,
            overall_grade: grade_from_score(overall_score),
            processing_time,
            analyzed_at,
            analyzers: AnalyzerResults {
                page,
                site_level_eeat: site,
            },
            recommendations,
            weights: self.weights,
            block_detection,
        })
    }

    /// Site-level result, or `None` when disabled, timed out or panicked
    async fn site_level(&self, url: &Url) -> Option<AnalyzerResult> {
        if !self.config.site_level {
            return None;
        }

        let analysis = AssertUnwindSafe(site_eeat::analyze(
            &self.fetcher,
            url,
            self.config.fetch.probe_timeout,
        ))
        .catch_unwind();
        match tokio::time::timeout(self.config.site_timeout, analysis).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(_)) => {
                tracing::warn!(url = %url, "site-level analyzer panicked");
                None
            }
            Err(_) => {
                tracing::warn!(
                    url = %url,
                    timeout_secs = self.config.site_timeout.as_secs(),
                    "site-level analyzer timed out"
                );
                None
            }
        }
    }
}

/// Trim keywords; blank entries are rejected
pub fn validate_keywords(keywords: &[String]) -> Result<Vec<String>> {
    keywords
        .iter()
        .enumerate()
        .map(|(index, keyword)| {
            let trimmed = keyword.trim();
            if trimmed.is_empty() {
                Err(AeoError::InvalidKeyword(format!(
                    "keyword {} is blank",
                    index + 1
                )))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_matches_weights() {
        assert_eq!(weighted_score([80, 60, 90, 0, 100], &Weights::default()), 68);
        assert_eq!(weighted_score([100; 5], &Weights::default()), 100);
        assert_eq!(weighted_score([0; 5], &Weights::default()), 0);
    }

    #[test]
    fn weights_sum_to_one() {
        let weights = Weights::default();
        let sum: f64 = AnalyzerKind::PAGE_LEVEL.iter().map(|k| weights.of(*k)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn keywords_are_trimmed_and_blank_rejected() {
        let ok = validate_keywords(&[" compost ".to_string(), "soil".to_string()]).unwrap();
        assert_eq!(ok, vec!["compost", "soil"]);

        let err = validate_keywords(&["compost".to_string(), "   ".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("keyword 2"));
    }

    #[test]
    fn error_result_serializes_without_kind() {
        let result = ErrorResult::from(&AeoError::InvalidUrl("URL must not be empty".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Invalid URL"));
        assert!(json.get("kind").is_none());
        assert!(json.get("blockDetection").is_none());
    }
}
