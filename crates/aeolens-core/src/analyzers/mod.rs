//! Rule-based AEO analyzers
//!
//! Five page-level analyzers score one parsed page each; they share no state
//! and can run in any order or in parallel with identical results. The
//! site-level analyzer probes the whole domain and lives in [`site_eeat`].

pub mod ai_visibility;
pub mod content_structure;
pub mod page_eeat;
pub mod patterns;
pub mod query_match;
pub mod site_eeat;
pub mod technical_foundation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::Page;
use crate::types::AnalyzerResult;

/// Inputs shared by every page analyzer besides the page itself
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// Target keywords, trimmed and non-empty
    pub keywords: Vec<String>,

    /// Reference instant for content-age heuristics
    pub now: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn new(keywords: Vec<String>, now: DateTime<Utc>) -> Self {
        Self { keywords, now }
    }
}

/// Identifies an analyzer in results and recommendation tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalyzerKind {
    #[serde(rename = "technicalFoundation")]
    TechnicalFoundation,
    #[serde(rename = "contentStructure")]
    ContentStructure,
    #[serde(rename = "pageLevelEEAT")]
    PageLevelEeat,
    #[serde(rename = "queryMatch")]
    QueryMatch,
    #[serde(rename = "aiVisibility")]
    AiVisibility,
    #[serde(rename = "siteLevelEEAT")]
    SiteLevelEeat,
}

impl AnalyzerKind {
    /// The five page-level analyzers in merge order
    pub const PAGE_LEVEL: [AnalyzerKind; 5] = [
        AnalyzerKind::TechnicalFoundation,
        AnalyzerKind::ContentStructure,
        AnalyzerKind::PageLevelEeat,
        AnalyzerKind::QueryMatch,
        AnalyzerKind::AiVisibility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnalyzerKind::TechnicalFoundation => "technicalFoundation",
            AnalyzerKind::ContentStructure => "contentStructure",
            AnalyzerKind::PageLevelEeat => "pageLevelEEAT",
            AnalyzerKind::QueryMatch => "queryMatch",
            AnalyzerKind::AiVisibility => "aiVisibility",
            AnalyzerKind::SiteLevelEeat => "siteLevelEEAT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalyzerKind::TechnicalFoundation => "Technical Foundation",
            AnalyzerKind::ContentStructure => "Content Structure",
            AnalyzerKind::PageLevelEeat => "Page-Level E-E-A-T",
            AnalyzerKind::QueryMatch => "Query Match",
            AnalyzerKind::AiVisibility => "AI Visibility",
            AnalyzerKind::SiteLevelEeat => "Site-Level E-E-A-T",
        }
    }

    /// Run a page-level analyzer; `None` for the site-level kind
    pub fn run(self, page: &Page, ctx: &AnalysisContext) -> Option<AnalyzerResult> {
        let result = match self {
            AnalyzerKind::TechnicalFoundation => technical_foundation::analyze(page, ctx),
            AnalyzerKind::ContentStructure => content_structure::analyze(page, ctx),
            AnalyzerKind::PageLevelEeat => page_eeat::analyze(page, ctx),
            AnalyzerKind::QueryMatch => query_match::analyze(page, ctx),
            AnalyzerKind::AiVisibility => ai_visibility::analyze(page, ctx),
            AnalyzerKind::SiteLevelEeat => return None,
        };
        tracing::debug!(
            analyzer = self.name(),
            score = result.score,
            grade = %result.grade,
            "analyzer finished"
        );
        Some(result)
    }
}

/// How the five page analyzers are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One after another on the calling thread, sharing one parsed page
    Sequential,

    /// One scoped thread per analyzer, each with its own parse of the same HTML
    #[default]
    Parallel,
}

/// Results of the five page-level analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalyzerResults {
    pub technical_foundation: AnalyzerResult,
    pub content_structure: AnalyzerResult,
    #[serde(rename = "pageLevelEEAT")]
    pub page_level_eeat: AnalyzerResult,
    pub query_match: AnalyzerResult,
    pub ai_visibility: AnalyzerResult,
}

impl PageAnalyzerResults {
    pub fn get(&self, kind: AnalyzerKind) -> Option<&AnalyzerResult> {
        match kind {
            AnalyzerKind::TechnicalFoundation => Some(&self.technical_foundation),
            AnalyzerKind::ContentStructure => Some(&self.content_structure),
            AnalyzerKind::PageLevelEeat => Some(&self.page_level_eeat),
            AnalyzerKind::QueryMatch => Some(&self.query_match),
            AnalyzerKind::AiVisibility => Some(&self.ai_visibility),
            AnalyzerKind::SiteLevelEeat => None,
        }
    }

    /// Analyzer results in merge order
    pub fn iter(&self) -> impl Iterator<Item = (AnalyzerKind, &AnalyzerResult)> {
        AnalyzerKind::PAGE_LEVEL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|result| (kind, result)))
    }

    fn from_ordered(mut results: Vec<AnalyzerResult>) -> Self {
        // Order matches AnalyzerKind::PAGE_LEVEL
        let ai_visibility = results.pop().unwrap_or_else(empty_result);
        let query_match = results.pop().unwrap_or_else(empty_result);
        let page_level_eeat = results.pop().unwrap_or_else(empty_result);
        let content_structure = results.pop().unwrap_or_else(empty_result);
        let technical_foundation = results.pop().unwrap_or_else(empty_result);
        Self {
            technical_foundation,
            content_structure,
            page_level_eeat,
            query_match,
            ai_visibility,
        }
    }
}

fn empty_result() -> AnalyzerResult {
    crate::scoring::Scorecard::new().finish()
}

/// Run all page analyzers over an already parsed page
pub fn analyze_page(page: &Page, ctx: &AnalysisContext) -> PageAnalyzerResults {
    PageAnalyzerResults::from_ordered(
        AnalyzerKind::PAGE_LEVEL
            .iter()
            .filter_map(|kind| kind.run(page, ctx))
            .collect(),
    )
}

/// Parse `html` and run the five page analyzers in the requested mode.
///
/// `scraper`'s DOM is not `Sync`, so the parallel mode gives every thread its
/// own parse of the shared, immutable HTML string.
pub fn run_page_analyzers(
    html: &str,
    url: &Url,
    ctx: &AnalysisContext,
    mode: ExecutionMode,
) -> PageAnalyzerResults {
    match mode {
        ExecutionMode::Sequential => {
            let page = Page::parse(url.clone(), html);
            analyze_page(&page, ctx)
        }
        ExecutionMode::Parallel => {
            let results = std::thread::scope(|scope| {
                let handles: Vec<_> = AnalyzerKind::PAGE_LEVEL
                    .into_iter()
                    .map(|kind| {
                        scope.spawn(move || {
                            let page = Page::parse(url.clone(), html);
                            kind.run(&page, ctx)
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(result) => result,
                        // Re-raise so the orchestrator's task boundary reports it
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect::<Vec<_>>()
            });
            PageAnalyzerResults::from_ordered(results.into_iter().flatten().collect())
        }
    }
}
