//! Common types shared by every analyzer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;

/// Letter grade derived from a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    /// The analyzer had no applicable input (Query Match without keywords)
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::NotApplicable => "N/A",
        };
        f.write_str(label)
    }
}

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Blocks citation outright
    Critical,

    /// Strongly recommended
    High,

    /// Recommended
    Medium,

    /// Nice to have
    Low,
}

impl Priority {
    /// Sort rank: critical = 1 ... low = 4
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(label)
    }
}

/// An actionable recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Short actionable headline
    pub text: String,

    /// AEO impact, usually quoting the measured fact
    pub why: String,

    /// Concrete remediation steps
    pub how_to_fix: String,

    pub priority: Priority,

    /// Scoring category whose lost points this explains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Recommendation {
    pub fn new(
        priority: Priority,
        text: impl Into<String>,
        why: impl Into<String>,
        how_to_fix: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            why: why.into(),
            how_to_fix: how_to_fix.into(),
            priority,
            category: None,
        }
    }

    pub fn for_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One scoring category inside an analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub score: u32,
    pub max: u32,

    /// Raw measured facts that justify the score
    pub details: Map<String, JsonValue>,
}

/// Score summary of a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub score: u32,
    pub max: u32,
}

/// Summary block kept alongside findings for downstream reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetails {
    pub max_score: u32,
    pub breakdown: BTreeMap<String, CategoryBreakdown>,
}

/// Output of every analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub score: u32,
    pub grade: Grade,
    pub findings: BTreeMap<String, Category>,
    pub recommendations: Vec<Recommendation>,
    pub details: ResultDetails,
}

impl AnalyzerResult {
    /// Category by name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.findings.get(name)
    }
}

/// Bot-blocking classification produced by the page fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDetection {
    pub is_blocked: bool,
    pub block_type: String,
    pub evidence: Vec<String>,
    pub aeo_impact: String,
    pub recommendation: String,
}
