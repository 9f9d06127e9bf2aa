//! Score bookkeeping shared by all analyzers
//!
//! Each analyzer fills a [`Scorecard`] with bounded [`CategoryScore`]s and
//! recommendations, then turns it into an [`AnalyzerResult`].

use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

use crate::recommendations::{MAX_ANALYZER_RECOMMENDATIONS, sort_and_cap_per_category};
use crate::types::{
    AnalyzerResult, Category, CategoryBreakdown, Grade, Priority, Recommendation, ResultDetails,
};

/// Maximum score of every analyzer
pub const MAX_SCORE: u32 = 100;

/// Map a 0-100 score to a letter grade (scores above 100 count as 100)
pub fn grade_from_score(score: u32) -> Grade {
    match score.min(MAX_SCORE) {
        90.. => Grade::A,
        80..=89 => Grade::B,
        70..=79 => Grade::C,
        60..=69 => Grade::D,
        _ => Grade::F,
    }
}

/// `round(value / total * 100)`, 0 when `total` is 0
pub fn percentage(value: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u32
}

/// Static text of a recommendation; `{value}` in `why` is replaced by the measurement
#[derive(Debug, Clone, Copy)]
pub struct Advice {
    pub priority: Priority,
    pub text: &'static str,
    pub why: &'static str,
    pub how_to_fix: &'static str,
}

impl Advice {
    pub fn to_recommendation(&self, value: &str) -> Recommendation {
        Recommendation::new(
            self.priority,
            self.text,
            self.why.replace("{value}", value),
            self.how_to_fix,
        )
    }
}

/// One score band: measurements `>= min` earn `points`
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub min: f64,
    pub points: u32,
    pub advice: Option<Advice>,
}

impl Band {
    pub const fn full(min: f64, points: u32) -> Self {
        Self {
            min,
            points,
            advice: None,
        }
    }

    pub const fn partial(min: f64, points: u32, advice: Advice) -> Self {
        Self {
            min,
            points,
            advice: Some(advice),
        }
    }
}

/// Evaluate an ordered band table top-down; the first band with `value >= min` wins.
///
/// Returns no points when no band matches, which a well-formed table (last band
/// at `min = 0.0` or below) never allows for non-negative measurements.
pub fn evaluate_bands(value: f64, bands: &[Band]) -> (u32, Option<&Advice>) {
    bands
        .iter()
        .find(|band| value >= band.min)
        .map(|band| (band.points, band.advice.as_ref()))
        .unwrap_or((0, None))
}

/// A scoring category being filled in
#[derive(Debug, Clone)]
pub struct CategoryScore {
    name: &'static str,
    max: u32,
    score: u32,
    details: Map<String, JsonValue>,
}

impl CategoryScore {
    pub fn new(name: &'static str, max: u32) -> Self {
        Self {
            name,
            max,
            score: 0,
            details: Map::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Add points, never exceeding the category budget
    pub fn award(&mut self, points: u32) {
        self.score = (self.score + points).min(self.max);
    }

    /// Replace the score outright (still bounded)
    pub fn set_score(&mut self, score: u32) {
        self.score = score.min(self.max);
    }

    /// Record a measured fact
    pub fn detail(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.details.insert(key.to_string(), value.into());
    }

    fn into_category(self) -> Category {
        Category {
            score: self.score,
            max: self.max,
            details: self.details,
        }
    }
}

/// Accumulates categories and recommendations for one analyzer run
#[derive(Debug, Default)]
pub struct Scorecard {
    categories: Vec<CategoryScore>,
    recommendations: Vec<Recommendation>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommend(&mut self, recommendation: Recommendation) {
        self.recommendations.push(recommendation);
    }

    /// Explain points lost in `category`
    pub fn advise(&mut self, category: &CategoryScore, advice: &Advice, value: impl ToString) {
        self.recommend(
            advice
                .to_recommendation(&value.to_string())
                .for_category(category.name()),
        );
    }

    /// Analyzer-wide advice not tied to any category
    pub fn note(&mut self, advice: &Advice, value: impl ToString) {
        self.recommend(advice.to_recommendation(&value.to_string()));
    }

    /// Score `value` against `bands`, awarding points and emitting the band's advice
    pub fn apply_bands(
        &mut self,
        category: &mut CategoryScore,
        value: f64,
        shown: impl ToString,
        bands: &[Band],
    ) -> u32 {
        let (points, advice) = evaluate_bands(value, bands);
        category.award(points);
        if let Some(advice) = advice {
            self.advise(category, advice, shown);
        }
        points
    }

    /// Award `points` when `passed`, otherwise emit `advice`
    pub fn check(
        &mut self,
        category: &mut CategoryScore,
        passed: bool,
        points: u32,
        advice: &Advice,
        shown: impl ToString,
    ) -> bool {
        if passed {
            category.award(points);
        } else {
            self.advise(category, advice, shown);
        }
        passed
    }

    pub fn push(&mut self, category: CategoryScore) {
        self.categories.push(category);
    }

    /// Sum categories, grade, sort and cap recommendations (keeping one per category)
    pub fn finish(self) -> AnalyzerResult {
        let score = self
            .categories
            .iter()
            .map(CategoryScore::score)
            .sum::<u32>()
            .min(MAX_SCORE);

        let mut breakdown = BTreeMap::new();
        let mut findings = BTreeMap::new();
        for category in self.categories {
            breakdown.insert(
                category.name.to_string(),
                CategoryBreakdown {
                    score: category.score,
                    max: category.max,
                },
            );
            findings.insert(category.name.to_string(), category.into_category());
        }

        AnalyzerResult {
            score,
            grade: grade_from_score(score),
            findings,
            recommendations: sort_and_cap_per_category(
                self.recommendations,
                MAX_ANALYZER_RECOMMENDATIONS,
            ),
            details: ResultDetails {
                max_score: MAX_SCORE,
                breakdown,
            },
        }
    }
}
