//! Priority sorting of recommendations
//!
//! Sorting is stable: equal priorities keep their generation order, so the
//! merged list is reproducible for the same input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Priority, Recommendation};

/// Cap applied to each analyzer's own list
pub const MAX_ANALYZER_RECOMMENDATIONS: usize = 10;

/// Cap applied to the merged list returned by the orchestrator
pub const MAX_OVERALL_RECOMMENDATIONS: usize = 15;

/// Anything that carries a [`Priority`]
pub trait Prioritized {
    fn priority(&self) -> Priority;
}

impl Prioritized for Recommendation {
    fn priority(&self) -> Priority {
        self.priority
    }
}

/// A recommendation tagged with the analyzer that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub analyzer: String,
}

impl Prioritized for TaggedRecommendation {
    fn priority(&self) -> Priority {
        self.recommendation.priority
    }
}

/// Stable sort by priority rank (critical first)
pub fn sort_by_priority<T: Prioritized>(items: &mut [T]) {
    items.sort_by_key(|item| item.priority().rank());
}

/// Sort by priority, then keep at most `cap` items
pub fn sort_and_cap<T: Prioritized>(mut items: Vec<T>, cap: usize) -> Vec<T> {
    sort_by_priority(&mut items);
    items.truncate(cap);
    items
}

/// Like [`sort_and_cap`], but the first recommendation of every category
/// survives the cap; the remaining slots go to the others in priority order
pub fn sort_and_cap_per_category(
    mut items: Vec<Recommendation>,
    cap: usize,
) -> Vec<Recommendation> {
    sort_by_priority(&mut items);
    if items.len() <= cap {
        return items;
    }

    let mut seen = BTreeSet::new();
    let mut keep: Vec<bool> = items
        .iter()
        .map(|item| {
            item.category
                .as_deref()
                .is_some_and(|category| seen.insert(category))
        })
        .collect();

    let mut free = cap.saturating_sub(keep.iter().filter(|kept| **kept).count());
    for kept in keep.iter_mut().filter(|kept| !**kept) {
        if free == 0 {
            break;
        }
        *kept = true;
        free -= 1;
    }

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}

/// Tag each analyzer's recommendations with its name, in iteration order, then sort and cap
pub fn merge_recommendations<'a, I>(sources: I, cap: usize) -> Vec<TaggedRecommendation>
where
    I: IntoIterator<Item = (&'a str, &'a [Recommendation])>,
{
    let merged = sources
        .into_iter()
        .flat_map(|(analyzer, recommendations)| {
            recommendations.iter().map(move |rec| TaggedRecommendation {
                recommendation: rec.clone(),
                analyzer: analyzer.to_string(),
            })
        })
        .collect();
    sort_and_cap(merged, cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(priority: Priority, text: &str) -> Recommendation {
        Recommendation::new(priority, text, "why", "fix")
    }

    #[test]
    fn sorts_critical_first_and_keeps_order_within_priority() {
        let items = vec![
            rec(Priority::Low, "low-1"),
            rec(Priority::High, "high-1"),
            rec(Priority::Critical, "crit-1"),
            rec(Priority::High, "high-2"),
            rec(Priority::Medium, "med-1"),
            rec(Priority::Critical, "crit-2"),
        ];
        let sorted = sort_and_cap(items, 10);
        let texts: Vec<&str> = sorted.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["crit-1", "crit-2", "high-1", "high-2", "med-1", "low-1"]
        );
    }

    #[test]
    fn caps_after_sorting() {
        let mut items: Vec<Recommendation> = (0..12).map(|i| rec(Priority::Low, &format!("low-{i}"))).collect();
        items.push(rec(Priority::Critical, "crit"));
        let sorted = sort_and_cap(items, 10);
        assert_eq!(sorted.len(), 10);
        assert_eq!(sorted[0].text, "crit");
        assert_eq!(sorted[1].text, "low-0");
    }

    #[test]
    fn per_category_cap_keeps_each_category() {
        let mut items: Vec<Recommendation> = (0..11)
            .map(|i| rec(Priority::High, &format!("a-{i}")).for_category("a"))
            .collect();
        items.push(rec(Priority::Low, "b-0").for_category("b"));
        items.push(rec(Priority::Low, "b-1").for_category("b"));

        let capped = sort_and_cap_per_category(items, 10);
        let texts: Vec<&str> = capped.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(capped.len(), 10);
        assert_eq!(texts[..9], ["a-0", "a-1", "a-2", "a-3", "a-4", "a-5", "a-6", "a-7", "a-8"]);
        assert_eq!(texts[9], "b-0");
    }

    #[test]
    fn per_category_cap_is_plain_cap_when_short() {
        let items = vec![
            rec(Priority::Low, "low").for_category("a"),
            rec(Priority::Critical, "crit"),
        ];
        let capped = sort_and_cap_per_category(items, 10);
        assert_eq!(capped[0].text, "crit");
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn merge_tags_and_preserves_analyzer_order() {
        let a = vec![rec(Priority::Medium, "a-med"), rec(Priority::High, "a-high")];
        let b = vec![rec(Priority::High, "b-high"), rec(Priority::Medium, "b-med")];
        let merged = merge_recommendations(
            [("first", a.as_slice()), ("second", b.as_slice())],
            15,
        );
        let tagged: Vec<(&str, &str)> = merged
            .iter()
            .map(|t| (t.analyzer.as_str(), t.recommendation.text.as_str()))
            .collect();
        assert_eq!(
            tagged,
            vec![
                ("first", "a-high"),
                ("second", "b-high"),
                ("first", "a-med"),
                ("second", "b-med"),
            ]
        );
    }

    #[test]
    fn tagged_recommendation_serializes_flat() {
        let tagged = TaggedRecommendation {
            recommendation: rec(Priority::Low, "Add alt text"),
            analyzer: "technicalFoundation".to_string(),
        };
        let value = serde_json::to_value(&tagged).unwrap();
        assert_eq!(value["text"], "Add alt text");
        assert_eq!(value["analyzer"], "technicalFoundation");
        assert_eq!(value["howToFix"], "fix");
    }
}
