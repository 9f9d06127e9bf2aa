//! Query Match: how well the page targets the requested keywords
//!
//! Every keyword weighs the same, so adding an unrelated keyword dilutes the
//! presence score of the others.

use serde_json::json;
use std::collections::BTreeSet;

use super::AnalysisContext;
use super::patterns::is_question;
use crate::dom::Page;
use crate::scoring::{Advice, Band, CategoryScore, Scorecard, percentage};
use crate::text;
use crate::types::{AnalyzerResult, Grade, Priority};

/// Points a single keyword can earn across all locations
const PER_KEYWORD_MAX: u32 = 15;

/// How many leading words count as "answer first"
const LEADING_WORDS: usize = 100;

pub const NO_KEYWORDS: Advice = Advice {
    priority: Priority::Medium,
    text: "Provide target keywords",
    why: "No target keywords were given, so query alignment was not measured",
    how_to_fix: "Re-run the analysis with the queries this page should answer",
};

/// One place a keyword is expected to appear
struct Location {
    key: &'static str,
    points: u32,
    advice: Advice,
}

static LOCATIONS: [Location; 6] = [
    Location {
        key: "title",
        points: 5,
        advice: Advice {
            priority: Priority::High,
            text: "Put target keywords in the title",
            why: "Missing from the title: {value}",
            how_to_fix: "Work the primary keyword into the <title>, ideally near the start",
        },
    },
    Location {
        key: "h1",
        points: 5,
        advice: Advice {
            priority: Priority::High,
            text: "Put target keywords in the H1",
            why: "Missing from the H1: {value}",
            how_to_fix: "State the main keyword in the page's H1 heading",
        },
    },
    Location {
        key: "metaDescription",
        points: 3,
        advice: Advice {
            priority: Priority::Medium,
            text: "Mention target keywords in the meta description",
            why: "Missing from the meta description: {value}",
            how_to_fix: "Rewrite the meta description to include the keywords naturally",
        },
    },
    Location {
        key: "firstParagraph",
        points: 3,
        advice: Advice {
            priority: Priority::Medium,
            text: "Use target keywords in the opening paragraph",
            why: "Missing from the first paragraph: {value}",
            how_to_fix: "Answer the query in the first paragraph using its exact wording",
        },
    },
    Location {
        key: "headings",
        points: 2,
        advice: Advice {
            priority: Priority::Low,
            text: "Use target keywords in subheadings",
            why: "Missing from every heading: {value}",
            how_to_fix: "Include the keywords in at least one H2 or H3",
        },
    },
    Location {
        key: "frequency",
        points: 2,
        advice: Advice {
            priority: Priority::Low,
            text: "Mention target keywords more often",
            why: "Used fewer than 3 times in the content: {value}",
            how_to_fix: "Refer to the topic by name throughout the content, without stuffing",
        },
    },
];

const NOT_ANSWER_FIRST: Advice = Advice {
    priority: Priority::High,
    text: "Mention the query in the first 100 words",
    why: "None of the target keywords appears in the first {value} words",
    how_to_fix: "Open with a sentence that restates the query and answers it",
};

const FIRST_PARAGRAPH_LENGTH: Advice = Advice {
    priority: Priority::Medium,
    text: "Tighten the opening paragraph",
    why: "The first paragraph has {value} words; 20-80 words makes a quotable answer",
    how_to_fix: "Write a 20-80 word opening paragraph that directly answers the query",
};

const NO_FIRST_PARAGRAPH: Advice = Advice {
    priority: Priority::High,
    text: "Add an opening paragraph",
    why: "No paragraph was found in the main content",
    how_to_fix: "Start the content with a short paragraph that answers the query",
};

const NO_QUESTION_HEADING: Advice = Advice {
    priority: Priority::Medium,
    text: "Add a question heading with the keyword",
    why: "No question-style heading mentions a target keyword",
    how_to_fix: "Add an H2 such as \"What is <keyword>?\" followed by a direct answer",
};

const LOW_VARIATION_COVERAGE: Advice = Advice {
    priority: Priority::Medium,
    text: "Cover more keyword variations",
    why: "{value}% of related keyword variations appear on the page",
    how_to_fix: "Use plural forms and related phrasings (guides, tips, how-to) naturally",
};

const NO_VARIATION_COVERAGE: Advice = Advice {
    priority: Priority::High,
    text: "Add related keyword variations",
    why: "Only {value}% of related keyword variations appear on the page",
    how_to_fix: "Cover related phrasings of the query so the page matches more question forms",
};

const KEYWORD_STUFFING: Advice = Advice {
    priority: Priority::Medium,
    text: "Reduce keyword repetition",
    why: "Keyword density is {value}%, which reads as keyword stuffing",
    how_to_fix: "Replace some repetitions with synonyms and pronouns; keep density under 3%",
};

const LOW_DENSITY: Advice = Advice {
    priority: Priority::Low,
    text: "Use target keywords a little more",
    why: "Keyword density is {value}%",
    how_to_fix: "Aim for a natural density between 0.5% and 3%",
};

const ZERO_DENSITY: Advice = Advice {
    priority: Priority::High,
    text: "Use the target keywords in the content",
    why: "The target keywords never appear in the main content",
    how_to_fix: "Write about the query explicitly, using its wording",
};

const COVERAGE_BANDS: &[Band] = &[
    Band::full(50.0, 20),
    Band::partial(30.0, 12, LOW_VARIATION_COVERAGE),
    Band::partial(0.0, 0, NO_VARIATION_COVERAGE),
];

pub fn analyze(page: &Page, ctx: &AnalysisContext) -> AnalyzerResult {
    if ctx.keywords.is_empty() {
        return not_applicable();
    }

    let mut card = Scorecard::new();
    let keywords = &ctx.keywords;

    let presence = keyword_presence(page, keywords, &mut card);
    card.push(presence);
    let positioning = answer_positioning(page, keywords, &mut card);
    card.push(positioning);
    let relevance = semantic_relevance(page, keywords, &mut card);
    card.push(relevance);

    card.finish()
}

fn not_applicable() -> AnalyzerResult {
    let mut card = Scorecard::new();
    card.note(&NO_KEYWORDS, "");
    let mut result = card.finish();
    result.grade = Grade::NotApplicable;
    result
}

fn keyword_presence(page: &Page, keywords: &[String], card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("keywordPresence", 40);

    let title = page.title().unwrap_or_default();
    let h1 = page.texts("h1").join(" ");
    let description = page.meta_description().unwrap_or_default();
    let first_paragraph = page.first_paragraph().unwrap_or_default();
    let headings = page.texts("h1, h2, h3, h4, h5, h6").join(" ");

    let mut missed: Vec<Vec<&str>> = vec![Vec::new(); LOCATIONS.len()];
    let mut total = 0;
    let mut per_keyword = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        let occurrences = text::count_keyword_occurrences(page.main_text(), &[keyword]);
        let found = [
            text::contains_keyword(&title, keyword),
            text::contains_keyword(&h1, keyword),
            text::contains_keyword(&description, keyword),
            text::contains_keyword(&first_paragraph, keyword),
            text::contains_keyword(&headings, keyword),
            occurrences >= 3,
        ];

        let mut points = 0;
        for (index, (location, hit)) in LOCATIONS.iter().zip(found).enumerate() {
            if hit {
                points += location.points;
            } else {
                missed[index].push(keyword.as_str());
            }
        }
        let points = points.min(PER_KEYWORD_MAX);
        total += points;

        let mut entry = json!({
            "keyword": keyword,
            "points": points,
            "occurrences": occurrences,
        });
        for (location, hit) in LOCATIONS.iter().zip(found) {
            entry[location.key] = hit.into();
        }
        per_keyword.push(entry);
    }

    let possible = keywords.len() as f64 * PER_KEYWORD_MAX as f64;
    let score = (total as f64 / possible * 40.0).round() as u32;
    category.set_score(score);

    if category.score() < category.max() {
        for (location, missing) in LOCATIONS.iter().zip(&missed) {
            if !missing.is_empty() {
                card.advise(&category, &location.advice, missing.join(", "));
            }
        }
    }

    category.detail("keywords", per_keyword);
    category
}

fn answer_positioning(page: &Page, keywords: &[String], card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("answerPositioning", 30);

    let leading = text::words(page.main_text())
        .take(LEADING_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    let answer_first = keywords.iter().any(|k| text::contains_keyword(&leading, k));
    card.check(&mut category, answer_first, 12, &NOT_ANSWER_FIRST, LEADING_WORDS);
    category.detail("keywordInFirst100Words", answer_first);

    match page.first_paragraph() {
        Some(paragraph) => {
            let words = text::word_count(&paragraph);
            if (20..=80).contains(&words) {
                category.award(10);
            } else {
                category.award(5);
                card.advise(&category, &FIRST_PARAGRAPH_LENGTH, words);
            }
            category.detail("firstParagraphWords", words);
        }
        None => {
            card.advise(&category, &NO_FIRST_PARAGRAPH, "");
            category.detail("firstParagraphWords", 0);
        }
    }

    let question_heading = page
        .texts("h2, h3, h4")
        .iter()
        .filter(|heading| is_question(heading))
        .any(|heading| keywords.iter().any(|k| text::contains_keyword(heading, k)));
    card.check(&mut category, question_heading, 8, &NO_QUESTION_HEADING, "");
    category.detail("keywordQuestionHeading", question_heading);

    category
}

fn semantic_relevance(page: &Page, keywords: &[String], card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("semanticRelevance", 30);

    let corpus = [
        page.title().unwrap_or_default(),
        page.meta_description().unwrap_or_default(),
        page.full_text().to_string(),
    ]
    .join(" ");

    let variations = keyword_variations(keywords);
    let found: Vec<String> = variations
        .iter()
        .filter(|variation| text::contains_keyword(&corpus, variation))
        .cloned()
        .collect();
    let coverage = percentage(found.len(), variations.len());
    card.apply_bands(&mut category, coverage as f64, coverage, COVERAGE_BANDS);
    category.detail("variationsChecked", variations.len());
    category.detail("variationsFound", found);
    category.detail("variationCoverage", coverage);

    let words = page.word_count();
    let occurrences = text::count_keyword_occurrences(page.main_text(), keywords);
    let density = if words == 0 {
        0.0
    } else {
        ((occurrences as f64 / words as f64 * 100.0) * 100.0).round() / 100.0
    };
    if (0.5..=3.0).contains(&density) {
        category.award(10);
    } else if density > 3.0 {
        category.award(5);
        card.advise(&category, &KEYWORD_STUFFING, density);
    } else if density > 0.0 {
        category.award(5);
        card.advise(&category, &LOW_DENSITY, density);
    } else {
        card.advise(&category, &ZERO_DENSITY, density);
    }
    category.detail("keywordDensity", density);
    category.detail("keywordOccurrences", occurrences);

    category
}

/// Plural toggles for every keyword plus query templates for single words,
/// deduplicated with the original keywords removed
pub fn keyword_variations(keywords: &[String]) -> Vec<String> {
    let originals: BTreeSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut seen = BTreeSet::new();
    let mut variations = Vec::new();

    for keyword in &originals {
        let toggled = match keyword.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => format!("{keyword}s"),
        };
        let mut candidates = vec![toggled];
        if !keyword.contains(char::is_whitespace) {
            candidates.extend([
                format!("best {keyword}"),
                format!("{keyword} guide"),
                format!("how to {keyword}"),
                format!("{keyword} tips"),
            ]);
        }

        for candidate in candidates {
            if !candidate.trim().is_empty()
                && !originals.contains(&candidate)
                && seen.insert(candidate.clone())
            {
                variations.push(candidate);
            }
        }
    }

    variations
}
