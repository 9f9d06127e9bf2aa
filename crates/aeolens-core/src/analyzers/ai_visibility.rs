//! AI Visibility: how easily an answer engine can extract and quote the page

use super::AnalysisContext;
use super::patterns::{
    AI_OPT_OUT_DIRECTIVE, DEFINITION_PATTERN, ORIGINAL_RESEARCH_PATTERNS, STEP_PATTERNS,
    SUMMARY_HEADING,
};
use crate::dom::Page;
use crate::scoring::{Advice, Band, CategoryScore, Scorecard, percentage};
use crate::text;
use crate::types::{AnalyzerResult, Priority};

/// Sentence length range (in words) that reads as a standalone quote
const QUOTABLE_WORDS: std::ops::RangeInclusive<usize> = 8..=25;

/// One H2/H3 expected per this many words
const WORDS_PER_HEADING: usize = 300;

const SUMMARY_SELECTORS: &str = r#"[class*="summary"], [class*="tldr"], [class*="takeaway"], [id*="summary"], [id*="tldr"], [id*="takeaway"]"#;

const FEW_QUOTABLE: Advice = Advice {
    priority: Priority::Medium,
    text: "Write more quotable sentences",
    why: "Only {value} sentences are short, factual statements an engine can quote",
    how_to_fix: "Add self-contained 8-25 word sentences that define a term or state a figure",
};

const NO_QUOTABLE: Advice = Advice {
    priority: Priority::High,
    text: "Add quotable statements",
    why: "Found {value} standalone factual sentences suitable for citation",
    how_to_fix: "State key facts and definitions in single, concise sentences (\"X is ...\", \"Y grew 40%\")",
};

const ONE_RESEARCH_SIGNAL: Advice = Advice {
    priority: Priority::Low,
    text: "Expand on your original research",
    why: "Only {value} original research signal was found",
    how_to_fix: "Publish more of your own data, surveys or benchmarks",
};

const NO_RESEARCH: Advice = Advice {
    priority: Priority::Medium,
    text: "Publish original research or data",
    why: "No original research was found; unique data is the strongest reason to cite a page",
    how_to_fix: "Share proprietary data, survey results or experiments with their methodology",
};

const NO_SUMMARY: Advice = Advice {
    priority: Priority::Medium,
    text: "Add a summary block",
    why: "No TL;DR or key takeaways section was found",
    how_to_fix: "Add a short \"Key takeaways\" list near the top of the content",
};

const FEW_LIST_ITEMS: Advice = Advice {
    priority: Priority::Low,
    text: "Expand list-based content",
    why: "Only {value} list items were found",
    how_to_fix: "Present features, options and comparisons as list items",
};

const NO_LIST_ITEMS: Advice = Advice {
    priority: Priority::Medium,
    text: "Use lists for key points",
    why: "Found {value} list items; lists are the easiest structure to extract",
    how_to_fix: "Break key points into bulleted lists",
};

const FEW_STEPS: Advice = Advice {
    priority: Priority::Low,
    text: "Format steps as a numbered list",
    why: "Steps are described in prose ({value} step markers) rather than a numbered list",
    how_to_fix: "Use an <ol> for sequential instructions and consider HowTo schema",
};

const NO_STEPS: Advice = Advice {
    priority: Priority::Medium,
    text: "Add step-by-step instructions",
    why: "No numbered steps were found; how-to answers are quoted as ordered lists",
    how_to_fix: "Add a numbered list of steps for the task the page explains",
};

const NO_TABULAR: Advice = Advice {
    priority: Priority::Low,
    text: "Add a table or definition list",
    why: "No tables or definition lists were found",
    how_to_fix: "Summarize comparisons in a <table> or term definitions in a <dl>",
};

const SPARSE_HEADINGS: Advice = Advice {
    priority: Priority::Low,
    text: "Add more subheadings",
    why: "{value} H2/H3 headings for this much content; aim for one every 300 words",
    how_to_fix: "Split long sections under descriptive H2/H3 headings",
};

const NO_HEADINGS: Advice = Advice {
    priority: Priority::Medium,
    text: "Break the content up with subheadings",
    why: "{value} H2/H3 headings found; answer engines navigate content by headings",
    how_to_fix: "Add an H2 or H3 about every 300 words",
};

const LITTLE_TEXT: Advice = Advice {
    priority: Priority::Medium,
    text: "Render more content in the HTML",
    why: "Only {value} words are present in the server-rendered HTML",
    how_to_fix: "Server-render the main content instead of loading it with JavaScript",
};

const NO_TEXT: Advice = Advice {
    priority: Priority::Critical,
    text: "Make content visible without JavaScript",
    why: "The server-rendered HTML contains only {value} words; AI crawlers do not run JavaScript",
    how_to_fix: "Use server-side rendering or static generation so the content is in the initial HTML",
};

const MODERATE_RATIO: Advice = Advice {
    priority: Priority::Low,
    text: "Reduce markup overhead",
    why: "Text is {value}% of the HTML",
    how_to_fix: "Trim inline scripts, styles and wrapper markup",
};

const LOW_RATIO: Advice = Advice {
    priority: Priority::Medium,
    text: "Improve the text-to-HTML ratio",
    why: "Text is only {value}% of the HTML, so content is buried in markup",
    how_to_fix: "Move scripts and styles to external files and simplify the markup",
};

const NO_LANDMARK: Advice = Advice {
    priority: Priority::Medium,
    text: "Wrap the content in <main> or <article>",
    why: "No main or article element marks where the content is",
    how_to_fix: "Put the primary content inside <main> and each post inside <article>",
};

const AI_OPT_OUT: Advice = Advice {
    priority: Priority::High,
    text: "Remove AI opt-out directives",
    why: "The robots meta tag is \"{value}\", which stops AI systems from quoting this page",
    how_to_fix: "Drop nosnippet, noai, noimageai and max-snippet:0 unless the opt-out is intended",
};

const QUOTABLE_BANDS: &[Band] = &[
    Band::full(5.0, 15),
    Band::partial(2.0, 8, FEW_QUOTABLE),
    Band::partial(0.0, 0, NO_QUOTABLE),
];

const RESEARCH_BANDS: &[Band] = &[
    Band::full(2.0, 10),
    Band::partial(1.0, 5, ONE_RESEARCH_SIGNAL),
    Band::partial(0.0, 0, NO_RESEARCH),
];

const LIST_ITEM_BANDS: &[Band] = &[
    Band::full(10.0, 10),
    Band::partial(3.0, 6, FEW_LIST_ITEMS),
    Band::partial(0.0, 0, NO_LIST_ITEMS),
];

const RENDERED_WORD_BANDS: &[Band] = &[
    Band::full(300.0, 10),
    Band::partial(100.0, 5, LITTLE_TEXT),
    Band::partial(0.0, 0, NO_TEXT),
];

const RATIO_BANDS: &[Band] = &[
    Band::full(15.0, 8),
    Band::partial(8.0, 4, MODERATE_RATIO),
    Band::partial(0.0, 0, LOW_RATIO),
];

pub fn analyze(page: &Page, _ctx: &AnalysisContext) -> AnalyzerResult {
    let mut card = Scorecard::new();

    let citation = citation_potential(page, &mut card);
    card.push(citation);
    let structured = structured_answers(page, &mut card);
    card.push(structured);
    let accessibility = ai_accessibility(page, &mut card);
    card.push(accessibility);

    card.finish()
}

/// Sentences of quotable length that state a figure or a definition
pub fn quotable_sentences(content: &str) -> Vec<&str> {
    text::sentences(content)
        .into_iter()
        .filter(|sentence| QUOTABLE_WORDS.contains(&text::word_count(sentence)))
        .filter(|sentence| {
            sentence.chars().any(|c| c.is_ascii_digit()) || DEFINITION_PATTERN.is_match(sentence)
        })
        .collect()
}

fn citation_potential(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("citationPotential", 35);

    let quotable = quotable_sentences(page.main_text()).len();
    card.apply_bands(&mut category, quotable as f64, quotable, QUOTABLE_BANDS);
    category.detail("quotableSentences", quotable);

    let research = text::count_pattern_matches(page.main_text(), &ORIGINAL_RESEARCH_PATTERNS);
    card.apply_bands(&mut category, research as f64, research, RESEARCH_BANDS);
    category.detail("originalResearchSignals", research);

    let has_summary = page
        .texts("h2, h3, h4, strong")
        .iter()
        .any(|heading| SUMMARY_HEADING.is_match(heading))
        || page.exists(SUMMARY_SELECTORS);
    card.check(&mut category, has_summary, 10, &NO_SUMMARY, "");
    category.detail("hasSummary", has_summary);

    category
}

fn structured_answers(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("structuredAnswers", 35);

    let list_items = page.count("li");
    card.apply_bands(&mut category, list_items as f64, list_items, LIST_ITEM_BANDS);
    category.detail("listItems", list_items);

    let ordered = page.exists("ol") || page.has_schema_type("HowTo");
    let step_phrases = text::count_pattern_matches(page.main_text(), &STEP_PATTERNS);
    if ordered {
        category.award(10);
    } else if step_phrases >= 3 {
        category.award(6);
        card.advise(&category, &FEW_STEPS, step_phrases);
    } else {
        card.advise(&category, &NO_STEPS, step_phrases);
    }
    category.detail("hasOrderedSteps", ordered);
    category.detail("stepPhrases", step_phrases);

    let tabular = page.exists("table, dl");
    card.check(&mut category, tabular, 5, &NO_TABULAR, "");
    category.detail("hasTableOrDefinitionList", tabular);

    let headings = page.count("h2, h3");
    let expected = (page.word_count() / WORDS_PER_HEADING).max(1);
    if headings >= expected {
        category.award(10);
    } else if headings > 0 && headings * 2 >= expected {
        category.award(5);
        card.advise(&category, &SPARSE_HEADINGS, headings);
    } else {
        card.advise(&category, &NO_HEADINGS, headings);
    }
    category.detail("subheadings", headings);
    category.detail("expectedSubheadings", expected);

    category
}

fn ai_accessibility(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("aiAccessibility", 30);

    let rendered_words = text::word_count(page.full_text());
    card.apply_bands(
        &mut category,
        rendered_words as f64,
        rendered_words,
        RENDERED_WORD_BANDS,
    );
    category.detail("renderedWords", rendered_words);

    let ratio = percentage(page.full_text().len(), page.html_len());
    card.apply_bands(&mut category, ratio as f64, ratio, RATIO_BANDS);
    category.detail("textToHtmlRatio", ratio);

    let landmark = page.exists("main, article");
    card.check(&mut category, landmark, 6, &NO_LANDMARK, "");
    category.detail("hasContentLandmark", landmark);

    let robots = page.meta_content("robots").unwrap_or_default();
    let opted_out = AI_OPT_OUT_DIRECTIVE.is_match(&robots);
    card.check(&mut category, !opted_out, 6, &AI_OPT_OUT, &robots);
    category.detail("aiOptOut", opted_out);

    category
}
