//! Content Structure: readability, question/answer patterns and factual density

use super::AnalysisContext;
use super::patterns::{
    DIRECT_ANSWER_PATTERNS, FAQ_HEADING, SOURCE_PATTERNS, STATISTIC_PATTERNS, is_question,
};
use crate::dom::Page;
use crate::scoring::{Advice, Band, CategoryScore, Scorecard};
use crate::text;
use crate::types::{AnalyzerResult, Priority};

pub const THIN_CONTENT: Advice = Advice {
    priority: Priority::Critical,
    text: "Expand thin content",
    why: "The main content has only {value} words; answer engines rarely cite pages this thin",
    how_to_fix: "Cover the topic in depth (aim for 800+ words) with examples, data and direct answers",
};

const SHORT_CONTENT: Advice = Advice {
    priority: Priority::Medium,
    text: "Add more depth to the content",
    why: "The main content has {value} words; comprehensive pages usually run past 800",
    how_to_fix: "Add sections that answer related questions and give concrete examples",
};

const MODERATE_CONTENT: Advice = Advice {
    priority: Priority::Low,
    text: "Consider expanding the content",
    why: "The main content has {value} words; the most cited pages often exceed 1500",
    how_to_fix: "Extend the page with supporting detail, data or an FAQ section",
};

const HARD_TO_READ: Advice = Advice {
    priority: Priority::Medium,
    text: "Simplify the writing",
    why: "Flesch reading ease is {value}; plainer text is easier to extract and quote",
    how_to_fix: "Use shorter sentences and everyday words; aim for a score of 60 or more",
};

const VERY_HARD_TO_READ: Advice = Advice {
    priority: Priority::High,
    text: "Rewrite for readability",
    why: "Flesch reading ease is {value}, which reads as very difficult",
    how_to_fix: "Break long sentences apart, prefer common words and explain jargon",
};

const LONG_SENTENCES: Advice = Advice {
    priority: Priority::Low,
    text: "Shorten sentences slightly",
    why: "Sentences average {value} words; 20 or fewer reads best",
    how_to_fix: "Split compound sentences and move asides into their own sentence",
};

const VERY_LONG_SENTENCES: Advice = Advice {
    priority: Priority::Medium,
    text: "Shorten sentences",
    why: "Sentences average {value} words, too long for a clean quote",
    how_to_fix: "Keep sentences under 20 words, one idea each",
};

const NO_SENTENCES: Advice = Advice {
    priority: Priority::Medium,
    text: "Write the content in complete sentences",
    why: "No sentence boundaries were found in the main content",
    how_to_fix: "Present the core information as short, punctuated sentences rather than fragments",
};

const FEW_QUESTIONS: Advice = Advice {
    priority: Priority::Medium,
    text: "Add more question-based headings",
    why: "Only {value} headings are phrased as questions",
    how_to_fix: "Rephrase H2-H4 headings as the questions readers ask (What, How, Why)",
};

const NO_QUESTIONS: Advice = Advice {
    priority: Priority::High,
    text: "Use question-based headings",
    why: "No H2-H4 heading is phrased as a question, so the page does not map to user queries",
    how_to_fix: "Introduce sections with the literal questions the content answers",
};

const NO_FAQ: Advice = Advice {
    priority: Priority::Medium,
    text: "Add an FAQ section",
    why: "No FAQ section was found; FAQs are a primary source for AI answers",
    how_to_fix: "Add a Frequently Asked Questions section and mark it up with FAQPage schema",
};

const FEW_DIRECT_ANSWERS: Advice = Advice {
    priority: Priority::Low,
    text: "Add more direct answers",
    why: "Only {value} direct-answer phrases were found",
    how_to_fix: "Open sections with a one-sentence answer before the detail (\"X is ...\")",
};

const NO_DIRECT_ANSWERS: Advice = Advice {
    priority: Priority::Medium,
    text: "Answer questions directly",
    why: "Found {value} direct-answer phrases; engines prefer content that states the answer outright",
    how_to_fix: "Start each section with a concise definition or answer, then elaborate",
};

const SOME_STATISTICS: Advice = Advice {
    priority: Priority::Low,
    text: "Add more data points",
    why: "{value} statistics found; data-rich pages are cited more often",
    how_to_fix: "Support key claims with numbers, percentages and dates",
};

const FEW_STATISTICS: Advice = Advice {
    priority: Priority::Medium,
    text: "Include more statistics",
    why: "Only {value} statistics found",
    how_to_fix: "Add specific figures from credible sources to back up claims",
};

const NO_STATISTICS: Advice = Advice {
    priority: Priority::High,
    text: "Add statistics and data",
    why: "No statistics were found; unsupported claims are rarely quoted",
    how_to_fix: "Add percentages, amounts and dated figures with their sources",
};

const FEW_LISTS: Advice = Advice {
    priority: Priority::Low,
    text: "Use more lists",
    why: "Only {value} lists found",
    how_to_fix: "Turn enumerations and comparisons into bulleted or numbered lists",
};

const NO_LISTS: Advice = Advice {
    priority: Priority::Medium,
    text: "Add lists",
    why: "No lists were found; lists are easy for engines to extract",
    how_to_fix: "Present options, features and steps as <ul> or <ol> lists",
};

const NO_TABLES: Advice = Advice {
    priority: Priority::Low,
    text: "Consider adding a comparison table",
    why: "No tables were found; tabular data is extracted verbatim into answers",
    how_to_fix: "Summarize comparisons or specifications in an HTML <table>",
};

const FEW_SOURCES: Advice = Advice {
    priority: Priority::Low,
    text: "Cite more sources",
    why: "Only {value} source attributions found",
    how_to_fix: "Attribute claims with phrases like \"according to\" and link to the source",
};

const NO_SOURCES: Advice = Advice {
    priority: Priority::Medium,
    text: "Cite your sources",
    why: "No source attributions were found",
    how_to_fix: "Reference studies, reports or official data for the claims you make",
};

const WORD_BANDS: &[Band] = &[
    Band::full(1500.0, 15),
    Band::partial(800.0, 12, MODERATE_CONTENT),
    Band::partial(500.0, 8, SHORT_CONTENT),
    Band::partial(0.0, 0, THIN_CONTENT),
];

const FLESCH_BANDS: &[Band] = &[
    Band::full(60.0, 12),
    Band::partial(30.0, 6, HARD_TO_READ),
    Band::partial(0.0, 0, VERY_HARD_TO_READ),
];

const QUESTION_BANDS: &[Band] = &[
    Band::full(3.0, 15),
    Band::partial(1.0, 8, FEW_QUESTIONS),
    Band::partial(0.0, 0, NO_QUESTIONS),
];

const DIRECT_ANSWER_BANDS: &[Band] = &[
    Band::full(5.0, 10),
    Band::partial(2.0, 5, FEW_DIRECT_ANSWERS),
    Band::partial(0.0, 0, NO_DIRECT_ANSWERS),
];

const STATISTIC_BANDS: &[Band] = &[
    Band::full(10.0, 12),
    Band::partial(5.0, 8, SOME_STATISTICS),
    Band::partial(1.0, 4, FEW_STATISTICS),
    Band::partial(0.0, 0, NO_STATISTICS),
];

const LIST_BANDS: &[Band] = &[
    Band::full(3.0, 8),
    Band::partial(1.0, 4, FEW_LISTS),
    Band::partial(0.0, 0, NO_LISTS),
];

const SOURCE_BANDS: &[Band] = &[
    Band::full(3.0, 5),
    Band::partial(1.0, 2, FEW_SOURCES),
    Band::partial(0.0, 0, NO_SOURCES),
];

pub fn analyze(page: &Page, _ctx: &AnalysisContext) -> AnalyzerResult {
    let mut card = Scorecard::new();

    let readability = readability(page, &mut card);
    card.push(readability);
    let qa = qa_patterns(page, &mut card);
    card.push(qa);
    let density = factual_density(page, &mut card);
    card.push(density);

    card.finish()
}

fn readability(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("readability", 35);
    let content = page.main_text();

    let words = page.word_count();
    card.apply_bands(&mut category, words as f64, words, WORD_BANDS);
    category.detail("wordCount", words);
    category.detail("readingTimeMinutes", text::reading_time_minutes(content));

    let flesch = round1(text::flesch_reading_ease(content));
    card.apply_bands(&mut category, flesch, flesch, FLESCH_BANDS);
    category.detail("fleschReadingEase", flesch);

    let sentence_count = text::sentences(content).len();
    category.detail("sentenceCount", sentence_count);
    if sentence_count == 0 {
        card.advise(&category, &NO_SENTENCES, 0);
        category.detail("avgSentenceLength", serde_json::Value::Null);
    } else {
        let average = round1(words as f64 / sentence_count as f64);
        if average <= 20.0 {
            category.award(8);
        } else if average <= 25.0 {
            category.award(4);
            card.advise(&category, &LONG_SENTENCES, average);
        } else {
            card.advise(&category, &VERY_LONG_SENTENCES, average);
        }
        category.detail("avgSentenceLength", average);
    }

    category
}

fn qa_patterns(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("qaPatterns", 35);

    let question_headings: Vec<String> = page
        .texts("h2, h3, h4")
        .into_iter()
        .filter(|heading| is_question(heading))
        .collect();
    let questions = question_headings.len();
    card.apply_bands(&mut category, questions as f64, questions, QUESTION_BANDS);
    category.detail("questionHeadings", questions);
    category.detail(
        "questionHeadingExamples",
        question_headings.into_iter().take(5).collect::<Vec<_>>(),
    );

    let has_faq = page.has_schema_type("FAQPage")
        || page.exists(r#"[id*="faq"], [class*="faq"], [id*="FAQ"], [class*="FAQ"]"#)
        || page
            .texts("h1, h2, h3, h4")
            .iter()
            .any(|heading| FAQ_HEADING.is_match(heading));
    card.check(&mut category, has_faq, 10, &NO_FAQ, "");
    category.detail("hasFaqSection", has_faq);

    let direct_answers = text::count_pattern_matches(page.main_text(), &DIRECT_ANSWER_PATTERNS);
    card.apply_bands(
        &mut category,
        direct_answers as f64,
        direct_answers,
        DIRECT_ANSWER_BANDS,
    );
    category.detail("directAnswerPhrases", direct_answers);

    category
}

fn factual_density(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("factualDensity", 30);
    let content = page.main_text();

    let statistics = text::count_pattern_matches(content, &STATISTIC_PATTERNS);
    card.apply_bands(&mut category, statistics as f64, statistics, STATISTIC_BANDS);
    category.detail("statistics", statistics);

    let lists = page.count("ul, ol");
    card.apply_bands(&mut category, lists as f64, lists, LIST_BANDS);
    category.detail("lists", lists);

    let tables = page.count("table");
    card.check(&mut category, tables > 0, 5, &NO_TABLES, tables);
    category.detail("tables", tables);

    let sources = text::count_pattern_matches(content, &SOURCE_PATTERNS);
    card.apply_bands(&mut category, sources as f64, sources, SOURCE_BANDS);
    category.detail("sourceAttributions", sources);

    category
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn run(html: &str) -> AnalyzerResult {
        let page = Page::parse(Url::parse("https://example.com/post").unwrap(), html);
        analyze(&page, &AnalysisContext::new(Vec::new(), Utc::now()))
    }

    fn category_score(result: &AnalyzerResult, name: &str) -> u32 {
        result.category(name).map(|c| c.score).unwrap_or_default()
    }

    #[test]
    fn thin_page_gets_critical_recommendation() {
        let result = run("<html><body><p>Just a few words here.</p></body></html>");
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
        assert_eq!(result.recommendations[0].text, THIN_CONTENT.text);
        assert!(result.recommendations[0].why.contains('5'));
    }

    #[test]
    fn long_simple_content_scores_full_readability() {
        let body = "The cat sat on the mat. ".repeat(300);
        let result = run(&format!("<html><body><article><p>{body}</p></article></body></html>"));
        // 1800 words, very easy text, six-word sentences
        assert_eq!(category_score(&result, "readability"), 35);
        let details = &result.category("readability").unwrap().details;
        assert_eq!(details["wordCount"], 1800);
        assert_eq!(details["avgSentenceLength"], 6.0);
        assert_eq!(details["readingTimeMinutes"], 9);
    }

    #[test]
    fn text_without_sentences_is_not_a_division_by_zero() {
        let result = run("<html><body><p></p></body></html>");
        let details = &result.category("readability").unwrap().details;
        assert!(details["avgSentenceLength"].is_null());
        assert_eq!(category_score(&result, "readability"), 0);
    }

    #[test]
    fn question_headings_and_faq() {
        let html = r#"<html><body><article>
            <h2>What is AEO?</h2>
            <h3>How does it work?</h3>
            <h4>Why does it matter</h4>
            <h2>Frequently Asked Questions</h2>
            <p>AEO is a practice. In short, it helps. Simply put, it works.</p>
        </article></body></html>"#;
        let result = run(html);
        // 15 (3 questions) + 10 (FAQ heading) + 5 (3 direct answers)
        assert_eq!(category_score(&result, "qaPatterns"), 30);
        let details = &result.category("qaPatterns").unwrap().details;
        assert_eq!(details["questionHeadings"], 3);
        assert_eq!(details["hasFaqSection"], true);
    }

    #[test]
    fn faq_detected_by_class() {
        let html = r#"<html><body><div class="faq-block"><p>Q and A</p></div></body></html>"#;
        let details = &run(html).category("qaPatterns").unwrap().details.clone();
        assert_eq!(details["hasFaqSection"], true);
    }

    #[test]
    fn factual_density_bands() {
        let html = r#"<html><body><article>
            <p>According to a recent study, 45% of users in 2024 spent $300 on tools.</p>
            <ul><li>a</li></ul><ol><li>b</li></ol><ul><li>c</li></ul>
            <table><tr><td>1</td></tr></table>
        </article></body></html>"#;
        let result = run(html);
        let details = &result.category("factualDensity").unwrap().details;
        assert_eq!(details["statistics"], 3);
        assert_eq!(details["lists"], 3);
        assert_eq!(details["sourceAttributions"], 2);
        // 4 + 8 + 5 + 2
        assert_eq!(category_score(&result, "factualDensity"), 19);
    }
}
