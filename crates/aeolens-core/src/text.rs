//! Text statistics: readability, syllables, keyword counting
//!
//! All functions are pure and total: empty input yields zero, never NaN.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("invalid sentence regex"));
static RE_SYLLABLE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("invalid syllable suffix regex")
});
static RE_LEADING_Y: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^y").expect("invalid leading y regex"));
static RE_VOWEL_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").expect("invalid vowel group regex"));

/// Words per minute used for reading time
pub const WORDS_PER_MINUTE: usize = 200;

/// Whitespace separated words
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Sentence fragments split on `.`, `!` and `?`, blank fragments dropped
pub fn sentences(text: &str) -> Vec<&str> {
    RE_SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Approximate syllable count of a single word (always at least 1)
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }

    let stripped = RE_SYLLABLE_SUFFIX.replace(&word, "");
    let stripped = RE_LEADING_Y.replace(&stripped, "");

    match RE_VOWEL_GROUP.find_iter(&stripped).count() {
        0 => 1,
        n => n,
    }
}

/// Flesch reading ease clamped to `[0, 100]`
pub fn flesch_reading_ease(text: &str) -> f64 {
    let sentence_count = sentences(text).len();
    let word_list: Vec<&str> = words(text).collect();

    if sentence_count == 0 || word_list.is_empty() {
        return 0.0;
    }

    let word_total = word_list.len() as f64;
    let syllables: usize = word_list.iter().map(|w| count_syllables(w)).sum();

    let score = 206.835
        - 1.015 * (word_total / sentence_count as f64)
        - 84.6 * (syllables as f64 / word_total);

    score.clamp(0.0, 100.0)
}

/// Whole minutes needed to read `text`, rounded up
pub fn reading_time_minutes(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// Case-insensitive whole-word regex for a keyword, `None` for blank input
pub fn keyword_regex(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).ok()
}

/// Total whole-word, case-insensitive occurrences of all keywords in `text`
pub fn count_keyword_occurrences<S: AsRef<str>>(text: &str, keywords: &[S]) -> usize {
    keywords
        .iter()
        .filter_map(|k| keyword_regex(k.as_ref()))
        .map(|re| re.find_iter(text).count())
        .sum()
}

pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    keyword_regex(keyword).is_some_and(|re| re.is_match(text))
}

/// Total matches of a list of patterns
pub fn count_pattern_matches(text: &str, patterns: &[Regex]) -> usize {
    patterns.iter().map(|re| re.find_iter(text).count()).sum()
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    words(text).collect::<Vec<_>>().join(" ")
}
