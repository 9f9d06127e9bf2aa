//! Named regular-expression classifiers used by the analyzers

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid heuristic regex"))
        .collect()
}

/// Phrases that answer a question directly
pub static DIRECT_ANSWER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:is|are)\s+(?:a|an|the)\s+\w+",
        r"(?i)\bin short\b",
        r"(?i)\bsimply put\b",
        r"(?i)\bthe answer is\b",
        r"(?i)\bin summary\b",
        r"(?i)\bto summari[sz]e\b",
        r"(?i)\bthe (?:best|easiest|quickest|fastest) way to\b",
        r"(?i)\bhere(?:'s| is) (?:how|why|what)\b",
    ])
});

/// Numbers an answer engine can quote
pub static STATISTIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b\d+(?:\.\d+)?\s?%",
        r"\$\s?\d[\d,]*(?:\.\d+)?",
        r"(?i)\b\d+(?:\.\d+)?\s*(?:million|billion|trillion|thousand)\b",
        r"\b(?:19|20)\d{2}\b",
        r"(?i)\b\d+(?:\.\d+)?\s*(?:times|x)\s+(?:more|less|faster|slower|higher|lower)\b",
        r"(?i)\b\d+\s+(?:out of|in)\s+\d+\b",
    ])
});

/// Attribution of claims to a source
pub static SOURCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\baccording to\b",
        r"(?i)\b(?:a|the|recent|new)\s+(?:study|survey|report)\b",
        r"(?i)\bresearch (?:shows|suggests|found|indicates)\b",
        r"(?i)\bdata from\b",
        r"(?i)\bpublished (?:in|by)\b",
        r"(?i)\bsource:",
    ])
});

/// First-hand experience markers
pub static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bI(?:'ve| have) (?:used|tested|tried|worked|built|spent)\b",
        r"(?i)\bin my experience\b",
        r"(?i)\bwe (?:tested|tried|found|used|built|measured)\b",
        r"(?i)\bhands-on\b",
        r"(?i)\bcase study\b",
        r"(?i)\bfirst-?hand\b",
        r"(?i)\bpersonally\b",
        r"(?i)\bwhen I (?:was|started|first)\b",
        r"(?i)\bour (?:team|clients|customers) (?:found|saw|reported)\b",
        r"(?i)\blessons? (?:I|we) learned\b",
    ])
});

/// Author qualifications
pub static CREDENTIAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(?:PhD|MD|MBA|CPA|RN)\b",
        r"\bPh\.D\.",
        r"(?i)\bcertified\b",
        r"(?i)\blicensed\b",
        r"(?i)\baccredited\b",
        r"(?i)\bprofessor\b",
        r"\bDr\.\s",
        r"(?i)\b\d+\+?\s+years? of experience\b",
        r"(?i)\b(?:expert|specialist) in\b",
    ])
});

/// Claims of original data
pub static ORIGINAL_RESEARCH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bour (?:research|study|survey|data|analysis|findings|benchmark)\b",
        r"(?i)\bwe (?:surveyed|analyzed|analysed|interviewed|benchmarked)\b",
        r"(?i)\bproprietary (?:data|research)\b",
        r"(?i)\boriginal research\b",
    ])
});

/// Sequential instruction markers
pub static STEP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bstep\s+\d+\b",
        r"(?i)\b(?:first|second|third|next|then|finally),",
    ])
});

/// Definitional verbs that make a sentence quotable
pub static DEFINITION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:is|are|means|refers to)\b").expect("invalid definition regex")
});

/// Headings phrased as a question
pub static QUESTION_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:what|how|why|when|where|who|which|can|does|do|is|are|should|will)\b")
        .expect("invalid question regex")
});

/// Headings that introduce an FAQ block
pub static FAQ_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfaqs?\b|frequently asked").expect("invalid faq regex")
});

/// Headings that introduce a summary block
pub static SUMMARY_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btl;?dr\b|\bkey takeaways?\b|\bsummary\b|\bat a glance\b|\bquick answer\b")
        .expect("invalid summary regex")
});

/// robots directives that opt a page out of AI answers
pub static AI_OPT_OUT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bnosnippet\b|\bnoai\b|\bnoimageai\b|max-snippet\s*:\s*0\b")
        .expect("invalid robots directive regex")
});

/// Social profile hosts accepted as identity signals
pub const SOCIAL_HOSTS: &[&str] = &[
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
];

/// Whether heading text reads as a question
pub fn is_question(text: &str) -> bool {
    let text = text.trim();
    text.ends_with('?') || QUESTION_OPENER.is_match(text)
}

pub fn is_social_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    SOCIAL_HOSTS
        .iter()
        .any(|social| host == *social || host.ends_with(&format!(".{social}")))
}
