//! Page-level E-E-A-T: experience, expertise, authoritativeness and trust signals
//! visible on the page itself

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use super::AnalysisContext;
use super::patterns::{CREDENTIAL_PATTERNS, EXPERIENCE_PATTERNS};
use crate::dom::{Link, Page};
use crate::schema::{find_property, schema_nodes};
use crate::scoring::{Advice, Band, CategoryScore, Scorecard};
use crate::text;
use crate::types::{AnalyzerResult, Priority};
use crate::url_utils::is_authority_host;

const AUTHOR_SELECTORS: &str =
    r#"a[rel="author"], link[rel="author"], [itemprop="author"], [class*="author"], [class*="byline"]"#;

const MEDIA_SELECTORS: &str = "video, iframe, embed, object";

/// Average month length used for content age
const DAYS_PER_MONTH: f64 = 30.44;

const SOME_EXPERIENCE: Advice = Advice {
    priority: Priority::Medium,
    text: "Share more first-hand experience",
    why: "Only {value} first-hand experience signals were found",
    how_to_fix: "Describe what you tested, built or observed yourself, with concrete results",
};

const NO_EXPERIENCE: Advice = Advice {
    priority: Priority::High,
    text: "Demonstrate first-hand experience",
    why: "No first-hand experience signals were found; answer engines favour content from practitioners",
    how_to_fix: "Add personal observations, case studies or test results (\"we tested\", \"in my experience\")",
};

const FEW_IMAGES: Advice = Advice {
    priority: Priority::Low,
    text: "Add more original images",
    why: "Only {value} images found",
    how_to_fix: "Include screenshots, photos or diagrams that show the subject first-hand",
};

const NO_IMAGES: Advice = Advice {
    priority: Priority::Low,
    text: "Add supporting images",
    why: "The page has no images",
    how_to_fix: "Add original photos, screenshots or diagrams with descriptive alt text",
};

const NO_MEDIA: Advice = Advice {
    priority: Priority::Low,
    text: "Consider embedding a video",
    why: "No video or embedded media was found",
    how_to_fix: "Embed a walkthrough or demonstration video relevant to the topic",
};

const NO_AUTHOR: Advice = Advice {
    priority: Priority::High,
    text: "Identify the author",
    why: "No author information was found, so the expertise behind the content cannot be verified",
    how_to_fix: "Add a visible byline, <meta name=\"author\"> and an author property in Article schema",
};

const ONE_CREDENTIAL: Advice = Advice {
    priority: Priority::Medium,
    text: "Highlight more author credentials",
    why: "Only {value} credential signal was found",
    how_to_fix: "Add an author bio listing qualifications, certifications and years of experience",
};

const NO_CREDENTIALS: Advice = Advice {
    priority: Priority::Medium,
    text: "Show author credentials",
    why: "No credentials or qualifications were found",
    how_to_fix: "Add an author bio with relevant degrees, certifications or professional experience",
};

const MODERATE_DEPTH: Advice = Advice {
    priority: Priority::Low,
    text: "Deepen topical coverage",
    why: "The content has {value} words; expert pages usually exceed 1200",
    how_to_fix: "Cover edge cases, trade-offs and advanced details of the topic",
};

const SHALLOW_DEPTH: Advice = Advice {
    priority: Priority::Medium,
    text: "Demonstrate expertise through depth",
    why: "The content has only {value} words",
    how_to_fix: "Expand the explanation with specifics only an expert would know",
};

const FEW_AUTHORITY_LINKS: Advice = Advice {
    priority: Priority::Medium,
    text: "Cite more authoritative sources",
    why: "Only {value} links point to authoritative domains",
    how_to_fix: "Link to government, academic or well-known reference sources for key claims",
};

const NO_AUTHORITY_LINKS: Advice = Advice {
    priority: Priority::High,
    text: "Link to authoritative sources",
    why: "No links to authoritative domains (.gov, .edu, research publishers) were found",
    how_to_fix: "Support claims with links to official statistics, studies or reference works",
};

const FEW_EXTERNAL_LINKS: Advice = Advice {
    priority: Priority::Low,
    text: "Add more external references",
    why: "Only {value} external links found",
    how_to_fix: "Reference relevant external resources where they support the content",
};

const NO_EXTERNAL_LINKS: Advice = Advice {
    priority: Priority::Medium,
    text: "Add external references",
    why: "The page links to no other sites",
    how_to_fix: "Cite and link the sources behind your claims",
};

const NO_PUBLISHER: Advice = Advice {
    priority: Priority::Medium,
    text: "Declare the publisher",
    why: "No Organization schema or publisher property was found",
    how_to_fix: "Add a publisher (Organization with name and logo) to the page's structured data",
};

const FEW_INTERNAL_LINKS: Advice = Advice {
    priority: Priority::Low,
    text: "Add more internal links",
    why: "Only {value} internal links found",
    how_to_fix: "Link to related articles on your site to show topical depth",
};

const NO_INTERNAL_LINKS: Advice = Advice {
    priority: Priority::Medium,
    text: "Add internal links",
    why: "The page links to no other pages on the same site",
    how_to_fix: "Connect the page to related content and category pages",
};

const NO_HTTPS: Advice = Advice {
    priority: Priority::Critical,
    text: "Serve the page over HTTPS",
    why: "The page is served over {value}; insecure pages are treated as untrustworthy",
    how_to_fix: "Install a TLS certificate and redirect all HTTP traffic to HTTPS",
};

const AGING_CONTENT: Advice = Advice {
    priority: Priority::Low,
    text: "Refresh the content",
    why: "The content was last updated {value} months ago",
    how_to_fix: "Review facts and figures, then update dateModified",
};

const STALE_CONTENT: Advice = Advice {
    priority: Priority::Medium,
    text: "Update stale content",
    why: "The content was last updated {value} months ago",
    how_to_fix: "Revise outdated information and publish an updated date",
};

const NO_DATE: Advice = Advice {
    priority: Priority::High,
    text: "Show publication and update dates",
    why: "No published or modified date was found, so freshness cannot be judged",
    how_to_fix: "Add article:published_time/article:modified_time meta tags and datePublished/dateModified in schema",
};

const ONE_CONTACT_LINK: Advice = Advice {
    priority: Priority::Low,
    text: "Link both contact and about pages",
    why: "Only the {value} page is linked",
    how_to_fix: "Link the contact and about pages from the header or footer",
};

const NO_CONTACT_LINKS: Advice = Advice {
    priority: Priority::Medium,
    text: "Link contact and about pages",
    why: "Neither a contact nor an about page is linked",
    how_to_fix: "Add header or footer links to your about and contact pages",
};

const NO_POLICY_LINKS: Advice = Advice {
    priority: Priority::Low,
    text: "Link privacy policy and terms",
    why: "No privacy policy or terms link was found",
    how_to_fix: "Add privacy policy and terms of service links to the footer",
};

const EXPERIENCE_BANDS: &[Band] = &[
    Band::full(5.0, 15),
    Band::partial(2.0, 9, SOME_EXPERIENCE),
    Band::partial(1.0, 5, SOME_EXPERIENCE),
    Band::partial(0.0, 0, NO_EXPERIENCE),
];

const IMAGE_BANDS: &[Band] = &[
    Band::full(3.0, 5),
    Band::partial(1.0, 3, FEW_IMAGES),
    Band::partial(0.0, 0, NO_IMAGES),
];

const CREDENTIAL_BANDS: &[Band] = &[
    Band::full(2.0, 8),
    Band::partial(1.0, 4, ONE_CREDENTIAL),
    Band::partial(0.0, 0, NO_CREDENTIALS),
];

const DEPTH_BANDS: &[Band] = &[
    Band::full(1200.0, 7),
    Band::partial(600.0, 4, MODERATE_DEPTH),
    Band::partial(0.0, 0, SHALLOW_DEPTH),
];

const AUTHORITY_LINK_BANDS: &[Band] = &[
    Band::full(3.0, 10),
    Band::partial(1.0, 5, FEW_AUTHORITY_LINKS),
    Band::partial(0.0, 0, NO_AUTHORITY_LINKS),
];

const EXTERNAL_LINK_BANDS: &[Band] = &[
    Band::full(5.0, 5),
    Band::partial(1.0, 3, FEW_EXTERNAL_LINKS),
    Band::partial(0.0, 0, NO_EXTERNAL_LINKS),
];

const INTERNAL_LINK_BANDS: &[Band] = &[
    Band::full(5.0, 5),
    Band::partial(1.0, 2, FEW_INTERNAL_LINKS),
    Band::partial(0.0, 0, NO_INTERNAL_LINKS),
];

pub fn analyze(page: &Page, ctx: &AnalysisContext) -> AnalyzerResult {
    let mut card = Scorecard::new();
    let links = page.links();

    let experience = experience(page, &mut card);
    card.push(experience);
    let expertise = expertise(page, &mut card);
    card.push(expertise);
    let authority = authoritativeness(page, &links, &mut card);
    card.push(authority);
    let trust = trustworthiness(page, &links, ctx, &mut card);
    card.push(trust);

    card.finish()
}

fn experience(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("experience", 25);

    let signals = text::count_pattern_matches(page.main_text(), &EXPERIENCE_PATTERNS);
    card.apply_bands(&mut category, signals as f64, signals, EXPERIENCE_BANDS);
    category.detail("experienceSignals", signals);

    let images = page.count("img");
    card.apply_bands(&mut category, images as f64, images, IMAGE_BANDS);
    category.detail("images", images);

    let media = page.count(MEDIA_SELECTORS);
    card.check(&mut category, media > 0, 5, &NO_MEDIA, media);
    category.detail("mediaEmbeds", media);

    category
}

fn expertise(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("expertise", 25);

    let author = author_name(page);
    let has_author = author.is_some()
        || page.exists(AUTHOR_SELECTORS)
        || page.has_schema_type("Person");
    card.check(&mut category, has_author, 10, &NO_AUTHOR, "");
    category.detail("hasAuthor", has_author);
    category.detail("author", author);

    let credentials = text::count_pattern_matches(page.full_text(), &CREDENTIAL_PATTERNS);
    card.apply_bands(&mut category, credentials as f64, credentials, CREDENTIAL_BANDS);
    category.detail("credentialSignals", credentials);

    let words = page.word_count();
    card.apply_bands(&mut category, words as f64, words, DEPTH_BANDS);
    category.detail("wordCount", words);

    category
}

/// Author named in meta tags or JSON-LD
fn author_name(page: &Page) -> Option<String> {
    page.meta_content("author").or_else(|| {
        find_property(page.structured_data(), "author").and_then(|author| match author {
            JsonValue::String(name) => Some(name.clone()),
            JsonValue::Object(_) => author
                .get("name")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            JsonValue::Array(items) => items
                .iter()
                .find_map(|item| item.get("name").and_then(JsonValue::as_str))
                .map(str::to_string),
            _ => None,
        })
    })
}

fn authoritativeness(page: &Page, links: &[Link], card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("authoritativeness", 25);

    let external: Vec<&Link> = links.iter().filter(|link| !link.internal).collect();
    let authority = external
        .iter()
        .filter(|link| link.url.host_str().is_some_and(is_authority_host))
        .count();
    card.apply_bands(&mut category, authority as f64, authority, AUTHORITY_LINK_BANDS);
    category.detail("authorityLinks", authority);

    card.apply_bands(
        &mut category,
        external.len() as f64,
        external.len(),
        EXTERNAL_LINK_BANDS,
    );
    category.detail("externalLinks", external.len());

    let has_publisher = page.has_schema_type("Organization")
        || find_property(page.structured_data(), "publisher").is_some();
    card.check(&mut category, has_publisher, 5, &NO_PUBLISHER, "");
    category.detail("hasPublisher", has_publisher);

    let internal = links.len() - external.len();
    card.apply_bands(&mut category, internal as f64, internal, INTERNAL_LINK_BANDS);
    category.detail("internalLinks", internal);

    category
}

fn trustworthiness(
    page: &Page,
    links: &[Link],
    ctx: &AnalysisContext,
    card: &mut Scorecard,
) -> CategoryScore {
    let mut category = CategoryScore::new("trustworthiness", 25);

    let https = page.url().scheme() == "https";
    card.check(&mut category, https, 8, &NO_HTTPS, page.url().scheme());
    category.detail("https", https);

    match latest_content_date(page) {
        Some(date) => {
            let months = content_age_months(date, ctx.now);
            if months <= 6.0 {
                category.award(7);
            } else if months <= 12.0 {
                category.award(4);
                card.advise(&category, &AGING_CONTENT, months.round());
            } else {
                category.award(2);
                card.advise(&category, &STALE_CONTENT, months.round());
            }
            category.detail("contentDate", date.to_rfc3339());
            category.detail("contentAgeMonths", (months * 10.0).round() / 10.0);
        }
        None => {
            card.advise(&category, &NO_DATE, "");
            category.detail("contentDate", JsonValue::Null);
        }
    }

    let contact = links.iter().any(|link| link.mentions("contact"));
    let about = links.iter().any(|link| link.mentions("about"));
    match (contact, about) {
        (true, true) => category.award(5),
        (true, false) => {
            category.award(3);
            card.advise(&category, &ONE_CONTACT_LINK, "contact");
        }
        (false, true) => {
            category.award(3);
            card.advise(&category, &ONE_CONTACT_LINK, "about");
        }
        (false, false) => card.advise(&category, &NO_CONTACT_LINKS, ""),
    }
    category.detail("hasContactLink", contact);
    category.detail("hasAboutLink", about);

    let policy = links
        .iter()
        .any(|link| link.mentions("privacy") || link.mentions("terms"));
    card.check(&mut category, policy, 5, &NO_POLICY_LINKS, "");
    category.detail("hasPolicyLinks", policy);

    category
}

/// Most recent published or modified date declared anywhere on the page
fn latest_content_date(page: &Page) -> Option<DateTime<Utc>> {
    let meta = ["article:modified_time", "article:published_time"]
        .into_iter()
        .filter_map(|name| page.meta_content(name));
    let schema = schema_nodes(page.structured_data())
        .flat_map(|node| {
            ["dateModified", "datePublished"]
                .into_iter()
                .filter_map(move |prop| node.get(prop).and_then(JsonValue::as_str))
        })
        .map(str::to_string);
    let time = page.attr("time[datetime]", "datetime");

    meta.chain(schema)
        .chain(time)
        .filter_map(|raw| parse_date(&raw))
        .max()
}

/// RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`, or a leading `YYYY-MM-DD`
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    let day = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

fn content_age_months(date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - date).num_days() as f64 / DAYS_PER_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use url::Url;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn run_at(url: &str, html: &str) -> AnalyzerResult {
        let page = Page::parse(Url::parse(url).unwrap(), html);
        analyze(&page, &AnalysisContext::new(Vec::new(), now()))
    }

    fn run(html: &str) -> AnalyzerResult {
        run_at("https://example.com/post", html)
    }

    fn category_score(result: &AnalyzerResult, name: &str) -> u32 {
        result.category(name).map(|c| c.score).unwrap_or_default()
    }

    #[test]
    fn parses_common_date_formats() {
        assert!(parse_date("2024-03-01T10:00:00+02:00").is_some());
        assert!(parse_date("2024-03-01T10:00:00Z").is_some());
        assert!(parse_date("2024-03-01T10:00:00").is_some());
        assert!(parse_date("2024-03-01").is_some());
        assert!(parse_date("March 1st").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn freshness_uses_most_recent_date() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2020-01-01T00:00:00Z">
            <script type="application/ld+json">{"@type":"Article","dateModified":"2025-03-01"}</script>
        </head><body></body></html>"#;
        let result = run(html);
        let details = &result.category("trustworthiness").unwrap().details;
        assert_eq!(details["contentDate"], "2025-03-01T00:00:00+00:00");
        // https 8 + fresh 7
        assert_eq!(category_score(&result, "trustworthiness"), 15);
    }

    #[test]
    fn stale_and_missing_dates() {
        let stale = run(r#"<html><body><time datetime="2022-01-01">old</time></body></html>"#);
        assert_eq!(category_score(&stale, "trustworthiness"), 10);
        assert!(stale.recommendations.iter().any(|r| r.text == STALE_CONTENT.text));

        let undated = run("<html><body></body></html>");
        assert_eq!(category_score(&undated, "trustworthiness"), 8);
        assert!(undated.recommendations.iter().any(|r| r.text == NO_DATE.text));
    }

    #[test]
    fn http_page_gets_critical_trust_recommendation() {
        let result = run_at("http://example.com/post", "<html><body></body></html>");
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
        assert!(result.recommendations[0].why.contains("http"));
    }

    #[test]
    fn link_signals() {
        let html = r#"<html><body><article>
            <a href="https://www.cdc.gov/flu">CDC</a>
            <a href="https://en.wikipedia.org/wiki/Influenza">Wiki</a>
            <a href="https://harvard.edu/study">Study</a>
            <a href="https://blog.example.net/post">Blog</a>
            <a href="https://news.example.io/a">News</a>
            <a href="/about">About</a>
            <a href="/contact-us">Contact</a>
            <a href="/privacy">Privacy</a>
        </article></body></html>"#;
        let result = run(html);
        let authority = &result.category("authoritativeness").unwrap().details;
        assert_eq!(authority["authorityLinks"], 3);
        assert_eq!(authority["externalLinks"], 5);
        assert_eq!(authority["internalLinks"], 3);
        // 10 + 5 + 0 (no publisher) + 2
        assert_eq!(category_score(&result, "authoritativeness"), 17);
        // https 8 + contact/about 5 + policy 5
        assert_eq!(category_score(&result, "trustworthiness"), 18);
    }

    #[test]
    fn author_from_schema_and_credentials() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Article","author":{"@type":"Person","name":"Jane Roe"}}</script>
        </head><body><article>
            <p>Dr. Jane Roe is a certified nutritionist.</p>
        </article></body></html>"#;
        let result = run(html);
        let details = &result.category("expertise").unwrap().details;
        assert_eq!(details["author"], "Jane Roe");
        assert_eq!(details["credentialSignals"], 2);
        // author 10 + credentials 8
        assert_eq!(category_score(&result, "expertise"), 18);
    }

    #[test]
    fn experience_bands() {
        let html = r#"<html><body><article>
            <p>I've tested this. We measured it. In my experience it works.</p>
            <img src="a.png"><video src="v.mp4"></video>
        </article></body></html>"#;
        let result = run(html);
        // 9 (3 signals) + 3 (1 image) + 5 (video)
        assert_eq!(category_score(&result, "experience"), 17);
    }
}
