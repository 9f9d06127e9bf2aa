//! Technical Foundation: schema markup, crawlability and HTML structure

use super::AnalysisContext;
use crate::dom::Page;
use crate::scoring::{Advice, Band, CategoryScore, Scorecard, percentage};
use crate::types::{AnalyzerResult, Priority};

const SEMANTIC_ELEMENTS: &[&str] = &["article", "main", "section", "nav", "header", "footer", "aside"];

const ARTICLE_TYPES: &[&str] = &["Article", "BlogPosting", "NewsArticle"];

const NO_SCHEMA: Advice = Advice {
    priority: Priority::Critical,
    text: "Add JSON-LD structured data",
    why: "No JSON-LD blocks were found, so answer engines cannot identify what this page is about",
    how_to_fix: "Add a <script type=\"application/ld+json\"> block describing the page (Article, FAQPage, Organization)",
};

const NO_ARTICLE_SCHEMA: Advice = Advice {
    priority: Priority::Medium,
    text: "Add Article schema",
    why: "Article, BlogPosting or NewsArticle markup tells AI systems who wrote the content and when",
    how_to_fix: "Describe the page with an Article node including headline, author, datePublished and dateModified",
};

const NO_QA_SCHEMA: Advice = Advice {
    priority: Priority::High,
    text: "Add FAQPage or HowTo schema",
    why: "Question and step markup is the most directly quotable structured data for answer engines",
    how_to_fix: "Mark up question/answer pairs with FAQPage or step-by-step instructions with HowTo",
};

const NO_ENTITY_SCHEMA: Advice = Advice {
    priority: Priority::Medium,
    text: "Add Organization or Person schema",
    why: "Entity markup connects the content to an identifiable publisher or author",
    how_to_fix: "Add an Organization (or Person) node with name, url, logo and sameAs profile links",
};

const NO_BREADCRUMBS: Advice = Advice {
    priority: Priority::Low,
    text: "Add BreadcrumbList schema",
    why: "Breadcrumbs describe where the page sits in the site hierarchy",
    how_to_fix: "Add a BreadcrumbList node mirroring the visible breadcrumb trail",
};

const NOINDEX: Advice = Advice {
    priority: Priority::Critical,
    text: "Remove the noindex directive",
    why: "The robots meta tag is \"{value}\", which keeps this page out of every index",
    how_to_fix: "Drop noindex from <meta name=\"robots\"> unless the page should stay hidden",
};

const NO_CANONICAL: Advice = Advice {
    priority: Priority::Medium,
    text: "Add a canonical link",
    why: "Without rel=canonical, duplicate URLs split the signals for this content",
    how_to_fix: "Add <link rel=\"canonical\" href=\"...\"> pointing at the preferred URL",
};

const TITLE_LENGTH: Advice = Advice {
    priority: Priority::Low,
    text: "Adjust the title length",
    why: "The title is {value} characters; 30-60 characters display fully and summarize best",
    how_to_fix: "Rewrite the <title> to 30-60 characters leading with the main topic",
};

const NO_TITLE: Advice = Advice {
    priority: Priority::High,
    text: "Add a page title",
    why: "The page has no <title>, the first thing answer engines use to label a source",
    how_to_fix: "Add a descriptive <title> of 30-60 characters",
};

const DESCRIPTION_LENGTH: Advice = Advice {
    priority: Priority::Low,
    text: "Adjust the meta description length",
    why: "The meta description is {value} characters; 120-160 characters is the useful range",
    how_to_fix: "Rewrite the description as a 120-160 character summary of the answer the page gives",
};

const NO_DESCRIPTION: Advice = Advice {
    priority: Priority::High,
    text: "Add a meta description",
    why: "No meta description was found, so engines must guess a summary",
    how_to_fix: "Add <meta name=\"description\"> with a 120-160 character summary",
};

const NO_VIEWPORT: Advice = Advice {
    priority: Priority::Medium,
    text: "Add a viewport meta tag",
    why: "Pages without a viewport are treated as not mobile-friendly",
    how_to_fix: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
};

const MULTIPLE_H1: Advice = Advice {
    priority: Priority::Medium,
    text: "Use a single H1",
    why: "The page has {value} H1 headings, which blurs its main topic",
    how_to_fix: "Keep one H1 for the page topic and demote the rest to H2",
};

const NO_H1: Advice = Advice {
    priority: Priority::High,
    text: "Add an H1 heading",
    why: "No H1 was found, so the page has no explicit main topic",
    how_to_fix: "Add one <h1> that states the question or topic the page answers",
};

const FEW_H2: Advice = Advice {
    priority: Priority::Low,
    text: "Add more H2 sections",
    why: "Only {value} H2 heading found; sections help engines extract focused passages",
    how_to_fix: "Split the content into sections with descriptive H2 headings",
};

const NO_H2: Advice = Advice {
    priority: Priority::Medium,
    text: "Structure the content with H2 headings",
    why: "No H2 headings were found, so the content reads as one undivided block",
    how_to_fix: "Break the content into sections, each introduced by an H2",
};

const FEW_SEMANTIC: Advice = Advice {
    priority: Priority::Low,
    text: "Use more semantic HTML elements",
    why: "Only {value} semantic element types are used",
    how_to_fix: "Wrap page regions in article, main, section, header, footer, nav or aside",
};

const NO_SEMANTIC: Advice = Advice {
    priority: Priority::Medium,
    text: "Use semantic HTML elements",
    why: "No semantic landmarks were found, so parsers cannot separate content from chrome",
    how_to_fix: "Wrap the main content in <main>/<article> and page regions in header, nav and footer",
};

const PARTIAL_ALT: Advice = Advice {
    priority: Priority::Medium,
    text: "Add alt text to the remaining images",
    why: "{value}% of images have alt text",
    how_to_fix: "Describe every informative image with an alt attribute",
};

const POOR_ALT: Advice = Advice {
    priority: Priority::High,
    text: "Add alt text to images",
    why: "Only {value}% of images have alt text, so their content is invisible to AI systems",
    how_to_fix: "Add a concise alt attribute describing each informative image",
};

const H2_BANDS: &[Band] = &[
    Band::full(2.0, 8),
    Band::partial(1.0, 4, FEW_H2),
    Band::partial(0.0, 0, NO_H2),
];

const SEMANTIC_BANDS: &[Band] = &[
    Band::full(3.0, 6),
    Band::partial(1.0, 3, FEW_SEMANTIC),
    Band::partial(0.0, 0, NO_SEMANTIC),
];

const ALT_BANDS: &[Band] = &[
    Band::full(90.0, 6),
    Band::partial(50.0, 3, PARTIAL_ALT),
    Band::partial(0.0, 0, POOR_ALT),
];

pub fn analyze(page: &Page, _ctx: &AnalysisContext) -> AnalyzerResult {
    let mut card = Scorecard::new();

    let schema = schema_markup(page, &mut card);
    card.push(schema);
    let crawl = crawlability(page, &mut card);
    card.push(crawl);
    let structure = html_structure(page, &mut card);
    card.push(structure);

    card.finish()
}

fn schema_markup(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("schemaMarkup", 40);
    let data = page.structured_data();
    let types: Vec<String> = crate::schema::schema_types(data).into_iter().collect();

    category.detail("jsonLdBlocks", data.len());
    category.detail("schemaTypes", types);

    if data.is_empty() {
        card.advise(&category, &NO_SCHEMA, 0);
        return category;
    }

    category.award(10);
    let has_any = |names: &[&str]| names.iter().any(|name| page.has_schema_type(name));

    let article = card.check(&mut category, has_any(ARTICLE_TYPES), 10, &NO_ARTICLE_SCHEMA, "");
    let qa = card.check(&mut category, has_any(&["FAQPage", "HowTo"]), 10, &NO_QA_SCHEMA, "");
    let entity = card.check(
        &mut category,
        has_any(&["Organization", "Person"]),
        5,
        &NO_ENTITY_SCHEMA,
        "",
    );
    let breadcrumbs = card.check(
        &mut category,
        page.has_schema_type("BreadcrumbList"),
        5,
        &NO_BREADCRUMBS,
        "",
    );

    category.detail("hasArticleSchema", article);
    category.detail("hasFaqOrHowTo", qa);
    category.detail("hasEntitySchema", entity);
    category.detail("hasBreadcrumbs", breadcrumbs);
    category
}

fn crawlability(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("crawlability", 30);

    let robots = page.meta_content("robots");
    let noindex = robots
        .as_deref()
        .is_some_and(|content| content.to_ascii_lowercase().contains("noindex"));
    card.check(
        &mut category,
        !noindex,
        5,
        &NOINDEX,
        robots.as_deref().unwrap_or_default(),
    );
    category.detail("robotsMeta", robots);
    category.detail("noindex", noindex);

    let canonical = page.attr(r#"link[rel="canonical"]"#, "href");
    card.check(&mut category, canonical.is_some(), 5, &NO_CANONICAL, "");
    category.detail("canonical", canonical);

    let title_len = page.title().map(|t| t.chars().count());
    length_check(
        card,
        &mut category,
        title_len,
        (30, 60),
        8,
        &TITLE_LENGTH,
        &NO_TITLE,
    );
    category.detail("titleLength", title_len);

    let description_len = page.meta_description().map(|d| d.chars().count());
    length_check(
        card,
        &mut category,
        description_len,
        (120, 160),
        7,
        &DESCRIPTION_LENGTH,
        &NO_DESCRIPTION,
    );
    category.detail("metaDescriptionLength", description_len);

    let viewport = page.meta_content("viewport").is_some();
    card.check(&mut category, viewport, 5, &NO_VIEWPORT, "");
    category.detail("hasViewport", viewport);

    category
}

/// In-range length earns `points`, any other non-empty length 4, missing nothing
fn length_check(
    card: &mut Scorecard,
    category: &mut CategoryScore,
    length: Option<usize>,
    (low, high): (usize, usize),
    points: u32,
    off_range: &Advice,
    missing: &Advice,
) {
    match length {
        Some(len) if (low..=high).contains(&len) => category.award(points),
        Some(len) => {
            category.award(4);
            card.advise(category, off_range, len);
        }
        None => card.advise(category, missing, 0),
    }
}

fn html_structure(page: &Page, card: &mut Scorecard) -> CategoryScore {
    let mut category = CategoryScore::new("htmlStructure", 30);

    let h1_count = page.count("h1");
    match h1_count {
        1 => category.award(10),
        0 => card.advise(&category, &NO_H1, 0),
        n => {
            category.award(5);
            card.advise(&category, &MULTIPLE_H1, n);
        }
    }
    category.detail("h1Count", h1_count);

    let h2_count = page.count("h2");
    card.apply_bands(&mut category, h2_count as f64, h2_count, H2_BANDS);
    category.detail("h2Count", h2_count);

    let semantic: Vec<&str> = SEMANTIC_ELEMENTS
        .iter()
        .copied()
        .filter(|element| page.exists(element))
        .collect();
    card.apply_bands(
        &mut category,
        semantic.len() as f64,
        semantic.len(),
        SEMANTIC_BANDS,
    );
    category.detail("semanticElements", semantic);

    let images = page.count("img");
    let with_alt = page.count("img[alt]:not([alt=''])");
    if images == 0 {
        category.award(6);
    } else {
        let coverage = percentage(with_alt, images);
        card.apply_bands(&mut category, coverage as f64, coverage, ALT_BANDS);
        category.detail("altCoverage", coverage);
    }
    category.detail("imageCount", images);
    category.detail("imagesWithAlt", with_alt);

    category
}
