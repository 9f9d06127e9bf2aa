//! Parsed page snapshot and DOM helpers
//!
//! A [`Page`] is built once per analysis and only ever read by the analyzers.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JsonValue;
use url::Url;

use crate::schema;
use crate::text;

/// Elements whose text is never visible to a reader
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Main-content selectors in priority order
pub const MAIN_CONTENT_SELECTORS: &[&str] = &["article", "main", "body"];

/// Immutable, fully parsed snapshot of a fetched page
pub struct Page {
    url: Url,
    document: Html,
    html_len: usize,
    structured_data: Vec<JsonValue>,
    main_text: String,
    main_selector: Option<&'static str>,
    full_text: String,
}

impl Page {
    /// Parse raw HTML fetched from `url`
    pub fn parse(url: Url, html: &str) -> Self {
        let document = Html::parse_document(html);
        let structured_data = schema::extract_structured_data(&document);
        let (main_selector, main_text) = match find_main_content(&document) {
            Some((selector, text)) => (Some(selector), text),
            None => (None, String::new()),
        };
        let full_text = first_element(&document, "body")
            .map(visible_text)
            .unwrap_or_default();

        Self {
            url,
            document,
            html_len: html.len(),
            structured_data,
            main_text,
            main_selector,
            full_text,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Length of the raw HTML in bytes
    pub fn html_len(&self) -> usize {
        self.html_len
    }

    pub fn structured_data(&self) -> &[JsonValue] {
        &self.structured_data
    }

    pub fn has_schema_type(&self, type_name: &str) -> bool {
        schema::schema_has_type(&self.structured_data, type_name)
    }

    /// Visible text of the first non-empty `article`, `main` or `body`
    pub fn main_text(&self) -> &str {
        &self.main_text
    }

    /// Which selector supplied [`Page::main_text`]
    pub fn main_selector(&self) -> Option<&'static str> {
        self.main_selector
    }

    /// Visible text of the whole body
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn word_count(&self) -> usize {
        text::word_count(&self.main_text)
    }

    pub fn count(&self, selector: &str) -> usize {
        count_elements(&self.document, selector)
    }

    pub fn exists(&self, selector: &str) -> bool {
        select_exists(&self.document, selector)
    }

    /// Trimmed text of the first element matching `selector`
    pub fn first_text(&self, selector: &str) -> Option<String> {
        first_element(&self.document, selector)
            .map(visible_text)
            .filter(|t| !t.is_empty())
    }

    /// Visible text of every element matching `selector`
    pub fn texts(&self, selector: &str) -> Vec<String> {
        select_all(&self.document, selector)
            .into_iter()
            .map(visible_text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// `content` of `<meta name=..>` (or `property=..`), trimmed, non-empty
    pub fn meta_content(&self, name: &str) -> Option<String> {
        meta_content(&self.document, name)
    }

    /// Attribute value of the first element matching `selector`
    pub fn attr(&self, selector: &str, attr: &str) -> Option<String> {
        select_all(&self.document, selector)
            .into_iter()
            .find_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn title(&self) -> Option<String> {
        self.first_text("title")
    }

    pub fn meta_description(&self) -> Option<String> {
        self.meta_content("description")
    }

    /// First non-empty paragraph inside the main content
    pub fn first_paragraph(&self) -> Option<String> {
        let scope = self
            .main_selector
            .and_then(|selector| first_element(&self.document, selector));
        let paragraphs = match scope {
            Some(root) => descendants_matching(root, "p"),
            None => select_all(&self.document, "p"),
        };
        paragraphs
            .into_iter()
            .map(visible_text)
            .find(|t| !t.is_empty())
    }

    /// Every `<a href>` resolved against the page URL
    pub fn links(&self) -> Vec<Link> {
        select_all(&self.document, "a[href]")
            .into_iter()
            .filter_map(|el| {
                let href = el.value().attr("href")?.trim();
                if href.is_empty()
                    || href.starts_with('#')
                    || href.starts_with("javascript:")
                    || href.starts_with("mailto:")
                    || href.starts_with("tel:")
                {
                    return None;
                }
                let resolved = self.url.join(href).ok()?;
                if !matches!(resolved.scheme(), "http" | "https") {
                    return None;
                }
                let internal = resolved.host_str() == self.url.host_str();
                Some(Link {
                    url: resolved,
                    text: visible_text(el),
                    internal,
                })
            })
            .collect()
    }
}

/// A resolved hyperlink
#[derive(Debug, Clone)]
pub struct Link {
    pub url: Url,
    pub text: String,
    pub internal: bool,
}

impl Link {
    /// Whether path or anchor text mentions `needle` (case-insensitive)
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        self.url.path().to_ascii_lowercase().contains(&needle)
            || self.text.to_ascii_lowercase().contains(&needle)
    }
}

/// Visible text of an element: invisible subtrees skipped, whitespace collapsed
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    text::normalize_whitespace(&parts.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            parts.push(&**text);
        } else if let Some(child_element) = ElementRef::wrap(child)
            && !INVISIBLE_ELEMENTS.contains(&child_element.value().name())
        {
            collect_text(child_element, parts);
        }
    }
}

/// First non-empty main-content candidate
pub fn find_main_content(document: &Html) -> Option<(&'static str, String)> {
    MAIN_CONTENT_SELECTORS.iter().find_map(|&selector| {
        let text = first_element(document, selector).map(visible_text)?;
        (!text.is_empty()).then_some((selector, text))
    })
}

/// Visible text of the main content (empty when the document has none)
pub fn main_content_text(document: &Html) -> String {
    find_main_content(document)
        .map(|(_, text)| text)
        .unwrap_or_default()
}

pub fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = format!(r#"meta[name="{name}"], meta[property="{name}"]"#);
    select_all(document, &selector)
        .into_iter()
        .find_map(|el| el.value().attr("content"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn select_exists(document: &Html, selector_str: &str) -> bool {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).next().is_some()
    } else {
        false
    }
}

pub fn count_elements(document: &Html, selector_str: &str) -> usize {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).count()
    } else {
        0
    }
}

fn first_element<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector_str).ok()?;
    document.select(&selector).next()
}

fn select_all<'a>(document: &'a Html, selector_str: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector_str) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn descendants_matching<'a>(root: ElementRef<'a>, selector_str: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector_str) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}
