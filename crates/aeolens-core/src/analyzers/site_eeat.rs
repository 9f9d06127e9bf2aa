//! Site-level E-E-A-T: domain-wide trust signals
//!
//! Probes a handful of well-known paths and reads the homepage. Probe errors
//! count as "not found"; only a failed homepage fetch degrades the whole result.
//! The homepage read gets the same time budget as a single probe.

use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use url::Url;

use super::patterns::is_social_host;
use crate::dom::Page;
use crate::fetcher::PageFetcher;
use crate::schema::find_property;
use crate::scoring::{Advice, CategoryScore, Scorecard};
use crate::types::{AnalyzerResult, Priority};
use crate::url_utils::origin_url;

/// A well-known page looked up on the origin
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    /// Also matched against homepage link paths and anchor text
    pub keyword: &'static str,
    pub path: &'static str,
}

pub const PROBES: [Probe; 5] = [
    Probe { keyword: "about", path: "/about" },
    Probe { keyword: "contact", path: "/contact" },
    Probe { keyword: "privacy", path: "/privacy-policy" },
    Probe { keyword: "terms", path: "/terms" },
    Probe { keyword: "sitemap", path: "/sitemap.xml" },
];

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub keyword: &'static str,
    pub status: Option<u16>,
}

impl ProbeResult {
    pub fn found(&self) -> bool {
        self.status.is_some_and(|s| (200..400).contains(&s))
    }
}

const SITE_UNREACHABLE: Advice = Advice {
    priority: Priority::Critical,
    text: "Make the homepage reachable",
    why: "The site homepage could not be fetched ({value}), so domain trust could not be assessed",
    how_to_fix: "Ensure the root URL responds with 200 to crawlers and is not blocked",
};

const NO_HTTPS: Advice = Advice {
    priority: Priority::Critical,
    text: "Enable HTTPS across the site",
    why: "The site is served over {value}",
    how_to_fix: "Install a TLS certificate and redirect every HTTP URL to HTTPS",
};

const NO_ABOUT: Advice = Advice {
    priority: Priority::High,
    text: "Publish an About page",
    why: "No about page was found at /about or linked from the homepage",
    how_to_fix: "Create an About page describing who runs the site and why it is qualified",
};

const NO_CONTACT: Advice = Advice {
    priority: Priority::High,
    text: "Publish a Contact page",
    why: "No contact page was found at /contact or linked from the homepage",
    how_to_fix: "Add a Contact page with an address, e-mail or form and link it site-wide",
};

const NO_SITEMAP: Advice = Advice {
    priority: Priority::Medium,
    text: "Add an XML sitemap",
    why: "No sitemap was found at /sitemap.xml",
    how_to_fix: "Generate /sitemap.xml and reference it from robots.txt",
};

const NO_PRIVACY: Advice = Advice {
    priority: Priority::High,
    text: "Publish a privacy policy",
    why: "No privacy policy was found",
    how_to_fix: "Add a privacy policy page and link it from the footer",
};

const NO_TERMS: Advice = Advice {
    priority: Priority::Medium,
    text: "Publish terms of service",
    why: "No terms page was found",
    how_to_fix: "Add a terms of service page and link it from the footer",
};

const NO_IDENTITY: Advice = Advice {
    priority: Priority::Medium,
    text: "Establish the organization's identity",
    why: "The homepage has no Organization schema and no social profile links",
    how_to_fix: "Add Organization (or LocalBusiness) schema with sameAs links to official social profiles",
};

const AUTHORITY_NOT_MEASURED: Advice = Advice {
    priority: Priority::Low,
    text: "Build domain authority",
    why: "Backlink and domain authority data is not integrated, so these 20 points are not awarded",
    how_to_fix: "Earn links from reputable sites in your field and get cited by industry publications",
};

/// Probe the origin of `page_url` and score domain-wide trust signals
///
/// `homepage_timeout` bounds the homepage GET; on expiry the result degrades.
pub async fn analyze<F>(
    fetcher: &F,
    page_url: &Url,
    homepage_timeout: Duration,
) -> AnalyzerResult
where
    F: PageFetcher + ?Sized,
{
    let Some(origin) = origin_url(page_url) else {
        return degraded("no origin");
    };

    let probes = join_all(PROBES.iter().map(|probe| {
        let origin = &origin;
        async move {
            let status = match origin.join(probe.path) {
                Ok(url) => match fetcher.probe(&url).await {
                    Ok(status) => Some(status),
                    Err(err) => {
                        tracing::debug!(path = probe.path, error = %err, "probe failed");
                        None
                    }
                },
                Err(_) => None,
            };
            ProbeResult {
                keyword: probe.keyword,
                status,
            }
        }
    }))
    .await;

    let homepage = match tokio::time::timeout(homepage_timeout, fetcher.fetch(&origin)).await {
        Ok(Ok(page)) => page,
        Ok(Err(err)) => {
            tracing::warn!(origin = %origin, error = %err, "site-level homepage fetch failed");
            return degraded(&err.to_string());
        }
        Err(_) => {
            tracing::warn!(
                origin = %origin,
                timeout_secs = homepage_timeout.as_secs(),
                "site-level homepage fetch timed out"
            );
            return degraded("homepage request timed out");
        }
    };

    score_site(&origin, &probes, &homepage.html)
}

/// Score from probe results and homepage HTML; pure and synchronous
pub fn score_site(origin: &Url, probes: &[ProbeResult], homepage_html: &str) -> AnalyzerResult {
    let homepage = Page::parse(origin.clone(), homepage_html);
    let links = homepage.links();
    let found = |keyword: &str| -> (bool, &'static str) {
        let probed = probes.iter().any(|p| p.keyword == keyword && p.found());
        if probed {
            (true, "probe")
        } else if links.iter().any(|link| link.internal && link.mentions(keyword)) {
            (true, "homepageLink")
        } else {
            (false, "missing")
        }
    };

    let mut card = Scorecard::new();

    let mut security = CategoryScore::new("domainSecurity", 20);
    let https = origin.scheme() == "https";
    card.check(&mut security, https, 20, &NO_HTTPS, origin.scheme());
    security.detail("https", https);
    security.detail("domainAgeChecked", false);
    card.push(security);

    let mut structure = CategoryScore::new("siteStructure", 30);
    for (keyword, advice) in [("about", &NO_ABOUT), ("contact", &NO_CONTACT), ("sitemap", &NO_SITEMAP)] {
        let (present, source) = found(keyword);
        card.check(&mut structure, present, 10, advice, "");
        structure.detail(keyword, json!({ "found": present, "source": source }));
    }
    card.push(structure);

    let mut trust = CategoryScore::new("trustSignals", 30);
    for (keyword, advice) in [("privacy", &NO_PRIVACY), ("terms", &NO_TERMS)] {
        let (present, source) = found(keyword);
        card.check(&mut trust, present, 10, advice, "");
        trust.detail(keyword, json!({ "found": present, "source": source }));
    }
    let organization = homepage.has_schema_type("Organization")
        || homepage.has_schema_type("LocalBusiness");
    let same_as = find_property(homepage.structured_data(), "sameAs").is_some();
    let social_links = links
        .iter()
        .filter(|link| link.url.host_str().is_some_and(is_social_host))
        .count();
    card.check(
        &mut trust,
        organization || same_as || social_links > 0,
        10,
        &NO_IDENTITY,
        "",
    );
    trust.detail("organizationSchema", organization);
    trust.detail("sameAs", same_as);
    trust.detail("socialProfileLinks", social_links);
    card.push(trust);

    let mut authority = CategoryScore::new("authorityMetrics", 20);
    authority.detail("integrated", false);
    card.advise(&authority, &AUTHORITY_NOT_MEASURED, "");
    card.push(authority);

    card.finish()
}

/// Zero score with a single critical recommendation
fn degraded(reason: &str) -> AnalyzerResult {
    let mut card = Scorecard::new();
    card.note(&SITE_UNREACHABLE, reason);
    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetcher::FetchedPage;
    use crate::types::Grade;
    use async_trait::async_trait;
    use std::collections::HashMap;

    const TIMEOUT: Duration = Duration::from_secs(10);

    struct StubSite {
        statuses: HashMap<&'static str, u16>,
        homepage: Option<&'static str>,
    }

    /// Answers probes at once but never finishes the homepage GET
    struct StalledHomepage;

    #[async_trait]
    impl PageFetcher for StalledHomepage {
        async fn fetch(&self, _url: &Url) -> Result<FetchedPage, FetchError> {
            std::future::pending().await
        }

        async fn probe(&self, _url: &Url) -> Result<u16, FetchError> {
            Ok(200)
        }
    }

    #[async_trait]
    impl PageFetcher for StubSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            match self.homepage {
                Some(html) => Ok(FetchedPage {
                    url: url.clone(),
                    status_code: 200,
                    html: html.to_string(),
                    block_detection: None,
                }),
                None => Err(FetchError::Timeout),
            }
        }

        async fn probe(&self, url: &Url) -> Result<u16, FetchError> {
            self.statuses
                .get(url.path())
                .copied()
                .ok_or_else(|| FetchError::Network("connection refused".into()))
        }
    }

    fn url() -> Url {
        Url::parse("https://example.com/blog/post?x=1").unwrap()
    }

    #[tokio::test]
    async fn complete_site_scores_eighty() {
        let site = StubSite {
            statuses: HashMap::from([
                ("/about", 200),
                ("/contact", 301),
                ("/privacy-policy", 200),
                ("/terms", 200),
                ("/sitemap.xml", 200),
            ]),
            homepage: Some(
                r#"<html><head><script type="application/ld+json">{"@type":"Organization","name":"Ex"}</script></head><body></body></html>"#,
            ),
        };
        let result = analyze(&site, &url(), TIMEOUT).await;
        // authority metrics stay reserved
        assert_eq!(result.score, 80);
        assert_eq!(result.grade, Grade::B);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].priority, Priority::Low);
        assert_eq!(result.details.breakdown["authorityMetrics"].score, 0);
        assert_eq!(result.details.breakdown["authorityMetrics"].max, 20);
    }

    #[tokio::test]
    async fn homepage_links_count_when_probes_fail() {
        let site = StubSite {
            statuses: HashMap::new(),
            homepage: Some(
                r#"<html><body>
                    <a href="/about-us">About</a>
                    <a href="/contact-us">Contact</a>
                    <a href="/legal/privacy">Privacy</a>
                    <a href="https://www.linkedin.com/company/ex">LinkedIn</a>
                </body></html>"#,
            ),
        };
        let result = analyze(&site, &url(), TIMEOUT).await;
        let structure = &result.category("siteStructure").unwrap().details;
        assert_eq!(structure["about"]["source"], "homepageLink");
        assert_eq!(structure["sitemap"]["found"], false);
        // https 20 + about/contact 20 + privacy 10 + social 10
        assert_eq!(result.score, 60);
    }

    #[tokio::test]
    async fn homepage_failure_degrades() {
        let site = StubSite {
            statuses: HashMap::new(),
            homepage: None,
        };
        let result = analyze(&site, &url(), TIMEOUT).await;
        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
        assert!(result.findings.is_empty());
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_homepage_degrades_after_timeout() {
        let started = tokio::time::Instant::now();
        let result = analyze(&StalledHomepage, &url(), TIMEOUT).await;

        assert!(started.elapsed() >= TIMEOUT);
        assert_eq!(result.score, 0);
        assert!(result.findings.is_empty());
        assert!(result.recommendations[0].why.contains("timed out"));
    }

    #[test]
    fn probe_status_classes() {
        let result = |status| ProbeResult {
            keyword: "about",
            status,
        };
        assert!(result(Some(200)).found());
        assert!(result(Some(308)).found());
        assert!(!result(Some(404)).found());
        assert!(!result(None).found());
    }

    #[test]
    fn plain_http_origin_is_critical() {
        let origin = Url::parse("http://example.com").unwrap();
        let result = score_site(&origin, &[], "<html></html>");
        assert_eq!(result.details.breakdown["domainSecurity"].score, 0);
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
    }
}
