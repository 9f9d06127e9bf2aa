//! Bot-block classification of fetch responses

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::BlockDetection;

/// Below this many visible words a "enable JavaScript" notice is the whole page
const JS_WALL_MAX_WORDS: usize = 50;

const CLOUDFLARE_MARKERS: &[&str] = &[
    "cf-browser-verification",
    "cf_chl_",
    "Just a moment...",
    "Attention Required! | Cloudflare",
];

/// Visible challenge widgets; invisible scoring scripts (reCAPTCHA v3) do not match
const CAPTCHA_WIDGETS: &[&str] = &["g-recaptcha", "h-captcha", "cf-turnstile"];

static RE_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<[^>]+>")
        .expect("invalid tag regex")
});

static RE_ENABLE_JS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)enable\s+javascript|javascript\s+is\s+(?:required|disabled)")
        .expect("invalid javascript notice regex")
});

/// Classify a response as a bot block.
///
/// Returns `None` for ordinary pages. A JavaScript wall is reported with
/// `is_blocked == false`: the page was served, but AI crawlers see no content.
pub fn detect_block(status: u16, server: Option<&str>, body: &str) -> Option<BlockDetection> {
    let is_cloudflare_server = server.is_some_and(|s| s.to_ascii_lowercase().contains("cloudflare"));

    let cloudflare: Vec<String> = CLOUDFLARE_MARKERS
        .iter()
        .filter(|marker| body.contains(*marker))
        .map(|marker| format!("body contains \"{marker}\""))
        .collect();
    if !cloudflare.is_empty() && (is_cloudflare_server || status == 403 || status == 503 || cloudflare.len() > 1) {
        let mut evidence = cloudflare;
        if is_cloudflare_server {
            evidence.push("server: cloudflare".to_string());
        }
        evidence.push(format!("HTTP {status}"));
        return Some(blocked(
            "cloudflare_challenge",
            evidence,
            "AI crawlers receive a Cloudflare challenge page instead of your content",
            "Allow verified AI crawlers (GPTBot, ClaudeBot, PerplexityBot) in Cloudflare Bot Management",
        ));
    }

    let lower = body.to_ascii_lowercase();
    let words = visible_word_count(body);
    let mut captcha: Vec<String> = CAPTCHA_WIDGETS
        .iter()
        .filter(|marker| lower.contains(*marker))
        .map(|marker| format!("body contains \"{marker}\""))
        .collect();
    // The bare word only counts on an error response
    if captcha.is_empty() && status >= 400 && lower.contains("captcha") {
        captcha.push("body contains \"captcha\"".to_string());
    }
    if !captcha.is_empty() && (status >= 400 || words < JS_WALL_MAX_WORDS * 2) {
        captcha.push(format!("HTTP {status}"));
        return Some(blocked(
            "captcha",
            captcha,
            "A CAPTCHA stands between crawlers and the content, so nothing can be indexed or cited",
            "Exempt known AI crawler user agents from CAPTCHA challenges",
        ));
    }

    if status == 429 {
        return Some(blocked(
            "rate_limited",
            vec!["HTTP 429 Too Many Requests".to_string()],
            "Crawlers are rate limited and may never see the page",
            "Raise rate limits for verified crawlers or serve cached pages to them",
        ));
    }

    // Without a 401/403 the phrase only counts when it is the whole page
    let denied_notice = lower.contains("access denied") && words < JS_WALL_MAX_WORDS;
    if status == 401 || status == 403 || denied_notice {
        let mut evidence = vec![format!("HTTP {status}")];
        if denied_notice {
            evidence.push("body contains \"Access Denied\"".to_string());
        }
        return Some(blocked(
            "access_denied",
            evidence,
            "The server refuses automated requests, so AI systems cannot read the page",
            "Review firewall and WAF rules that block non-browser user agents",
        ));
    }

    if RE_ENABLE_JS.is_match(body) && words < JS_WALL_MAX_WORDS {
        return Some(BlockDetection {
            is_blocked: false,
            block_type: "javascript_required".to_string(),
            evidence: vec![
                "page asks to enable JavaScript".to_string(),
                format!("{words} visible words"),
            ],
            aeo_impact: "Content is rendered client-side; most AI crawlers do not run JavaScript"
                .to_string(),
            recommendation: "Server-render or pre-render the main content".to_string(),
        });
    }

    None
}

fn blocked(
    block_type: &str,
    evidence: Vec<String>,
    aeo_impact: &str,
    recommendation: &str,
) -> BlockDetection {
    BlockDetection {
        is_blocked: true,
        block_type: block_type.to_string(),
        evidence,
        aeo_impact: aeo_impact.to_string(),
        recommendation: recommendation.to_string(),
    }
}

/// Rough visible word count of raw HTML without building a DOM
fn visible_word_count(body: &str) -> usize {
    RE_TAGS.replace_all(body, " ").split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cloudflare_challenge() {
        let body = "<html><title>Just a moment...</title><script>window._cf_chl_opt={}</script></html>";
        let block = detect_block(403, Some("cloudflare"), body).expect("block");
        assert!(block.is_blocked);
        assert_eq!(block.block_type, "cloudflare_challenge");
        assert!(block.evidence.iter().any(|e| e.contains("cf_chl_")));
    }

    #[test]
    fn detects_captcha() {
        let body = r#"<html><body><div class="g-recaptcha" data-sitekey="x"></div></body></html>"#;
        let block = detect_block(200, None, body).expect("block");
        assert_eq!(block.block_type, "captcha");
    }

    #[test]
    fn detects_rate_limit_and_access_denied() {
        assert_eq!(
            detect_block(429, None, "").map(|b| b.block_type),
            Some("rate_limited".to_string())
        );
        assert_eq!(
            detect_block(403, Some("nginx"), "<h1>Forbidden</h1>").map(|b| b.block_type),
            Some("access_denied".to_string())
        );
        assert_eq!(
            detect_block(200, None, "<h1>Access Denied</h1><p>You do not have permission.</p>")
                .map(|b| b.block_type),
            Some("access_denied".to_string())
        );
    }

    #[test]
    fn article_about_access_denied_errors_is_not_blocked() {
        let body = format!(
            "<html><body><h1>How to fix Access Denied errors</h1><p>{}</p></body></html>",
            "word ".repeat(400)
        );
        assert!(detect_block(200, Some("nginx"), &body).is_none());
    }

    #[test]
    fn invisible_recaptcha_script_is_not_blocked() {
        let body = format!(
            r#"<html><head><script src="https://www.google.com/recaptcha/api.js?render=site-key"></script></head>
            <body><h1>Contact us</h1><form><p>{}</p></form></body></html>"#,
            "word ".repeat(80)
        );
        assert!(detect_block(200, None, &body).is_none());
    }

    #[test]
    fn captcha_wording_counts_on_error_responses() {
        let block = detect_block(405, None, "<p>Please complete the captcha to continue</p>")
            .expect("block");
        assert_eq!(block.block_type, "captcha");
        assert!(detect_block(200, None, "<p>Please complete the captcha to continue</p>").is_none());
    }

    #[test]
    fn turnstile_widget_is_a_captcha() {
        let body = r#"<html><body><div class="cf-turnstile" data-sitekey="x"></div></body></html>"#;
        assert_eq!(
            detect_block(200, None, body).map(|b| b.block_type),
            Some("captcha".to_string())
        );
    }

    #[test]
    fn javascript_wall_is_informational() {
        let body = r#"<html><body><noscript>Please enable JavaScript to continue.</noscript><div id="root"></div></body></html>"#;
        let block = detect_block(200, None, body).expect("detection");
        assert!(!block.is_blocked);
        assert_eq!(block.block_type, "javascript_required");
    }

    #[test]
    fn ordinary_pages_pass() {
        let body = format!("<html><body><p>{}</p></body></html>", "word ".repeat(400));
        assert!(detect_block(200, Some("nginx"), &body).is_none());
        assert!(detect_block(404, None, "<h1>Not found</h1>").is_none());
    }

    #[test]
    fn long_article_mentioning_captcha_is_not_blocked() {
        let body = format!(
            "<html><body><p>How a captcha works. {}</p></body></html>",
            "word ".repeat(300)
        );
        assert!(detect_block(200, None, &body).is_none());
    }
}
