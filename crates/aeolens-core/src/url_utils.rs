use url::Url;

use crate::error::AeoError;

/// Hosts treated as authoritative citation targets
const AUTHORITY_HOSTS: &[&str] = &[
    "wikipedia.org",
    "who.int",
    "nih.gov",
    "cdc.gov",
    "nature.com",
    "sciencedirect.com",
    "springer.com",
    "pubmed.ncbi.nlm.nih.gov",
    "scholar.google.com",
    "arxiv.org",
    "reuters.com",
    "apnews.com",
    "bbc.co.uk",
    "europa.eu",
    "un.org",
];

/// Top-level suffixes treated as authoritative
const AUTHORITY_SUFFIXES: &[&str] = &[".gov", ".edu", ".org", ".mil", ".int"];

/// Second-level labels for country-coded academic and government domains (`.gov.uk`, `.ac.jp`)
const AUTHORITY_SECOND_LEVEL: &[&str] = &["gov", "ac", "edu"];

/// Normalize a URL to its origin (scheme + host + optional port).
///
/// Falls back to trimming trailing slashes if the input cannot be parsed.
pub fn normalize_origin(input: &str) -> String {
    match Url::parse(input) {
        Ok(parsed) => parsed
            .origin()
            .ascii_serialization()
            .trim_end_matches('/')
            .to_string(),
        Err(_) => input.trim_end_matches('/').to_string(),
    }
}

/// Validate user input and turn it into an absolute http(s) URL.
///
/// Inputs without a scheme get `https://` prepended.
pub fn normalize_input_url(input: &str) -> Result<Url, AeoError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AeoError::InvalidUrl("URL must not be empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| AeoError::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AeoError::InvalidUrl(format!(
            "unsupported scheme '{}', only http and https can be analyzed",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AeoError::InvalidUrl(format!("{trimmed}: missing host")));
    }

    Ok(parsed)
}

/// Origin of `url` as a base for well-known path probes
pub fn origin_url(url: &Url) -> Option<Url> {
    Url::parse(&normalize_origin(url.as_str())).ok()
}

/// Whether a host belongs to an authoritative source
pub fn is_authority_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if AUTHORITY_HOSTS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{known}")))
    {
        return true;
    }
    if AUTHORITY_SUFFIXES.iter().any(|suffix| host.ends_with(suffix)) {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    labels.len() >= 3
        && labels[labels.len() - 1].len() == 2
        && AUTHORITY_SECOND_LEVEL.contains(&labels[labels.len() - 2])
}
