//! Engine configuration

use std::time::Duration;

use crate::analyzers::ExecutionMode;

/// Desktop browser identity; many sites serve bot-block pages to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP behaviour of [`HttpFetcher`](crate::fetcher::HttpFetcher)
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout for page fetches
    pub timeout: Duration,

    /// Timeout for each site-level HEAD probe
    pub probe_timeout: Duration,

    pub max_redirects: usize,

    /// Page bodies larger than this are rejected
    pub max_body_bytes: usize,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            max_redirects: 5,
            max_body_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Orchestration settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchConfig,

    /// Scheduling of the page analyzers
    pub execution: ExecutionMode,

    /// Whether to run the domain-wide analyzer at all
    pub site_level: bool,

    /// Upper bound for the whole site-level step
    pub site_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            execution: ExecutionMode::Parallel,
            site_level: true,
            site_timeout: Duration::from_secs(45),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.fetch.max_body_bytes, 5 * 1024 * 1024);
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.execution, ExecutionMode::Parallel);
        assert!(config.site_level);
    }
}
