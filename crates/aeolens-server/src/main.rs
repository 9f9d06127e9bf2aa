use std::sync::Arc;
use std::time::Duration;

use aeolens_core::{EngineConfig, ExecutionMode, FetchConfig, Orchestrator};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// HTTP API for AEO page-readiness scoring
#[derive(Parser, Debug)]
#[command(name = "aeolens-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080", env = "AEOLENS_BIND")]
    bind: String,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = 30, env = "AEOLENS_TIMEOUT_SECS")]
    timeout: u64,

    /// Timeout for each site-level probe in seconds
    #[arg(long, default_value_t = 10, env = "AEOLENS_PROBE_TIMEOUT_SECS")]
    probe_timeout: u64,

    /// Upper bound for the site-level analysis in seconds
    #[arg(long, default_value_t = 45, env = "AEOLENS_SITE_TIMEOUT_SECS")]
    site_timeout: u64,

    /// Skip the site-level analyzer
    #[arg(long, env = "AEOLENS_NO_SITE")]
    no_site: bool,

    /// Run page analyzers one after another
    #[arg(long, env = "AEOLENS_SEQUENTIAL")]
    sequential: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchConfig {
                timeout: Duration::from_secs(self.timeout),
                probe_timeout: Duration::from_secs(self.probe_timeout),
                ..FetchConfig::default()
            },
            execution: if self.sequential {
                ExecutionMode::Sequential
            } else {
                ExecutionMode::Parallel
            },
            site_level: !self.no_site,
            site_timeout: Duration::from_secs(self.site_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let orchestrator =
        Orchestrator::with_http(args.engine_config()).context("Failed to build HTTP client")?;
    let app = aeolens_server::router(Arc::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;
    tracing::info!(address = %args.bind, "aeolens-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(aeolens_server::shutdown_on(tokio::signal::ctrl_c()))
        .await
        .context("Server error")?;

    Ok(())
}
