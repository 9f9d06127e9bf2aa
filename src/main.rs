use std::process::ExitCode;
use std::time::Duration;

use aeolens_core::{AnalysisOutcome, EngineConfig, ExecutionMode, FetchConfig, Orchestrator};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod report;

/// Score how ready a web page is to be cited by AI answer engines
#[derive(Parser, Debug)]
#[command(name = "aeolens", version, about)]
struct Cli {
    /// Page to analyze; `https://` is assumed when no scheme is given
    url: String,

    /// Target keyword (repeatable)
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Print the full report as JSON
    #[arg(long, env = "AEOLENS_JSON")]
    json: bool,

    /// Run page analyzers one after another
    #[arg(long, env = "AEOLENS_SEQUENTIAL")]
    sequential: bool,

    /// Skip the site-level analyzer
    #[arg(long, env = "AEOLENS_NO_SITE")]
    no_site: bool,

    /// Page fetch timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, env = "AEOLENS_TIMEOUT_SECS")]
    timeout: u64,

    /// Timeout for each site-level probe in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10, env = "AEOLENS_PROBE_TIMEOUT_SECS")]
    probe_timeout: u64,

    /// Debug logging from the scoring engine
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
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
            ..EngineConfig::default()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info,aeolens_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.engine_config();
    tracing::debug!(?config, "engine configuration");
    let orchestrator =
        Orchestrator::with_http(config).context("failed to build HTTP client")?;
    let outcome = orchestrator.run_complete_analysis(&cli.url, &cli.keywords).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("failed to serialize report")?;
        println!("{json}");
    } else {
        match &outcome {
            AnalysisOutcome::Success(result) => print!("{}", report::render_report(result)),
            AnalysisOutcome::Failure(error) => eprint!("{}", report::render_failure(error)),
        }
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
