//! Sitemap Inspector main entry point
//!
//! This is the command-line interface for inspecting XML sitemaps.

use anyhow::Context;
use clap::Parser;
use sitemap_inspector::config::{load_config, validate, Config};
use sitemap_inspector::output::{write_markdown_report, Report, ReportRenderer, TextRenderer};
use sitemap_inspector::url::Target;
use sitemap_inspector::Inspector;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Sitemap Inspector: fetch and summarize XML sitemaps
///
/// Loads a sitemap or sitemap index from a URL or a local `.xml`/`.xml.gz`
/// file, follows index children concurrently, and reports URL counts,
/// modification-date statistics, extension tags and robots.txt findings.
#[derive(Parser, Debug)]
#[command(name = "sitemap-inspector")]
#[command(version)]
#[command(about = "Fetch and summarize XML sitemaps", long_about = None)]
struct Cli {
    /// Sitemap URL (http/https) or path to a .xml / .xml.gz file
    #[arg(value_name = "TARGET")]
    target: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Cross-check the origin's robots.txt
    #[arg(long)]
    robots: bool,

    /// Print the URLs found, sorted
    #[arg(long)]
    list_urls: bool,

    /// Also write the report as markdown to this file
    #[arg(long, value_name = "FILE")]
    markdown: Option<PathBuf>,

    /// Maximum number of child sitemaps fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Price per thousand URLs for the cost estimate
    #[arg(long, value_name = "PRICE")]
    price_per_thousand: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let target = Target::parse(&cli.target)?;

    let inspector = Inspector::new(config)?;

    let inspection = match inspector.inspect(&target).await {
        Ok(inspection) => inspection,
        Err(e) if e.is_empty_result() => {
            println!("No URLs found in {}", target);
            return Ok(ExitCode::from(2));
        }
        Err(e) => {
            tracing::error!("Inspection failed: {}", e);
            return Err(e.into());
        }
    };

    let robots = if inspector.config().robots.enabled {
        inspector.check_robots(&target).await
    } else {
        None
    };

    let report = Report::new(inspection, robots, inspector.config());
    print!("{}", TextRenderer.render(&report));

    if let Some(path) = &cli.markdown {
        write_markdown_report(&report, path)
            .with_context(|| format!("Failed to write markdown report to {}", path.display()))?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.robots {
        config.robots.enabled = true;
    }
    if cli.list_urls {
        config.output.list_urls = true;
    }
    if let Some(concurrency) = cli.concurrency {
        config.aggregator.max_concurrent_fetches = concurrency;
    }
    if let Some(price) = cli.price_per_thousand {
        config.cost.price_per_thousand_urls = price;
    }

    validate(&config).context("Invalid command-line override")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout can be piped.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_inspector=info,warn"),
            1 => EnvFilter::new("sitemap_inspector=debug,info"),
            2 => EnvFilter::new("sitemap_inspector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
