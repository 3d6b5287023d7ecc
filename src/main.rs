//! Site-Audit main entry point
//!
//! This is the command-line interface for the Site-Audit crawler.

use anyhow::{bail, Context};
use clap::Parser;
use site_audit::config::{compute_config_hash, parse_config_file, validate, Config};
use site_audit::crawler::crawl;
use site_audit::output::publish_report;
use site_audit::AuditError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Audit: a single-site SEO and security auditor
///
/// Site-Audit crawls one website breadth-first from a seed URL, checks every
/// page for SEO problems and passive security weaknesses, and writes a JSON
/// report, an HTML report and (when a headless browser is available) a PDF.
#[derive(Parser, Debug)]
#[command(name = "site-audit")]
#[command(version = "1.0.0")]
#[command(about = "A single-site SEO and security auditor", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL (overrides crawler.seed-url)
    #[arg(long)]
    seed: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum link depth from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Pause between requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Treat URLs differing only by query string as distinct pages
    #[arg(long)]
    keep_query: bool,

    /// Do not save raw HTML snapshots
    #[arg(long)]
    no_save_html: bool,

    /// Number of pages that get an HTML snapshot
    #[arg(long)]
    save_html_limit: Option<usize>,

    /// Directory receiving reports and snapshots
    #[arg(long)]
    output_dir: Option<String>,

    /// Skip PDF rendering
    #[arg(long)]
    no_pdf: bool,

    /// Browser binary used for PDF rendering
    #[arg(long)]
    browser: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        let crawler = &mut config.crawler;
        if let Some(seed) = &self.seed {
            crawler.seed_url = seed.clone();
        }
        if let Some(max_pages) = self.max_pages {
            crawler.max_pages = max_pages;
        }
        if let Some(max_depth) = self.max_depth {
            crawler.max_depth = max_depth;
        }
        if let Some(delay_ms) = self.delay_ms {
            crawler.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            crawler.timeout_secs = timeout_secs;
        }
        if self.keep_query {
            crawler.keep_query = true;
        }

        let output = &mut config.output;
        if self.no_save_html {
            output.save_html = false;
        }
        if let Some(limit) = self.save_html_limit {
            output.save_html_limit = limit;
        }
        if let Some(dir) = &self.output_dir {
            output.output_dir = dir.clone();
        }
        if self.no_pdf {
            output.render_pdf = false;
        }
        if let Some(browser) = &self.browser {
            output.browser_path = Some(browser.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = parse_config_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply(&mut config);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_audit=info,warn"),
            1 => EnvFilter::new("site_audit=debug,info"),
            2 => EnvFilter::new("site_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Audit Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Keep query: {}", config.crawler.keep_query);

    println!("\nUser Agent:");
    println!("  User-Agent: {}", config.user_agent.user_agent);
    println!("  Accept-Language: {}", config.user_agent.accept_language);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
    if config.output.save_html {
        println!("  HTML snapshots: first {} pages", config.output.save_html_limit);
    } else {
        println!("  HTML snapshots: off");
    }
    println!("  PDF: {}", if config.output.render_pdf { "on" } else { "off" });
    if let Some(browser) = &config.output.browser_path {
        println!("  Browser: {}", browser);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Auditing {} (max_pages={}, max_depth={}, delay={}ms)",
        config.crawler.seed_url,
        config.crawler.max_pages,
        config.crawler.max_depth,
        config.crawler.delay_ms
    );

    let output = config.output.clone();

    let report = tokio::select! {
        result = crawl(config) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, no report written");
            Err(AuditError::Interrupted)
        }
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let artifacts = publish_report(&report, &output).await;

    println!("Pages crawled: {}", report.summary.pages_crawled);
    if let Some(score) = report.security.avg_score {
        println!("Average security score: {}", score);
    }
    for (label, path) in [
        ("JSON", &artifacts.json),
        ("HTML", &artifacts.html),
        ("PDF", &artifacts.pdf),
    ] {
        if let Some(path) = path {
            println!("{} report: {}", label, path.display());
        }
    }

    if artifacts.json.is_none() && artifacts.html.is_none() {
        bail!("no report could be written to {}", output.output_dir);
    }

    Ok(())
}
