//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect handling and content decoding
//! - Link extraction and canonicalization
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::extract_links;

use crate::config::Config;
use crate::model::CrawlReport;
use crate::output::{snapshot_dir, FsArtifactSink};
use crate::AuditError;
use std::path::Path;

/// Runs a complete crawl operation against the live site
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Attach the HTML snapshot directory (if enabled)
/// 3. Crawl breadth-first from the seed
/// 4. Return the aggregated report
///
/// Writing the report files is left to [`crate::output::publish_report`].
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed, possibly with failed pages
/// * `Err(AuditError)` - No report could be produced
pub async fn crawl(config: Config) -> Result<CrawlReport, AuditError> {
    let fetcher = HttpFetcher::new(&config)?;
    let save_html = config.output.save_html;
    let output_dir = config.output.output_dir.clone();

    let mut coordinator = Coordinator::new(config, fetcher);
    if save_html {
        let dir = snapshot_dir(Path::new(&output_dir), &coordinator.timestamp_id());
        tracing::debug!("HTML snapshots go to {}", dir.display());
        coordinator = coordinator.with_snapshot_sink(Box::new(FsArtifactSink::new(dir)));
    }

    coordinator.run().await
}
