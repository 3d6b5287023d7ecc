//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, which:
//! - Pops frontier entries in FIFO order and skips already-visited URLs
//! - Fetches each page and runs the per-page audit on it
//! - Records failed fetches as `request_failed` results
//! - Saves raw HTML snapshots for the first pages
//! - Counts inbound links and enqueues same-site links within the depth bound
//! - Builds the final report once the frontier or the page budget runs out

use crate::audit::audit_page;
use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::model::{CrawlReport, PageResult};
use crate::output::{build_report, snapshot_file_name, ArtifactSink, TIMESTAMP_ID_FORMAT};
use crate::url::{canonical_key, canonicalize, is_same_site};
use crate::AuditError;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    config: Config,
    fetcher: F,
    snapshots: Option<Box<dyn ArtifactSink>>,
    started_at: DateTime<Local>,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator; the run timestamp is taken now
    pub fn new(config: Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            snapshots: None,
            started_at: Local::now(),
        }
    }

    /// Sends raw HTML of the first `save-html-limit` fetched pages to `sink`
    ///
    /// Has no effect when `save-html` is disabled.
    pub fn with_snapshot_sink(mut self, sink: Box<dyn ArtifactSink>) -> Self {
        self.snapshots = Some(sink);
        self
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// `%Y%m%d_%H%M%S` form of the run timestamp
    pub fn timestamp_id(&self) -> String {
        self.started_at.format(TIMESTAMP_ID_FORMAT).to_string()
    }

    /// Runs the crawl to completion
    ///
    /// Per-page failures never end the run. An error here (an unparseable
    /// seed) means no report was produced.
    pub async fn run(&mut self) -> Result<CrawlReport, AuditError> {
        let crawler = &self.config.crawler;
        let keep_query = crawler.keep_query;
        let max_pages = crawler.max_pages;
        let max_depth = crawler.max_depth;

        let seed = canonicalize(&crawler.seed_url, keep_query)?;
        let seed_url = seed.as_str().to_string();

        tracing::info!(
            "Starting crawl of {} (max_pages={}, max_depth={})",
            seed_url,
            max_pages,
            max_depth
        );

        let mut frontier = Frontier::new(seed);
        let mut pages: Vec<PageResult> = Vec::new();
        let mut inbound: HashMap<String, usize> = HashMap::new();
        let mut snapshots_saved = 0usize;
        let start_time = Instant::now();

        while pages.len() < max_pages {
            let Some(entry) = frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let url = match canonicalize(entry.url.as_str(), keep_query) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", entry.url, e);
                    continue;
                }
            };

            if !frontier.mark_seen(&url) {
                tracing::debug!("Already visited {}", url);
                continue;
            }

            if !is_same_site(url.as_str(), &seed_url) {
                tracing::debug!("Skipping off-site {}", url);
                continue;
            }

            tracing::info!(
                "[{}/{}] depth={} GET {}",
                pages.len() + 1,
                max_pages,
                entry.depth,
                url
            );

            let fetch_started = Instant::now();
            let fetched = self.fetcher.fetch(url.as_str()).await;
            let elapsed_ms = elapsed_millis(fetch_started);

            let fetched = match fetched {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!("Request failed for {}: {}", url, e);
                    pages.push(PageResult::failed(
                        url.as_str(),
                        entry.depth,
                        e.to_string(),
                        elapsed_ms,
                    ));
                    self.pause(&frontier, pages.len()).await;
                    continue;
                }
            };

            let (mut page, out_links) = audit_page(url.as_str(), &fetched, &seed_url, keep_query);
            page.depth = entry.depth;
            page.elapsed_ms = elapsed_ms;

            if snapshots_saved < self.snapshot_limit() {
                snapshots_saved += 1;
                self.save_snapshot(page.report_url(), &fetched.body);
            }

            let mut enqueued = 0;
            for link in out_links.iter().filter(|l| is_same_site(l.as_str(), &seed_url)) {
                *inbound.entry(link.as_str().to_string()).or_insert(0) += 1;

                if entry.depth < max_depth && frontier.push(link.clone(), entry.depth + 1) {
                    enqueued += 1;
                }
            }

            tracing::debug!(
                "{}: status={:?} issues={} links={} enqueued={}",
                url,
                page.status_code,
                page.issues.len(),
                page.link_count,
                enqueued
            );

            pages.push(page);
            self.pause(&frontier, pages.len()).await;
        }

        for page in &mut pages {
            let key = canonical_key(page.report_url(), keep_query)
                .unwrap_or_else(|_| page.report_url().to_string());
            page.inbound_link_count = inbound.get(&key).copied().unwrap_or(0);
        }

        tracing::info!(
            "Crawl completed: {} pages in {:?} ({} URLs visited, {} left in frontier)",
            pages.len(),
            start_time.elapsed(),
            frontier.seen_count(),
            frontier.len()
        );

        Ok(build_report(
            &seed_url,
            self.started_at,
            pages,
            &self.config.crawler,
        ))
    }

    fn snapshot_limit(&self) -> usize {
        match (&self.snapshots, self.config.output.save_html) {
            (Some(_), true) => self.config.output.save_html_limit,
            _ => 0,
        }
    }

    /// Persists a raw HTML snapshot; failures are logged only
    fn save_snapshot(&self, url: &str, body: &str) {
        let Some(sink) = &self.snapshots else {
            return;
        };

        let name = snapshot_file_name(url);
        match sink.write_artifact(&name, body.as_bytes()) {
            Ok(path) => tracing::debug!("Saved HTML snapshot {}", path.display()),
            Err(e) => tracing::warn!("Failed to save HTML snapshot {}: {}", name, e),
        }
    }

    /// Rate-limit delay, skipped once no more work can follow
    async fn pause(&self, frontier: &Frontier, pages_done: usize) {
        let delay = self.config.crawler.delay();
        if delay.is_zero() || frontier.is_empty() || pages_done >= self.config.crawler.max_pages {
            return;
        }
        tokio::time::sleep(delay).await;
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
