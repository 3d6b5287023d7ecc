//! Report aggregation
//!
//! Folds the page results of a run into the SEO summary (counters, issue
//! histogram, duplicate buckets) and the security summary (score statistics,
//! category totals, finding histogram).

use crate::config::CrawlerConfig;
use crate::model::{
    CrawlReport, DuplicateBuckets, Issue, OwaspCategory, PageResult, SecuritySummary, Summary,
};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Format of `CrawlReport::timestamp_id`
pub const TIMESTAMP_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Builds the immutable report for a finished crawl
pub fn build_report(
    seed_url: &str,
    timestamp: DateTime<Local>,
    pages: Vec<PageResult>,
    config: &CrawlerConfig,
) -> CrawlReport {
    let summary = summarize(seed_url, &pages, config);
    let security = summarize_security(&pages);

    CrawlReport {
        timestamp,
        timestamp_id: timestamp.format(TIMESTAMP_ID_FORMAT).to_string(),
        seed_url: seed_url.to_string(),
        pages,
        summary,
        security,
    }
}

fn summarize(seed_url: &str, pages: &[PageResult], config: &CrawlerConfig) -> Summary {
    let count = |issue: Issue| pages.iter().filter(|p| p.has_issue(issue)).count();

    let mut issue_counts = BTreeMap::new();
    for issue in pages.iter().flat_map(|p| &p.issues) {
        *issue_counts.entry(issue.to_string()).or_insert(0) += 1;
    }

    Summary {
        pages_crawled: pages.len(),
        seed_url: seed_url.to_string(),
        max_pages: config.max_pages,
        max_depth: config.max_depth,
        keep_query: config.keep_query,
        missing_title: count(Issue::MissingTitle),
        missing_meta_description: count(Issue::MissingMetaDescription),
        missing_h1: count(Issue::MissingH1),
        noindex: count(Issue::Noindex),
        non_200: pages
            .iter()
            .filter(|p| p.status_code.is_some_and(|s| s != 200))
            .count(),
        issue_counts,
        duplicate_titles: duplicates(pages, |p| p.title.as_deref()),
        duplicate_meta_descriptions: duplicates(pages, |p| p.meta_description.as_deref()),
    }
}

/// Groups pages by a trimmed, non-empty field value shared by two or more pages
pub fn duplicates<F>(pages: &[PageResult], field: F) -> DuplicateBuckets
where
    F: Fn(&PageResult) -> Option<&str>,
{
    let mut buckets: DuplicateBuckets = BTreeMap::new();
    for page in pages {
        let Some(value) = field(page).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        buckets
            .entry(value.to_string())
            .or_default()
            .push(page.report_url().to_string());
    }

    buckets.retain(|_, urls| urls.len() > 1);
    buckets
}

fn summarize_security(pages: &[PageResult]) -> SecuritySummary {
    let scores: Vec<u32> = pages.iter().filter_map(PageResult::security_score).collect();

    let avg_score = if scores.is_empty() {
        None
    } else {
        let total: u64 = scores.iter().map(|s| u64::from(*s)).sum();
        u32::try_from(total / scores.len() as u64).ok()
    };

    let mut category_totals = BTreeMap::new();
    let mut finding_counts = BTreeMap::new();
    for assessment in pages.iter().filter_map(|p| p.security.as_ref()) {
        for finding in &assessment.findings {
            *finding_counts.entry(finding.to_string()).or_insert(0) += 1;
        }
        for category in OwaspCategory::ALL {
            *category_totals.entry(category).or_insert(0) += assessment.hits(category);
        }
    }

    SecuritySummary {
        avg_score,
        min_score: scores.iter().min().copied(),
        category_totals,
        finding_counts,
    }
}

/// Entries of a count map sorted by count (descending), then key
pub fn ranked<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}
