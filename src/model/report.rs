//! Aggregate report types
use crate::model::page::PageResult;
use crate::model::security::OwaspCategory;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value shared by two or more pages, mapped to the pages' URLs
pub type DuplicateBuckets = BTreeMap<String, Vec<String>>;

/// SEO summary across all pages
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub pages_crawled: usize,
    pub seed_url: String,
    pub max_pages: usize,
    pub max_depth: u32,
    pub keep_query: bool,
    pub missing_title: usize,
    pub missing_meta_description: usize,
    pub missing_h1: usize,
    pub noindex: usize,
    pub non_200: usize,
    pub issue_counts: BTreeMap<String, usize>,
    pub duplicate_titles: DuplicateBuckets,
    pub duplicate_meta_descriptions: DuplicateBuckets,
}

/// Security summary across all pages
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecuritySummary {
    pub avg_score: Option<u32>,
    pub min_score: Option<u32>,
    #[serde(rename = "owasp_top10_hits_total")]
    pub category_totals: BTreeMap<OwaspCategory, u32>,
    pub finding_counts: BTreeMap<String, usize>,
}

/// The result of one audit run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub timestamp: DateTime<Local>,
    /// `%Y%m%d_%H%M%S`, used in artifact names
    pub timestamp_id: String,
    pub seed_url: String,
    pub pages: Vec<PageResult>,
    pub summary: Summary,
    pub security: SecuritySummary,
}
