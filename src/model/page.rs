//! Per-page audit results
//!
//! A `PageResult` is created when a URL is fetched and filled in by each
//! analysis stage in turn: SEO extraction, issue evaluation, security
//! analysis, and finally the inbound-link backfill after the crawl.
use crate::model::security::SecurityAssessment;
use serde::{Serialize, Serializer};
use std::fmt;

/// An SEO or indexability problem found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    HttpStatus(u16),
    NonHtmlContentType,
    MissingTitle,
    TitleTooShort,
    TitleTooLong,
    MissingMetaDescription,
    MetaDescriptionTooShort,
    MetaDescriptionTooLong,
    MissingH1,
    MultipleH1,
    MissingCanonical,
    CanonicalInvalid,
    CanonicalOffsite,
    Noindex,
    ThinOrCsrContent,
    RequestFailed,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::HttpStatus(status) => return write!(f, "http_status_{}", status),
            Self::NonHtmlContentType => "non_html_content_type",
            Self::MissingTitle => "missing_title",
            Self::TitleTooShort => "title_too_short",
            Self::TitleTooLong => "title_too_long",
            Self::MissingMetaDescription => "missing_meta_description",
            Self::MetaDescriptionTooShort => "meta_description_too_short",
            Self::MetaDescriptionTooLong => "meta_description_too_long",
            Self::MissingH1 => "missing_h1",
            Self::MultipleH1 => "multiple_h1",
            Self::MissingCanonical => "missing_canonical",
            Self::CanonicalInvalid => "canonical_invalid",
            Self::CanonicalOffsite => "canonical_offsite",
            Self::Noindex => "noindex",
            Self::ThinOrCsrContent => "thin_or_csr_content",
            Self::RequestFailed => "request_failed",
        };
        f.write_str(code)
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything recorded about one visited URL
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageResult {
    /// URL as taken from the frontier (canonical)
    pub url: String,
    /// URL after redirects; equals `url` for failed fetches
    pub final_url: String,
    pub depth: u32,
    /// `None` when the fetch itself failed
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,

    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub x_robots_tag: Option<String>,
    pub content_length: usize,

    pub title: Option<String>,
    pub title_length: usize,
    pub meta_description: Option<String>,
    pub meta_description_length: usize,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    /// Number of distinct outbound links, including those not stored
    pub link_count: usize,
    /// First outbound links, capped
    pub links: Vec<String>,
    pub text_content_length: usize,
    pub text_preview: Option<String>,
    pub robots_meta: Vec<String>,

    pub indexable: bool,
    pub issues: Vec<Issue>,
    pub inbound_link_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityAssessment>,
}

impl PageResult {
    /// Result recorded when the fetch collaborator failed
    pub fn failed(url: &str, depth: u32, error: String, elapsed_ms: u64) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            depth,
            error: Some(error),
            elapsed_ms,
            indexable: false,
            issues: vec![Issue::RequestFailed],
            ..Self::default()
        }
    }

    /// The URL the page is reported under
    pub fn report_url(&self) -> &str {
        if self.final_url.is_empty() {
            &self.url
        } else {
            &self.final_url
        }
    }

    pub fn security_score(&self) -> Option<u32> {
        self.security.as_ref().map(|s| s.score)
    }

    pub fn has_issue(&self, issue: Issue) -> bool {
        self.issues.contains(&issue)
    }
}
