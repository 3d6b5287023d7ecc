//! Site-Audit: a single-site SEO and security auditor
//!
//! This crate crawls one website breadth-first, extracts SEO and security
//! signals from every page, scores each page, and folds the results into an
//! aggregate audit report that can be written as JSON, HTML and PDF.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Audit runs
///
/// Per-page problems never surface here: a failed fetch becomes a page
/// result with a `request_failed` issue. An `AuditError` means the run as a
/// whole produced no report.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl interrupted")]
    Interrupted,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Result type alias for Site-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use model::{CrawlReport, Finding, Grade, Issue, PageResult, SecurityAssessment};
pub use self::url::{canonicalize, is_asset, is_same_site};
