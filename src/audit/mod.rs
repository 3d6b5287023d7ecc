//! Per-page analysis
//!
//! # Components
//!
//! - `page`: SEO signal extraction (head tags, headings, links, visible text)
//! - `issues`: the SEO rule set and indexability verdict
//! - `security`: passive header/markup heuristics and scoring
//! - `dom`: the DOM queries the above share
//!
//! A page body is parsed once; every stage reads the same document. The
//! parsed document is not `Send`, so all analysis happens synchronously in
//! [`audit_page`] between two awaits of the crawl loop.

pub mod dom;
mod issues;
mod page;
mod security;

pub use issues::evaluate;
pub use page::extract_page;
pub use security::analyze_security;

use crate::crawler::FetchedPage;
use crate::model::PageResult;
use reqwest::header::HeaderMap;
use scraper::Html;
use url::Url;

/// Runs extraction, issue evaluation and security analysis on one page
///
/// `url` is the frontier URL that was requested; outbound links resolve
/// against it even when the response came from a redirect target. Returns
/// the page result (depth and timing left to the caller) and every
/// canonical outbound link.
pub fn audit_page(
    url: &str,
    fetched: &FetchedPage,
    seed_url: &str,
    keep_query: bool,
) -> (PageResult, Vec<Url>) {
    let document = Html::parse_document(&fetched.body);

    let base = Url::parse(url)
        .map_err(|e| tracing::debug!("No usable base URL for {}: {}", url, e))
        .ok();

    let (mut page, out_links) = extract_page(url, base.as_ref(), &document, fetched, keep_query);

    let (indexable, issues) = evaluate(&page, seed_url);
    page.indexable = indexable;
    page.issues = issues;

    page.security = Some(analyze_security(
        seed_url,
        &fetched.final_url,
        &document,
        &fetched.headers,
    ));

    (page, out_links)
}

/// Trimmed header value, `None` when absent or blank
///
/// Bytes outside visible ASCII are decoded lossily, so a header carrying
/// obs-text still counts as present.
pub(crate) fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    let text = String::from_utf8_lossy(value.as_bytes());
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
