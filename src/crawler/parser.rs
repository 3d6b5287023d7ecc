//! Link extraction for discovered hrefs
//!
//! This module turns the raw `href` values found on a page into the ordered,
//! de-duplicated list of canonical page URLs the page links to:
//! - Fragment-only and non-navigable (`javascript:`, `mailto:`, `tel:`) hrefs are skipped
//! - Relative references are resolved against the page URL
//! - Results are canonicalized; only `http`/`https` pages are kept
//! - Static assets are dropped
//!
//! Same-site filtering is left to the coordinator.

use crate::url::{canonicalize, is_asset, is_http};
use std::collections::HashSet;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Resolves and filters raw hrefs into canonical outbound links
///
/// First-seen order is preserved and duplicates (after canonicalization) are
/// dropped.
///
/// # Example
///
/// ```
/// use site_audit::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/").unwrap();
/// let hrefs = ["#top", "javascript:void(0)", "mailto:x@y.com", "/about"];
/// let links = extract_links(&base, hrefs, false);
/// let links: Vec<&str> = links.iter().map(|u| u.as_str()).collect();
/// assert_eq!(links, ["https://a.com/about"]);
/// ```
pub fn extract_links<I, S>(base_url: &Url, hrefs: I, keep_query: bool) -> Vec<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let Some(link) = resolve_link(href.as_ref(), base_url, keep_query) else {
            continue;
        };

        if seen.insert(link.as_str().to_string()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a single href, returning `None` if it should be excluded
fn resolve_link(href: &str, base_url: &Url, keep_query: bool) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let absolute = match base_url.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Dropping unresolvable link {:?} on {}: {}", href, base_url, e);
            return None;
        }
    };

    let canonical = match canonicalize(absolute.as_str(), keep_query) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Dropping link {}: {}", absolute, e);
            return None;
        }
    };

    if !is_http(&canonical) || is_asset(&canonical) {
        return None;
    }

    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/dir/page").unwrap()
    }

    fn links(hrefs: &[&str]) -> Vec<String> {
        extract_links(&base_url(), hrefs, false)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_drops_non_navigable_schemes() {
        let base = Url::parse("https://a.com/").unwrap();
        let result: Vec<String> = extract_links(
            &base,
            ["#top", "javascript:void(0)", "mailto:x@y.com", "/about"],
            false,
        )
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(result, vec!["https://a.com/about"]);
    }

    #[test]
    fn test_scheme_check_is_case_insensitive() {
        assert!(links(&["JavaScript:alert(1)", "MAILTO:a@b.c", "Tel:+123"]).is_empty());
    }

    #[test]
    fn test_skips_empty_and_whitespace() {
        assert!(links(&["", "   ", "\t#frag "]).is_empty());
    }

    #[test]
    fn test_resolves_relative_links() {
        assert_eq!(
            links(&["other", "../up", "/root/", "//cdn.example.org/x"]),
            vec![
                "https://example.com/dir/other",
                "https://example.com/up",
                "https://example.com/root",
                "https://cdn.example.org/x",
            ]
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(links(&["  /about  "]), vec!["https://example.com/about"]);
    }

    #[test]
    fn test_keeps_offsite_links() {
        assert_eq!(links(&["https://other.com/"]), vec!["https://other.com/"]);
    }

    #[test]
    fn test_drops_assets_and_other_schemes() {
        assert!(links(&["/logo.png", "/styles/site.CSS", "ftp://example.com/file", "data:text/plain,hi"]).is_empty());
    }

    #[test]
    fn test_dedup_after_canonicalization_keeps_first_order() {
        assert_eq!(
            links(&["/b", "/a/", "/b#x", "/a?q=1", "https://EXAMPLE.com:443/b/"]),
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }

    #[test]
    fn test_keep_query() {
        let result = extract_links(&base_url(), ["/a?q=1", "/a?q=2", "/a"], true);
        let result: Vec<&str> = result.iter().map(Url::as_str).collect();
        assert_eq!(
            result,
            vec![
                "https://example.com/a?q=1",
                "https://example.com/a?q=2",
                "https://example.com/a",
            ]
        );
    }
}
