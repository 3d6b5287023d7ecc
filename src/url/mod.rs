//! URL handling module for Site-Audit
//!
//! This module provides the canonical URL identity used for crawl dedup,
//! static-asset classification, and same-site membership checks. Everything
//! here is pure: no network access.

mod asset;
mod domain;
mod normalize;

pub use asset::is_asset;
pub use domain::{extract_domain, is_same_site, site_host, strip_www};
pub use normalize::canonicalize;

use ::url::Url;

/// Canonicalizes a URL and returns its string identity
///
/// Convenience wrapper for map keys and seen-sets.
pub fn canonical_key(url: &str, keep_query: bool) -> crate::UrlResult<String> {
    canonicalize(url, keep_query).map(String::from)
}

/// Returns true for the two schemes the crawler can fetch
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
