use crate::UrlError;
use url::Url;

/// Canonicalizes a URL into the identity used for dedup and frontier membership
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if it cannot be parsed at all
/// 2. Lowercase scheme and host, drop the default port (done by the parser
///    for `http`/`https`)
/// 3. Remove the fragment
/// 4. Remove the query unless `keep_query` is set (an empty `?` is always
///    removed)
/// 5. Remove `;params` from the last path segment
/// 6. Remove trailing slashes from non-root paths
///
/// Steps 5 and 6 repeat until the path is stable, so canonicalizing a
/// canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use site_audit::url::canonicalize;
///
/// let url = canonicalize("http://Example.com:80/path/", false).unwrap();
/// assert_eq!(url.as_str(), "http://example.com/path");
///
/// let url = canonicalize("https://example.com/list?page=2#top", true).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/list?page=2");
/// ```
pub fn canonicalize(url_str: &str, keep_query: bool) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{url_str}: {e}")))?;

    url.set_fragment(None);

    if !keep_query || url.query() == Some("") {
        url.set_query(None);
    }

    // mailto:, data: and friends have an opaque path
    if url.cannot_be_a_base() {
        return Ok(url);
    }

    let path = normalize_path(url.path());
    if path != url.path() {
        url.set_path(&path);
    }

    Ok(url)
}

/// Strips trailing slashes and last-segment params until nothing changes
fn normalize_path(path: &str) -> String {
    let mut current = path.to_string();

    loop {
        let next = strip_trailing_slashes(strip_params(&current));
        if next == current {
            return current;
        }
        current = next.to_string();
    }
}

fn strip_params(path: &str) -> &str {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[segment_start..].find(';') {
        Some(offset) => &path[..segment_start + offset],
        None => path,
    }
}

fn strip_trailing_slashes(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(url: &str) -> String {
        canonicalize(url, false).unwrap().to_string()
    }

    #[test]
    fn test_strips_default_http_port() {
        assert_eq!(canon("http://Example.com:80/path/"), "http://example.com/path");
    }

    #[test]
    fn test_strips_default_https_port() {
        assert_eq!(canon("https://example.com:443/a"), "https://example.com/a");
    }

    #[test]
    fn test_keeps_non_default_port() {
        assert_eq!(canon("https://example.com:8443/a/"), "https://example.com:8443/a");
        assert_eq!(canon("http://example.com:443/"), "http://example.com:443/");
    }

    #[test]
    fn test_lowercases_scheme_and_host_only() {
        assert_eq!(canon("HTTPS://EXAMPLE.COM/Page"), "https://example.com/Page");
    }

    #[test]
    fn test_keeps_root_slash() {
        assert_eq!(canon("https://example.com/"), "https://example.com/");
        assert_eq!(canon("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_removes_fragment() {
        assert_eq!(canon("https://example.com/page#section"), "https://example.com/page");
    }

    #[test]
    fn test_drops_query_by_default() {
        assert_eq!(canon("https://example.com/page?id=1"), "https://example.com/page");
    }

    #[test]
    fn test_keeps_query_when_requested() {
        let url = canonicalize("https://example.com/page/?id=1#x", true).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?id=1");
    }

    #[test]
    fn test_empty_query_removed_even_when_kept() {
        let url = canonicalize("https://example.com/page?", true).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_drops_path_params() {
        assert_eq!(canon("https://example.com/a/b;jsessionid=42"), "https://example.com/a/b");
        assert_eq!(canon("https://example.com/a;v=1/b"), "https://example.com/a;v=1/b");
    }

    #[test]
    fn test_repeated_trailing_slashes() {
        assert_eq!(canon("https://example.com/a//"), "https://example.com/a");
        assert_eq!(canon("https://example.com///"), "https://example.com/");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "http://Example.com:80/path/",
            "https://www.example.com/a/b/?q=1#f",
            "https://example.com/a;x/;y",
            "https://example.com/a/;x/",
            "https://example.com///",
            "https://example.com/%7Euser/",
            "mailto:someone@example.com",
        ];

        for keep_query in [false, true] {
            for input in inputs {
                let once = canonicalize(input, keep_query).unwrap();
                let twice = canonicalize(once.as_str(), keep_query).unwrap();
                assert_eq!(once, twice, "not idempotent for {input}");
            }
        }
    }

    #[test]
    fn test_opaque_urls_pass_through() {
        let url = canonicalize("mailto:someone@example.com", false).unwrap();
        assert_eq!(url.scheme(), "mailto");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(canonicalize("not a url", false), Err(UrlError::Parse(_))));
        assert!(canonicalize("/relative/path", false).is_err());
        assert!(canonicalize("http://", false).is_err());
    }
}
