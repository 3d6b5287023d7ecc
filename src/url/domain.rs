use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Lowercases a host and removes one leading `www.` label
pub fn strip_www(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Returns the host a URL is compared on for same-site checks
///
/// `None` when the URL cannot be parsed or has no host.
pub fn site_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = strip_www(parsed.host_str()?);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Checks whether `url` belongs to the same site as `seed_url`
///
/// Hostnames are compared after stripping a leading `www.` from both sides.
/// Scheme and port are ignored. A URL without a host never matches.
///
/// # Examples
///
/// ```
/// use site_audit::url::is_same_site;
///
/// assert!(is_same_site("https://www.a.com/x", "https://a.com/"));
/// assert!(!is_same_site("https://blog.a.com/", "https://a.com/"));
/// ```
pub fn is_same_site(url: &str, seed_url: &str) -> bool {
    match (site_host(url), site_host(seed_url)) {
        (Some(host), Some(seed_host)) => host == seed_host,
        _ => false,
    }
}
