use url::Url;

/// Path extensions that never lead to an HTML page
const ASSET_EXTENSIONS: &[&str] = &[
    // images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".ico",
    // styles, scripts, data
    ".css", ".js", ".map", ".json", ".xml",
    // documents and archives
    ".pdf", ".zip", ".rar", ".7z",
    // media
    ".mp4", ".mp3", ".mov", ".avi",
    // fonts
    ".woff", ".woff2", ".ttf", ".eot",
];

/// Checks if a URL points at a static asset rather than a page
///
/// The decision is made on the lowercase path alone; query and fragment are
/// ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_audit::url::is_asset;
///
/// assert!(is_asset(&Url::parse("https://a.com/logo.PNG?v=2").unwrap()));
/// assert!(!is_asset(&Url::parse("https://a.com/about").unwrap()));
/// ```
pub fn is_asset(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(url: &str) -> bool {
        is_asset(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_images_and_styles() {
        assert!(asset("https://a.com/img/hero.jpeg"));
        assert!(asset("https://a.com/static/site.css"));
        assert!(asset("https://a.com/app.js"));
        assert!(asset("https://a.com/app.js.map"));
    }

    #[test]
    fn test_documents_media_fonts() {
        assert!(asset("https://a.com/brochure.pdf"));
        assert!(asset("https://a.com/files/archive.7z"));
        assert!(asset("https://a.com/video.MP4"));
        assert!(asset("https://a.com/fonts/inter.woff2"));
    }

    #[test]
    fn test_pages_are_not_assets() {
        assert!(!asset("https://a.com/"));
        assert!(!asset("https://a.com/products"));
        assert!(!asset("https://a.com/index.html"));
        assert!(!asset("https://a.com/page.php?file=x.pdf"));
    }

    #[test]
    fn test_extension_must_end_path() {
        assert!(!asset("https://a.com/css/layout"));
        assert!(!asset("https://a.com/jsonapi/items"));
    }
}
