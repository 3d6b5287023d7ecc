//! SEO signal extraction
//!
//! Reads the single-valued head tags (first match wins), heading texts,
//! outbound links, visible text and robots directives from a parsed page.

use super::dom;
use super::header_value;
use crate::crawler::{extract_links, FetchedPage};
use crate::model::PageResult;
use scraper::Html;
use url::Url;

/// Cap on stored `<h2>` and `<h3>` texts
const MAX_SUBHEADINGS: usize = 20;

/// Cap on the stored outbound link list
const MAX_STORED_LINKS: usize = 100;

/// Length of the visible-text preview, in characters
const PREVIEW_CHARS: usize = 500;

/// Extracts SEO fields from a fetched page
///
/// Returns the partially filled result (no issues, security or depth yet)
/// together with every canonical outbound link, uncapped. Relative links
/// are resolved against `base`, the requested page URL; without a base no
/// links are collected.
pub fn extract_page(
    url: &str,
    base: Option<&Url>,
    document: &Html,
    fetched: &FetchedPage,
    keep_query: bool,
) -> (PageResult, Vec<Url>) {
    let title = dom::select_first(document, "title").map(|el| dom::element_text(&el));

    let meta_description = meta_content(document, "description");
    let meta_keywords = meta_content(document, "keywords");

    let canonical_url = dom::first_with_attr(document, "link", "rel", |rel| {
        dom::has_token(rel, "canonical")
    })
    .and_then(|el| el.value().attr("href").map(str::to_string));

    let headings = |tag: &str, cap: usize| -> Vec<String> {
        dom::select_all(document, tag)
            .iter()
            .take(cap)
            .map(dom::element_text)
            .collect()
    };

    let hrefs: Vec<&str> = dom::select_all(document, "a[href]")
        .iter()
        .filter_map(|a| a.value().attr("href"))
        .collect();
    let out_links = match base {
        Some(base) => extract_links(base, hrefs, keep_query),
        None => Vec::new(),
    };

    let text = dom::visible_text(document);
    let text_preview = if text.is_empty() {
        None
    } else {
        Some(text.chars().take(PREVIEW_CHARS).collect())
    };

    let robots_meta = dom::all_with_attr(document, "meta", "name", |name| {
        name.eq_ignore_ascii_case("robots") || name.eq_ignore_ascii_case("googlebot")
    })
    .iter()
    .filter_map(|el| dom::attr_trimmed(el, "content"))
    .map(str::to_string)
    .collect();

    let page = PageResult {
        url: url.to_string(),
        final_url: fetched.final_url.clone(),
        status_code: Some(fetched.status),
        content_type: header_value(&fetched.headers, "content-type"),
        content_encoding: header_value(&fetched.headers, "content-encoding"),
        x_robots_tag: header_value(&fetched.headers, "x-robots-tag"),
        content_length: fetched.body.chars().count(),
        title_length: title.as_deref().map_or(0, |t| t.chars().count()),
        title,
        meta_description_length: meta_description
            .as_deref()
            .map_or(0, |d| d.trim().chars().count()),
        meta_description,
        meta_keywords,
        canonical_url,
        h1_tags: headings("h1", usize::MAX),
        h2_tags: headings("h2", MAX_SUBHEADINGS),
        h3_tags: headings("h3", MAX_SUBHEADINGS),
        link_count: out_links.len(),
        links: out_links
            .iter()
            .take(MAX_STORED_LINKS)
            .map(|u| u.as_str().to_string())
            .collect(),
        text_content_length: text.chars().count(),
        text_preview,
        robots_meta,
        ..PageResult::default()
    };

    (page, out_links)
}

/// Raw `content` of the first `<meta>` whose name matches case-insensitively
fn meta_content(document: &Html, name: &str) -> Option<String> {
    dom::first_with_attr(document, "meta", "name", |n| n.eq_ignore_ascii_case(name))
        .and_then(|el| el.value().attr("content").map(str::to_string))
}
