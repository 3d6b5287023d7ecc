//! DOM queries over a parsed document
//!
//! Thin helpers over `scraper` covering what the extractors need: first or
//! all elements by tag, first element whose attribute matches a predicate,
//! trimmed text, and visible text with script-like subtrees skipped.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content never counts as visible text
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript"];

/// Returns every element matching a CSS selector, in document order
///
/// An invalid selector yields no elements.
pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Returns the first element matching a CSS selector
pub fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Returns the first `tag` element whose `attr` value satisfies `matches`
pub fn first_with_attr<'a, F>(
    document: &'a Html,
    tag: &str,
    attr: &str,
    matches: F,
) -> Option<ElementRef<'a>>
where
    F: Fn(&str) -> bool,
{
    select_all(document, tag)
        .into_iter()
        .find(|el| el.value().attr(attr).is_some_and(&matches))
}

/// Returns every `tag` element whose `attr` value satisfies `matches`
pub fn all_with_attr<'a, F>(document: &'a Html, tag: &str, attr: &str, matches: F) -> Vec<ElementRef<'a>>
where
    F: Fn(&str) -> bool,
{
    select_all(document, tag)
        .into_iter()
        .filter(|el| el.value().attr(attr).is_some_and(&matches))
        .collect()
}

/// Text of an element with each text node trimmed and joined without separator
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Attribute value, trimmed, `None` when absent or blank
pub fn attr_trimmed<'a>(element: &ElementRef<'a>, attr: &str) -> Option<&'a str> {
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Visible text of the document
///
/// Text of `<body>` (the whole document when there is none), skipping
/// `script`, `style` and `noscript` subtrees, with whitespace collapsed to
/// single spaces.
pub fn visible_text(document: &Html) -> String {
    let root = select_first(document, "body").unwrap_or_else(|| document.root_element());

    let mut chunks = Vec::new();
    collect_visible(&root, &mut chunks);

    chunks
        .iter()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_visible<'a>(element: &ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push(text),
            Node::Element(el) if INVISIBLE_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible(&child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Checks whether a whitespace-separated token list contains `token`
pub fn has_token(list: &str, token: &str) -> bool {
    list.split_ascii_whitespace()
        .any(|t| t.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"<html><head><title>T</title><style>p{}</style></head>
            <body><h1>Hello</h1><script>var x = 1;</script>
            <p>big   <b>world</b></p><noscript>enable js</noscript></body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(visible_text(&doc), "Hello big world");
    }

    #[test]
    fn test_element_text_trims_pieces() {
        let doc = Html::parse_document("<h1>  Big <span> Sale </span> </h1>");
        let h1 = select_first(&doc, "h1").unwrap();
        assert_eq!(element_text(&h1), "BigSale");
    }

    #[test]
    fn test_first_with_attr() {
        let doc = Html::parse_document(
            r#"<meta name="viewport" content="a"><meta name="Description" content="b"><meta name="description" content="c">"#,
        );
        let meta = first_with_attr(&doc, "meta", "name", |v| v.eq_ignore_ascii_case("description")).unwrap();
        assert_eq!(meta.value().attr("content"), Some("b"));
    }

    #[test]
    fn test_has_token() {
        assert!(has_token("alternate Canonical", "canonical"));
        assert!(!has_token("canonicalish", "canonical"));
    }

    #[test]
    fn test_invalid_selector_is_empty() {
        let doc = Html::parse_document("<p>x</p>");
        assert!(select_all(&doc, "p[").is_empty());
    }
}
