//! HTML report generation
//!
//! Renders a [`CrawlReport`] as one self-contained HTML document that prints
//! cleanly, which is what the PDF renderer feeds to the browser.

use crate::model::{CrawlReport, DuplicateBuckets, PageResult};
use crate::output::summary::ranked;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::collections::BTreeMap;

/// Findings shown in the security findings table
const TOP_FINDINGS: usize = 30;

/// URLs listed per duplicate bucket before collapsing into "+N more"
const URLS_PER_BUCKET: usize = 20;

const STYLE: &str = r#"
    :root { --text: #111827; --muted: #6b7280; --border: #e5e7eb; --header: #0f172a; }
    * { box-sizing: border-box; }
    body { margin: 0; padding: 24px; color: var(--text);
           font-family: system-ui, -apple-system, "Segoe UI", Arial, sans-serif; }
    a { color: #2563eb; text-decoration: none; }
    h1 { margin: 0 0 8px; font-size: 22px; }
    h2 { margin: 18px 0 10px; font-size: 16px; }
    .muted { color: var(--muted); }
    .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; }
    .card { border: 1px solid var(--border); border-radius: 12px; padding: 12px 14px; }
    .header { background: var(--header); color: #ffffff; }
    .value { font-size: 18px; }
    .mono { font-family: ui-monospace, Menlo, Consolas, monospace; }
    .pill { display: inline-block; padding: 2px 8px; border-radius: 999px; border: 1px solid #9ca3af; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border-bottom: 1px solid var(--border); padding: 8px; vertical-align: top; }
    th { text-align: left; color: var(--muted); font-weight: 600; }
    .num { text-align: right; }
    .center { text-align: center; }
    tr.warn td:first-child { border-left: 3px solid #f59e0b; }
    details { border: 1px solid var(--border); border-radius: 10px; padding: 10px 12px; margin: 10px 0; }
    @media print {
      * { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
      body { padding: 12px; }
      table { font-size: 12px; }
    }
"#;

/// Renders the full report document
pub fn render_html_report(report: &CrawlReport) -> String {
    let summary = &report.summary;
    let security = &report.security;
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    html.push_str("<title>SEO Audit Report</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    // Header
    html.push_str(&format!(
        "<div class=\"card header\"><h1>SEO Audit Report <span class=\"pill mono\">{}</span></h1>\
         <div>Seed URL: <span class=\"mono\">{}</span></div></div>\n",
        text(&report.timestamp.to_rfc3339()),
        text(&report.seed_url)
    ));

    html.push_str("<h2>Summary</h2>\n<div class=\"grid\">\n");
    html.push_str(&card("Pages crawled", &summary.pages_crawled.to_string()));
    html.push_str(&card("Non-200 pages", &summary.non_200.to_string()));
    html.push_str(&card("noindex", &summary.noindex.to_string()));
    html.push_str("</div>\n");

    html.push_str("<h2>Security (OWASP Top 10 heuristics)</h2>\n<div class=\"grid\">\n");
    html.push_str(&card("Average score", &optional(security.avg_score)));
    html.push_str(&card("Lowest score", &optional(security.min_score)));
    html.push_str(&card("Source", "HTTP headers + HTML"));
    html.push_str("</div>\n");

    let categories: BTreeMap<&str, usize> = security
        .category_totals
        .iter()
        .map(|(category, hits)| (category.label(), *hits as usize))
        .collect();
    html.push_str("<h2>OWASP Top 10 hits</h2>\n");
    html.push_str(&count_table("Category", &ranked(&categories), usize::MAX));
    html.push_str(
        "<p class=\"muted\">Passive heuristic checks only; this is not a vulnerability scan.</p>\n",
    );

    html.push_str("<h2>Security findings (top)</h2>\n");
    html.push_str(&count_table("Finding", &ranked(&security.finding_counts), TOP_FINDINGS));

    html.push_str("<h2>Issues</h2>\n");
    html.push_str(&count_table("Issue", &ranked(&summary.issue_counts), usize::MAX));

    html.push_str("<h2>Pages</h2>\n");
    html.push_str(&page_table(&report.pages));

    html.push_str(&duplicate_section("Duplicate titles", &summary.duplicate_titles));
    html.push_str(&duplicate_section(
        "Duplicate meta descriptions",
        &summary.duplicate_meta_descriptions,
    ));

    html.push_str(
        "<p class=\"muted\">Generated from a static crawl of the served HTML. \
         Confirm findings against the live pages and a dedicated security scan.</p>\n",
    );
    html.push_str("</body>\n</html>\n");

    html
}

fn card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"muted\">{}</div><div class=\"mono value\">{}</div></div>\n",
        text(label),
        text(value)
    )
}

fn optional(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Two-column name/count table, first `limit` rows
fn count_table<K: AsRef<str>>(heading: &str, rows: &[(K, usize)], limit: usize) -> String {
    let mut html = String::from("<div class=\"card\"><table>\n");
    html.push_str(&format!(
        "<thead><tr><th>{}</th><th class=\"num\">Count</th></tr></thead>\n<tbody>\n",
        text(heading)
    ));

    if rows.is_empty() {
        html.push_str("<tr><td colspan=\"2\" class=\"muted\">None</td></tr>\n");
    }
    for (name, count) in rows.iter().take(limit) {
        let name: &str = name.as_ref();
        html.push_str(&format!(
            "<tr><td class=\"mono\">{}</td><td class=\"num\">{}</td></tr>\n",
            text(name),
            count
        ));
    }

    html.push_str("</tbody></table></div>\n");
    html
}

fn page_table(pages: &[PageResult]) -> String {
    let mut html = String::from("<div class=\"card\"><table>\n<thead><tr>");
    for (heading, class) in [
        ("URL", ""),
        ("Status", "num"),
        ("Sec", "num"),
        ("Indexable", "center"),
        ("Title", ""),
        ("DescLen", "num"),
        ("H1", "num"),
        ("Canonical", ""),
        ("Inbound", "num"),
        ("TextLen", "num"),
        ("Depth", "num"),
        ("Issues", ""),
    ] {
        html.push_str(&format!("<th class=\"{}\">{}</th>", class, heading));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    if pages.is_empty() {
        html.push_str("<tr><td colspan=\"12\" class=\"muted\">No pages</td></tr>\n");
    }

    for page in pages {
        let clean = page.indexable && page.status_code == Some(200) && page.issues.is_empty();
        let url = page.report_url();
        let issues: Vec<String> = page.issues.iter().map(ToString::to_string).collect();

        html.push_str(&format!(
            "<tr class=\"{}\">\
             <td class=\"mono\"><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"center\">{}</td>\
             <td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"mono\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td>{}</td></tr>\n",
            if clean { "ok" } else { "warn" },
            attr(url),
            text(url),
            page.status_code.map(|s| s.to_string()).unwrap_or_default(),
            optional(page.security_score()),
            if page.indexable { "yes" } else { "no" },
            text(page.title.as_deref().unwrap_or_default().trim()),
            page.meta_description_length,
            page.h1_tags.len(),
            text(page.canonical_url.as_deref().unwrap_or_default().trim()),
            page.inbound_link_count,
            page.text_content_length,
            page.depth,
            text(&issues.join(", ")),
        ));
    }

    html.push_str("</tbody></table></div>\n");
    html
}

fn duplicate_section(heading: &str, buckets: &DuplicateBuckets) -> String {
    let mut html = format!("<h2>{}</h2>\n", text(heading));
    if buckets.is_empty() {
        html.push_str("<p class=\"muted\">None</p>\n");
        return html;
    }

    let mut sorted: Vec<(&String, &Vec<String>)> = buckets.iter().collect();
    sorted.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    for (value, urls) in sorted {
        html.push_str(&format!(
            "<details><summary><span class=\"mono\">{}</span> <span class=\"pill\">{} pages</span></summary><ul>",
            text(value),
            urls.len()
        ));
        for url in urls.iter().take(URLS_PER_BUCKET) {
            html.push_str(&format!(
                "<li class=\"mono\"><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></li>",
                attr(url),
                text(url)
            ));
        }
        html.push_str("</ul>");
        if urls.len() > URLS_PER_BUCKET {
            html.push_str(&format!(
                "<div class=\"muted\">+{} more</div>",
                urls.len() - URLS_PER_BUCKET
            ));
        }
        html.push_str("</details>\n");
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::model::Issue;
    use crate::output::summary::build_report;
    use chrono::Local;

    fn report(pages: Vec<PageResult>) -> CrawlReport {
        build_report("https://a.com/", Local::now(), pages, &CrawlerConfig::default())
    }

    #[test]
    fn test_empty_report_renders() {
        let html = render_html_report(&report(Vec::new()));
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("No pages"));
        assert!(html.contains("https://a.com/"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let page = PageResult {
            url: "https://a.com/?q=\"x\"".to_string(),
            title: Some("<script>alert(1)</script>".to_string()),
            status_code: Some(200),
            issues: vec![Issue::MissingH1],
            ..PageResult::default()
        };
        let html = render_html_report(&report(vec![page]));

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("missing_h1"));
    }

    #[test]
    fn test_duplicate_buckets_collapse() {
        let mut buckets = DuplicateBuckets::new();
        buckets.insert(
            "Buy now".to_string(),
            (0..25).map(|i| format!("https://a.com/{}", i)).collect(),
        );
        let html = duplicate_section("Duplicate titles", &buckets);

        assert!(html.contains("25 pages"));
        assert!(html.contains("https://a.com/19"));
        assert!(!html.contains("https://a.com/20\""));
        assert!(html.contains("+5 more"));
    }

    #[test]
    fn test_count_table_limit() {
        let rows: Vec<(String, usize)> = (0..40).map(|i| (format!("f{}", i), 1)).collect();
        let html = count_table("Finding", &rows, TOP_FINDINGS);
        assert_eq!(html.matches("<tr><td").count(), 30);
    }
}
