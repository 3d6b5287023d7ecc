//! SEO issue rules
//!
//! Every rule inspects the extracted page independently and appends at most
//! one code per band, in a fixed order.

use crate::model::{Issue, PageResult};
use crate::url::{canonicalize, is_same_site};
use url::Url;

const TITLE_MIN: usize = 10;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 50;
const DESCRIPTION_MAX: usize = 160;
const THIN_CONTENT_CHARS: usize = 200;

/// Runs the rule set over a page
///
/// Returns the indexability verdict alongside the issue list. A page is
/// indexable when it answered 200 and carries no `noindex` directive.
pub fn evaluate(page: &PageResult, seed_url: &str) -> (bool, Vec<Issue>) {
    let mut issues = Vec::new();

    if let Some(status) = page.status_code.filter(|s| *s != 200) {
        issues.push(Issue::HttpStatus(status));
    }

    if let Some(content_type) = page.content_type.as_deref() {
        let content_type = content_type.to_ascii_lowercase();
        if !content_type.is_empty()
            && !content_type.contains("text/html")
            && !content_type.contains("application/xhtml+xml")
        {
            issues.push(Issue::NonHtmlContentType);
        }
    }

    band(
        page.title.as_deref(),
        (TITLE_MIN, TITLE_MAX),
        [Issue::MissingTitle, Issue::TitleTooShort, Issue::TitleTooLong],
        &mut issues,
    );

    band(
        page.meta_description.as_deref(),
        (DESCRIPTION_MIN, DESCRIPTION_MAX),
        [
            Issue::MissingMetaDescription,
            Issue::MetaDescriptionTooShort,
            Issue::MetaDescriptionTooLong,
        ],
        &mut issues,
    );

    match page.h1_tags.len() {
        0 => issues.push(Issue::MissingH1),
        1 => {}
        _ => issues.push(Issue::MultipleH1),
    }

    if let Some(issue) = canonical_issue(page, seed_url) {
        issues.push(issue);
    }

    let noindex = has_noindex(page);
    if noindex {
        issues.push(Issue::Noindex);
    }

    if page.text_content_length < THIN_CONTENT_CHARS {
        issues.push(Issue::ThinOrCsrContent);
    }

    let indexable = !noindex && page.status_code == Some(200);
    (indexable, issues)
}

/// Missing / too short / too long check on a trimmed text value
fn band(value: Option<&str>, (min, max): (usize, usize), codes: [Issue; 3], issues: &mut Vec<Issue>) {
    let [missing, too_short, too_long] = codes;
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        issues.push(missing);
        return;
    }

    let len = value.chars().count();
    if len < min {
        issues.push(too_short);
    }
    if len > max {
        issues.push(too_long);
    }
}

fn canonical_issue(page: &PageResult, seed_url: &str) -> Option<Issue> {
    let canonical = page.canonical_url.as_deref().map(str::trim).unwrap_or_default();
    if canonical.is_empty() {
        return Some(Issue::MissingCanonical);
    }

    let base = [page.final_url.as_str(), page.url.as_str(), seed_url]
        .into_iter()
        .find(|u| !u.is_empty())
        .unwrap_or(seed_url);

    let resolved = Url::parse(base)
        .and_then(|base| base.join(canonical))
        .ok()
        .and_then(|joined| canonicalize(joined.as_str(), false).ok());

    match resolved {
        None => Some(Issue::CanonicalInvalid),
        Some(url) if !is_same_site(url.as_str(), seed_url) => Some(Issue::CanonicalOffsite),
        Some(_) => None,
    }
}

fn has_noindex(page: &PageResult) -> bool {
    let robots = page.robots_meta.join(" ").to_lowercase();
    let header = page.x_robots_tag.as_deref().unwrap_or_default().to_lowercase();
    robots.contains("noindex") || header.contains("noindex")
}
