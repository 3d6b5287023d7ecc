//! Passive security heuristics
//!
//! Looks only at what a normal page load exposes: response headers, cookie
//! attributes, and resource references in the markup. Nothing is probed.

use super::dom;
use super::header_value;
use crate::model::{Finding, SecurityAssessment, SecuritySignals};
use crate::url::is_same_site;
use reqwest::header::{HeaderMap, SET_COOKIE};
use scraper::{Html, Selector};
use url::Url;

/// Runs every check against one page and scores the result
pub fn analyze_security(
    seed_url: &str,
    final_url: &str,
    document: &Html,
    headers: &HeaderMap,
) -> SecurityAssessment {
    let mut findings = Vec::new();

    let https = Url::parse(final_url)
        .map(|u| u.scheme() == "https")
        .unwrap_or(false);

    if !https {
        findings.push(Finding::NonHttps);
    }

    let hsts = header_value(headers, "strict-transport-security").is_some();
    if https && !hsts {
        findings.push(Finding::MissingHsts);
    }

    let csp = header_value(headers, "content-security-policy");
    if csp.is_none() {
        findings.push(Finding::MissingCsp);
    }

    let x_frame_options = header_value(headers, "x-frame-options").is_some();
    let frame_ancestors = csp.as_deref().is_some_and(has_frame_ancestors);
    if !x_frame_options && !frame_ancestors {
        findings.push(Finding::MissingClickjackingProtection);
    }

    let x_content_type_options = header_value(headers, "x-content-type-options")
        .is_some_and(|v| v.eq_ignore_ascii_case("nosniff"));
    if !x_content_type_options {
        findings.push(Finding::MissingXContentTypeOptions);
    }

    let referrer_policy = header_value(headers, "referrer-policy").is_some();
    if !referrer_policy {
        findings.push(Finding::MissingReferrerPolicy);
    }

    let permissions_policy = header_value(headers, "permissions-policy").is_some();
    if !permissions_policy {
        findings.push(Finding::MissingPermissionsPolicy);
    }

    let cors_wildcard = header_value(headers, "access-control-allow-origin").as_deref() == Some("*");
    if cors_wildcard {
        findings.push(Finding::CorsWildcard);
    }

    if header_value(headers, "server").is_some() {
        findings.push(Finding::ServerHeaderPresent);
    }

    if header_value(headers, "x-powered-by").is_some() {
        findings.push(Finding::XPoweredByPresent);
    }

    let insecure_cookie_count = set_cookie_values(headers)
        .iter()
        .filter(|cookie| !CookieFlags::parse(cookie).is_secure())
        .count();
    if insecure_cookie_count > 0 {
        findings.push(Finding::InsecureCookies(insecure_cookie_count));
    }

    let mixed_content_count = if https { count_mixed_content(document) } else { 0 };
    if mixed_content_count > 0 {
        findings.push(Finding::MixedContent(mixed_content_count));
    }

    let insecure_password_form_count = count_insecure_password_forms(document);
    if insecure_password_form_count > 0 {
        findings.push(Finding::InsecurePasswordFormAction(insecure_password_form_count));
    }

    let external_script_missing_sri_count = count_external_scripts_without_sri(document, seed_url);
    if external_script_missing_sri_count > 0 {
        findings.push(Finding::ExternalScriptMissingSri(external_script_missing_sri_count));
    }

    let signals = SecuritySignals {
        https,
        hsts,
        csp: csp.is_some(),
        x_frame_options,
        x_content_type_options,
        referrer_policy,
        permissions_policy,
        cors_wildcard,
        mixed_content_count,
        insecure_cookie_count,
        insecure_password_form_count,
        external_script_missing_sri_count,
    };

    SecurityAssessment::from_findings(findings, signals)
}

fn has_frame_ancestors(csp: &str) -> bool {
    csp.split(';')
        .map(|directive| directive.trim().to_ascii_lowercase())
        .any(|directive| directive.starts_with("frame-ancestors"))
}

/// Cookie attributes relevant to session hardening
#[derive(Debug, Default, PartialEq, Eq)]
struct CookieFlags {
    secure: bool,
    http_only: bool,
    same_site: bool,
}

impl CookieFlags {
    fn parse(set_cookie: &str) -> Self {
        let mut flags = Self::default();
        for attr in set_cookie.split(';').map(str::trim).filter(|a| !a.is_empty()) {
            let attr = attr.to_ascii_lowercase();
            match attr.as_str() {
                "secure" => flags.secure = true,
                "httponly" => flags.http_only = true,
                a if a.starts_with("samesite=") => flags.same_site = true,
                _ => {}
            }
        }
        flags
    }

    fn is_secure(&self) -> bool {
        self.secure && self.http_only && self.same_site
    }
}

/// Every `Set-Cookie` value of the response
///
/// Multiple header lines are taken as they are. A single line is split on
/// the commas that separate folded cookies, leaving `Expires=` dates intact.
fn set_cookie_values(headers: &HeaderMap) -> Vec<String> {
    let values: Vec<String> = headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if values.len() == 1 {
        return split_folded_cookies(&values[0]);
    }
    values
}

fn split_folded_cookies(value: &str) -> Vec<String> {
    let mut cookies: Vec<String> = Vec::new();

    for part in value.split(',') {
        match cookies.last_mut() {
            Some(current) if inside_expires(current) => {
                current.push(',');
                current.push_str(part);
            }
            _ => cookies.push(part.to_string()),
        }
    }

    cookies
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// True while the last attribute is an `Expires=` date missing its comma
fn inside_expires(cookie: &str) -> bool {
    let last_attr = cookie.rsplit(';').next().unwrap_or_default().trim();
    last_attr.to_ascii_lowercase().starts_with("expires=") && !last_attr.contains(',')
}

fn starts_with_http(value: &str) -> bool {
    value
        .trim()
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http://"))
}

/// Plain-http references from an https page
fn count_mixed_content(document: &Html) -> usize {
    [("a", "href"), ("link", "href"), ("img", "src"), ("script", "src")]
        .iter()
        .map(|(tag, attr)| dom::all_with_attr(document, tag, attr, starts_with_http).len())
        .sum()
}

/// Password forms that post to a plain-http action
fn count_insecure_password_forms(document: &Html) -> usize {
    let Ok(inputs) = Selector::parse("input") else {
        return 0;
    };

    dom::select_all(document, "form")
        .iter()
        .filter(|form| {
            form.select(&inputs).any(|input| {
                input
                    .value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("password"))
            })
        })
        .filter(|form| dom::attr_trimmed(form, "action").is_some_and(starts_with_http))
        .count()
}

/// Absolute off-site scripts loaded without an `integrity` hash
fn count_external_scripts_without_sri(document: &Html, seed_url: &str) -> usize {
    dom::select_all(document, "script[src]")
        .iter()
        .filter(|script| {
            let Some(src) = dom::attr_trimmed(script, "src") else {
                return false;
            };
            let external = Url::parse(src)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false)
                && !is_same_site(src, seed_url);
            external && dom::attr_trimmed(script, "integrity").is_none()
        })
        .count()
}
