//! Security assessment types
//!
//! Findings are typed so that scoring and category accounting live next to
//! the finding itself. They serialize to their stable code strings, with the
//! count appended for parameterized findings (`mixed_content:3`).

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// OWASP Top 10 (2021) categories the heuristics map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OwaspCategory {
    #[serde(rename = "A02_Cryptographic_Failures")]
    A02,
    #[serde(rename = "A05_Security_Misconfiguration")]
    A05,
    #[serde(rename = "A07_Identification_and_Authentication_Failures")]
    A07,
    #[serde(rename = "A08_Software_and_Data_Integrity_Failures")]
    A08,
}

impl OwaspCategory {
    pub const ALL: [OwaspCategory; 4] = [Self::A02, Self::A05, Self::A07, Self::A08];

    pub fn label(&self) -> &'static str {
        match self {
            Self::A02 => "A02_Cryptographic_Failures",
            Self::A05 => "A05_Security_Misconfiguration",
            Self::A07 => "A07_Identification_and_Authentication_Failures",
            Self::A08 => "A08_Software_and_Data_Integrity_Failures",
        }
    }

    /// A hit map with every category present at zero
    pub fn empty_hits() -> BTreeMap<OwaspCategory, u32> {
        Self::ALL.iter().map(|c| (*c, 0)).collect()
    }
}

/// A heuristic security observation about one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finding {
    NonHttps,
    MissingHsts,
    MissingCsp,
    MissingClickjackingProtection,
    MissingXContentTypeOptions,
    MissingReferrerPolicy,
    MissingPermissionsPolicy,
    CorsWildcard,
    ServerHeaderPresent,
    XPoweredByPresent,
    InsecureCookies(usize),
    MixedContent(usize),
    InsecurePasswordFormAction(usize),
    ExternalScriptMissingSri(usize),
}

impl Finding {
    /// Code without the count parameter
    pub fn code(&self) -> &'static str {
        match self {
            Self::NonHttps => "non_https",
            Self::MissingHsts => "missing_hsts",
            Self::MissingCsp => "missing_csp",
            Self::MissingClickjackingProtection => "missing_clickjacking_protection",
            Self::MissingXContentTypeOptions => "missing_x_content_type_options",
            Self::MissingReferrerPolicy => "missing_referrer_policy",
            Self::MissingPermissionsPolicy => "missing_permissions_policy",
            Self::CorsWildcard => "cors_wildcard",
            Self::ServerHeaderPresent => "server_header_present",
            Self::XPoweredByPresent => "x_powered_by_present",
            Self::InsecureCookies(_) => "insecure_cookies",
            Self::MixedContent(_) => "mixed_content",
            Self::InsecurePasswordFormAction(_) => "insecure_password_form_action",
            Self::ExternalScriptMissingSri(_) => "external_script_missing_sri",
        }
    }

    /// Points subtracted from the page score
    pub fn deduction(&self) -> u32 {
        match *self {
            Self::NonHttps => 20,
            Self::MissingHsts => 10,
            Self::MissingCsp => 10,
            Self::MissingClickjackingProtection => 5,
            Self::MissingXContentTypeOptions => 5,
            Self::MissingReferrerPolicy => 3,
            Self::MissingPermissionsPolicy => 3,
            Self::CorsWildcard => 5,
            Self::ServerHeaderPresent => 2,
            Self::XPoweredByPresent => 2,
            Self::MixedContent(n) => capped(n, 2, 10),
            Self::InsecureCookies(n) => capped(n, 5, 10),
            Self::InsecurePasswordFormAction(n) => capped(n, 10, 10),
            Self::ExternalScriptMissingSri(n) => capped(n, 3, 6),
        }
    }

    /// Categories this finding counts towards
    pub fn categories(&self) -> &'static [OwaspCategory] {
        match self {
            Self::NonHttps | Self::MissingHsts | Self::MixedContent(_) => &[OwaspCategory::A02],
            Self::InsecureCookies(_) => &[OwaspCategory::A07, OwaspCategory::A02],
            Self::InsecurePasswordFormAction(_) => &[OwaspCategory::A07],
            Self::ExternalScriptMissingSri(_) => &[OwaspCategory::A08],
            _ => &[OwaspCategory::A05],
        }
    }
}

fn capped(count: usize, per_item: u32, cap: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_item)
        .min(cap)
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsecureCookies(n)
            | Self::MixedContent(n)
            | Self::InsecurePasswordFormAction(n)
            | Self::ExternalScriptMissingSri(n) => write!(f, "{}:{}", self.code(), n),
            _ => f.write_str(self.code()),
        }
    }
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Letter grade derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Raw observations the findings were derived from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecuritySignals {
    pub https: bool,
    pub hsts: bool,
    pub csp: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub referrer_policy: bool,
    pub permissions_policy: bool,
    pub cors_wildcard: bool,
    pub mixed_content_count: usize,
    pub insecure_cookie_count: usize,
    pub insecure_password_form_count: usize,
    pub external_script_missing_sri_count: usize,
}

/// Security verdict for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityAssessment {
    /// 0..=100
    pub score: u32,
    pub grade: Grade,
    pub findings: Vec<Finding>,
    #[serde(rename = "owasp_top10_hits")]
    pub category_hits: BTreeMap<OwaspCategory, u32>,
    pub signals: SecuritySignals,
}

impl SecurityAssessment {
    /// Scores a finding list: 100 minus every deduction, clamped to 0..=100
    pub fn from_findings(findings: Vec<Finding>, signals: SecuritySignals) -> Self {
        let mut category_hits = OwaspCategory::empty_hits();
        for finding in &findings {
            for category in finding.categories() {
                *category_hits.entry(*category).or_insert(0) += 1;
            }
        }

        let deducted: u32 = findings.iter().map(Finding::deduction).sum();
        let score = 100u32.saturating_sub(deducted);

        Self {
            score,
            grade: Grade::from_score(score),
            findings,
            category_hits,
            signals,
        }
    }

    pub fn hits(&self, category: OwaspCategory) -> u32 {
        self.category_hits.get(&category).copied().unwrap_or(0)
    }

    pub fn has_finding(&self, code: &str) -> bool {
        self.findings.iter().any(|f| f.code() == code)
    }
}
