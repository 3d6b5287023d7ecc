use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Audit
///
/// Every key has a default, so an empty file (or no file at all) yields a
/// usable configuration once a seed URL is supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a default configuration crawling the given seed
    pub fn for_seed(seed_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.crawler.seed_url = seed_url.into();
        config
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Single seed URL; only pages on the same site are crawled
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Hard ceiling on fetch attempts (successful and failed)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the seed (seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Pause between requests (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep query strings as part of a page's identity
    #[serde(rename = "keep-query", default)]
    pub keep_query: bool,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            keep_query: false,
        }
    }
}

/// Request identification headers
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Value of the User-Agent header
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Value of the Accept-Language header
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving reports and HTML snapshots
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// Save the raw HTML of crawled pages
    #[serde(rename = "save-html", default = "default_true")]
    pub save_html: bool,

    /// Only the first N pages get an HTML snapshot
    #[serde(rename = "save-html-limit", default = "default_save_html_limit")]
    pub save_html_limit: usize,

    /// Convert the HTML report to PDF with a headless browser
    #[serde(rename = "render-pdf", default = "default_true")]
    pub render_pdf: bool,

    /// Explicit browser binary for PDF rendering
    #[serde(rename = "browser-path", default)]
    pub browser_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            save_html: true,
            save_html_limit: default_save_html_limit(),
            render_pdf: true,
            browser_path: None,
        }
    }
}

fn default_max_pages() -> usize {
    60
}

fn default_max_depth() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_output_dir() -> String {
    "data".to_string()
}

fn default_save_html_limit() -> usize {
    60
}

fn default_true() -> bool {
    true
}
