//! HTTP fetcher implementation
//!
//! This module is the crawler's only contact with the network:
//! - Building the HTTP client with browser-like request headers
//! - GET requests with redirects followed and a per-request timeout
//! - Transparent gzip/brotli decoding, rejecting encodings left undecoded
//! - Error classification into [`FetchError`]
//!
//! Non-2xx responses are not errors here. They come back as a
//! [`FetchedPage`] and are reported through the page's issues.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_ENCODING};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Redirect hops followed before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Upper bound on the TCP/TLS connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// A successfully transferred response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Decoded body text
    pub body: String,
    /// URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers (multi-value aware)
    pub headers: HeaderMap,
}

/// Why a fetch produced no page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }

    fn from_body(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Body(e.to_string())
        }
    }
}

/// The fetch collaborator used by the coordinator
///
/// Implementations must hand back decoded text. The crawl awaits one fetch
/// at a time.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one URL
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the client from the configured timeout and request headers
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_send)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();

        // reqwest strips Content-Encoding once it has decoded the body
        if let Some(encoding) = headers.get(CONTENT_ENCODING).and_then(|v| v.to_str().ok()) {
            let encoding = encoding.trim();
            if !encoding.is_empty() && !encoding.eq_ignore_ascii_case("identity") {
                return Err(FetchError::UnsupportedEncoding(encoding.to_string()));
            }
        }

        let body = response.text().await.map_err(FetchError::from_body)?;

        Ok(FetchedPage {
            body,
            final_url,
            status,
            headers,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_audit::config::Config;
/// use site_audit::crawler::build_http_client;
///
/// let config = Config::for_seed("https://example.com/");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    if let Ok(language) = HeaderValue::from_str(&config.user_agent.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    let timeout = config.crawler.timeout();

    Client::builder()
        .user_agent(config.user_agent.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}
