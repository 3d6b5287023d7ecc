//! Artifact sinks
//!
//! The crawl and the report writer hand finished artifacts (page snapshots,
//! JSON and HTML reports) to an [`ArtifactSink`] as a name plus bytes, so
//! neither depends on where they end up.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for named artifacts
pub trait ArtifactSink: Send + Sync {
    /// Stores `contents` under `name`, returning where it was written
    fn write_artifact(&self, name: &str, contents: &[u8]) -> OutputResult<PathBuf>;
}

/// Writes artifacts as files in one directory, created on first write
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for FsArtifactSink {
    fn write_artifact(&self, name: &str, contents: &[u8]) -> OutputResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Snapshot file name for a page URL
///
/// `<host>_<path>_<hash>.html`: path separators become `_`, anything outside
/// `[A-Za-z0-9._-]` becomes `_`, the root path is `home`, and the first ten
/// hex digits of the URL's SHA-256 keep names unique.
pub fn snapshot_file_name(url: &str) -> String {
    let parsed = Url::parse(url).ok();
    let host = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or("site");
    let path = parsed.as_ref().map(|u| u.path()).unwrap_or("/");

    let base = match path.trim_matches('/') {
        "" => "home".to_string(),
        trimmed => trimmed
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    };
    let base = base.trim_matches('.');
    let base = if base.is_empty() { "page" } else { base };

    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("{}_{}_{}.html", host, base, &digest[..10])
}
