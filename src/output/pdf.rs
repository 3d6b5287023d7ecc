//! PDF rendering through a headless Chromium-family browser
//!
//! The HTML report is printed to PDF by an external browser process. This is
//! a last-mile convenience: every failure is an [`OutputError::Render`] and
//! the HTML/JSON artifacts stay authoritative.

use crate::output::sink::{OutputError, OutputResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

/// Environment variable naming the browser binary
pub const BROWSER_ENV: &str = "SITE_AUDIT_BROWSER";

/// Upper bound on one browser run
const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Binary names searched for on `PATH`, in order
const BROWSER_NAMES: &[&str] = &[
    "msedge",
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Renders HTML files to PDF with a located browser
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    browser: PathBuf,
    timeout: Duration,
}

impl PdfRenderer {
    /// Uses the given browser binary
    pub fn new(browser: impl Into<PathBuf>) -> Self {
        Self {
            browser: browser.into(),
            timeout: RENDER_TIMEOUT,
        }
    }

    /// Finds a browser, preferring an explicitly configured path
    pub fn locate(configured: Option<&str>) -> OutputResult<Self> {
        find_browser(configured)
            .map(Self::new)
            .ok_or_else(|| OutputError::Render("no Chromium-family browser found".to_string()))
    }

    pub fn browser(&self) -> &Path {
        &self.browser
    }

    /// Prints `html_path` to `pdf_path`
    pub async fn render(&self, html_path: &Path, pdf_path: &Path) -> OutputResult<()> {
        let html_path = std::path::absolute(html_path)?;
        let pdf_path = std::path::absolute(pdf_path)?;
        let file_url = Url::from_file_path(&html_path)
            .map_err(|_| OutputError::Render(format!("not a file path: {}", html_path.display())))?;

        debug!("Rendering {} with {}", file_url, self.browser.display());

        let mut command = Command::new(&self.browser);
        command
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(file_url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(OutputError::Render(format!(
                    "browser timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(500).collect();
            return Err(OutputError::Render(format!(
                "browser exited with {}: {}",
                output.status, stderr
            )));
        }

        let written = tokio::fs::metadata(&pdf_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(OutputError::Render(format!(
                "browser produced no output at {}",
                pdf_path.display()
            )));
        }

        info!("PDF written to {}", pdf_path.display());
        Ok(())
    }
}

/// Locates a Chromium-family browser binary
///
/// Order: the configured path, then `SITE_AUDIT_BROWSER`, then well-known
/// names on `PATH`, then platform install locations.
pub fn find_browser(configured: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = configured.map(str::trim).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        warn!("Configured browser does not exist: {}", path.display());
    }

    if let Ok(path) = std::env::var(BROWSER_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            info!("Using browser from {}: {}", BROWSER_ENV, path.display());
            return Some(path);
        }
        warn!("{} points to a missing file: {}", BROWSER_ENV, path.display());
    }

    if let Some(path) = search_path(BROWSER_NAMES) {
        return Some(path);
    }

    platform_paths().into_iter().find(|p| p.is_file())
}

fn search_path(names: &[&str]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();

    names.iter().find_map(|name| {
        dirs.iter().find_map(|dir| {
            let candidate = dir.join(executable_name(name));
            candidate.is_file().then_some(candidate)
        })
    })
}

fn executable_name(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

fn platform_paths() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        let program_files =
            std::env::var("ProgramFiles").unwrap_or_else(|_| r"C:\Program Files".to_string());
        let program_files_x86 = std::env::var("ProgramFiles(x86)")
            .unwrap_or_else(|_| r"C:\Program Files (x86)".to_string());

        [&program_files, &program_files_x86]
            .iter()
            .flat_map(|root| {
                [
                    Path::new(root).join(r"Microsoft\Edge\Application\msedge.exe"),
                    Path::new(root).join(r"Google\Chrome\Application\chrome.exe"),
                ]
            })
            .collect()
    } else if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
            PathBuf::from("/opt/google/chrome/chrome"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configured_browser_wins() {
        let temp = TempDir::new().unwrap();
        let browser = temp.path().join("my-browser");
        std::fs::write(&browser, b"").unwrap();

        let found = find_browser(Some(browser.to_str().unwrap()));
        assert_eq!(found, Some(browser));
    }

    #[test]
    fn test_search_path_misses_unknown_names() {
        assert_eq!(search_path(&["definitely-not-a-browser-binary"]), None);
    }

    #[tokio::test]
    async fn test_missing_browser_is_render_error() {
        let temp = TempDir::new().unwrap();
        let html = temp.path().join("report.html");
        std::fs::write(&html, "<p>x</p>").unwrap();

        let renderer = PdfRenderer::new(temp.path().join("no-such-browser"));
        let result = renderer.render(&html, &temp.path().join("report.pdf")).await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_browser_is_render_error() {
        let temp = TempDir::new().unwrap();
        let html = temp.path().join("report.html");
        std::fs::write(&html, "<p>x</p>").unwrap();

        let renderer = PdfRenderer::new("false");
        let result = renderer.render(&html, &temp.path().join("report.pdf")).await;
        assert!(matches!(result, Err(OutputError::Render(_))));
    }
}
