//! Output module for audit artifacts
//!
//! This module handles:
//! - Aggregating page results into the run report
//! - Writing the JSON and HTML reports and per-page HTML snapshots
//! - Converting the HTML report to PDF with a headless browser
//!
//! Every write here is best-effort from the crawl's point of view: failures
//! are logged and the in-memory report stays valid.

mod html;
mod pdf;
mod sink;
mod summary;

pub use html::render_html_report;
pub use pdf::{find_browser, PdfRenderer, BROWSER_ENV};
pub use sink::{snapshot_file_name, ArtifactSink, FsArtifactSink, OutputError, OutputResult};
pub use summary::{build_report, duplicates, ranked, TIMESTAMP_ID_FORMAT};

use crate::config::OutputConfig;
use crate::model::CrawlReport;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths of the artifacts that were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub json: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
}

/// Directory receiving the HTML snapshots of one run
pub fn snapshot_dir(output_dir: &Path, timestamp_id: &str) -> PathBuf {
    output_dir.join("html").join(timestamp_id)
}

/// Base file name (no extension) of a run's reports
pub fn report_stem(timestamp_id: &str) -> String {
    format!("seo_audit_{}", timestamp_id)
}

/// Serializes the report as pretty-printed JSON
pub fn write_json_report(report: &CrawlReport, sink: &dyn ArtifactSink) -> OutputResult<PathBuf> {
    let json = serde_json::to_vec_pretty(report)?;
    sink.write_artifact(&format!("{}.json", report_stem(&report.timestamp_id)), &json)
}

/// Renders and writes the HTML report
pub fn write_html_report(report: &CrawlReport, sink: &dyn ArtifactSink) -> OutputResult<PathBuf> {
    let html = render_html_report(report);
    sink.write_artifact(
        &format!("{}.html", report_stem(&report.timestamp_id)),
        html.as_bytes(),
    )
}

/// Writes every report artifact for a finished run
///
/// JSON, then HTML, then (if enabled and the HTML was written) PDF. Each
/// failure is logged and skipped.
pub async fn publish_report(report: &CrawlReport, config: &OutputConfig) -> ReportArtifacts {
    let sink = FsArtifactSink::new(&config.output_dir);
    let mut artifacts = ReportArtifacts::default();

    match write_json_report(report, &sink) {
        Ok(path) => {
            info!("JSON report: {}", path.display());
            artifacts.json = Some(path);
        }
        Err(e) => warn!("Failed to write JSON report: {}", e),
    }

    match write_html_report(report, &sink) {
        Ok(path) => {
            info!("HTML report: {}", path.display());
            artifacts.html = Some(path);
        }
        Err(e) => warn!("Failed to write HTML report: {}", e),
    }

    if config.render_pdf {
        if let Some(html_path) = &artifacts.html {
            let pdf_path = html_path.with_extension("pdf");
            match render_pdf(config, html_path, &pdf_path).await {
                Ok(()) => artifacts.pdf = Some(pdf_path),
                Err(e) => warn!(
                    "PDF not generated ({}); print {} from a browser instead",
                    e,
                    html_path.display()
                ),
            }
        }
    }

    artifacts
}

async fn render_pdf(config: &OutputConfig, html_path: &Path, pdf_path: &Path) -> OutputResult<()> {
    let renderer = PdfRenderer::locate(config.browser_path.as_deref())?;
    renderer.render(html_path, pdf_path).await
}
