//! Data model for audit results
//!
//! # Components
//!
//! - `PageResult` / `Issue`: what was observed on one page
//! - `SecurityAssessment` / `Finding`: the heuristic security verdict for a page
//! - `CrawlReport`: the immutable result of a whole run

mod page;
mod report;
mod security;

pub use page::{Issue, PageResult};
pub use report::{CrawlReport, DuplicateBuckets, SecuritySummary, Summary};
pub use security::{Finding, Grade, OwaspCategory, SecurityAssessment, SecuritySignals};
