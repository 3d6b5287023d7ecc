//! Configuration module for Site-Audit
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration is an explicit value handed to the crawler; there
//! is no module-level default state.
//!
//! # Example
//!
//! ```no_run
//! use site_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Crawling {} up to depth {}", config.crawler.seed_url, config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, parse_config, parse_config_file};
pub use validation::validate;
