//! Configuration module for Webtrail
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webtrail::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Max concurrent requests: {}", config.crawler.max_concurrent);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig};

// Re-export parser and validation functions
pub use parser::load_config;
pub use validation::validate;
