//! Webtrail: a single-domain web crawler with safe redirect handling
//!
//! This crate crawls a website starting from a seed URL, restricted to the
//! seed's domain, following HTTP redirects manually with loop detection and
//! deduplicating pages by canonical URL.

pub mod config;
pub mod crawler;
pub mod report;
pub mod url;
pub mod verify;

use thiserror::Error;

/// Main error type for Webtrail operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid base URL {url}: {reason}")]
    SeedInvalid {
        url: String,
        reason: verify::SeedRejection,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Webtrail operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig, OutputConfig};
pub use crawler::{CrawlResult, Crawler};
pub use url::{canonicalize, extract_domain};
pub use verify::{AllowAll, SeedGate, SeedRejection, StandardGate};
