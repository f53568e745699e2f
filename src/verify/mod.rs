//! Seed URL admission checks
//!
//! Before a crawl starts, the raw seed URL goes through a multi-stage
//! admission gate: syntactic checks (shape and scheme), security checks
//! (dangerous schemes, localhost and private networks), and semantic checks
//! (DNS resolution, reserved domains). Robots.txt is probed advisorily and
//! only logged.
//!
//! The gate is expressed as a capability trait so tests can substitute a
//! permissive implementation.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Reasons a seed URL can be rejected by the admission gate
#[derive(Debug, Clone, Error)]
pub enum SeedRejection {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL cannot have leading or trailing whitespace")]
    SurroundingWhitespace,

    #[error("URL must start with http:// or https://")]
    BadScheme,

    #[error("URL parsing failed: {0}")]
    Unparseable(String),

    #[error("URL must have a valid domain")]
    MissingHost,

    #[error("invalid domain name: {0}")]
    InvalidDomain(String),

    #[error("DNS resolution failed for {0}")]
    DnsFailure(String),

    #[error("reserved domain: {0}")]
    ReservedDomain(String),

    #[error("private or loopback address: {0}")]
    PrivateAddress(String),
}

/// Admission gate applied once to the raw seed URL before crawling
#[async_trait]
pub trait SeedGate: Send + Sync {
    async fn verify(&self, url: &str) -> Result<(), SeedRejection>;
}

/// The standard admission gate: syntactic, security, and semantic checks
/// plus an advisory robots.txt probe.
pub struct StandardGate {
    client: reqwest::Client,
}

impl StandardGate {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { client })
    }

    /// Probes /robots.txt for the seed's origin and logs the result.
    ///
    /// Robots directives are advisory here: the outcome never blocks the
    /// crawl.
    async fn robots_advisory(&self, url: &Url) {
        let robots_url = match url.join("/robots.txt") {
            Ok(u) => u,
            Err(_) => return,
        };

        match self.client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("robots.txt found at {} (advisory only)", robots_url);
            }
            Ok(response) => {
                tracing::debug!(
                    "robots.txt at {} returned HTTP {}",
                    robots_url,
                    response.status()
                );
            }
            Err(e) => {
                tracing::debug!("robots.txt not accessible at {}: {}", robots_url, e);
            }
        }
    }
}

#[async_trait]
impl SeedGate for StandardGate {
    async fn verify(&self, url: &str) -> Result<(), SeedRejection> {
        let parsed = syntactic_checks(url)?;
        security_checks(&parsed)?;
        semantic_checks(&parsed).await?;
        self.robots_advisory(&parsed).await;
        Ok(())
    }
}

/// A gate that admits every seed; used in tests and for trusted seeds
/// (for example local mock servers that the standard gate would reject).
pub struct AllowAll;

#[async_trait]
impl SeedGate for AllowAll {
    async fn verify(&self, _url: &str) -> Result<(), SeedRejection> {
        Ok(())
    }
}

/// Validates URL shape: non-empty, trimmed, http(s), parseable, with a host
fn syntactic_checks(url: &str) -> Result<Url, SeedRejection> {
    if url.is_empty() || url.trim().is_empty() {
        return Err(SeedRejection::Empty);
    }

    if url != url.trim() {
        return Err(SeedRejection::SurroundingWhitespace);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SeedRejection::BadScheme);
    }

    let parsed = Url::parse(url).map_err(|e| SeedRejection::Unparseable(e.to_string()))?;

    let host = parsed.host_str().ok_or(SeedRejection::MissingHost)?;

    if host.parse::<IpAddr>().is_err() && !is_valid_domain_name(host) {
        return Err(SeedRejection::InvalidDomain(host.to_string()));
    }

    Ok(parsed)
}

/// Rejects localhost patterns and private network addresses
fn security_checks(url: &Url) -> Result<(), SeedRejection> {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return Err(SeedRejection::MissingHost),
    };

    if host == "localhost" || host.ends_with(".localhost") {
        return Err(SeedRejection::PrivateAddress(host));
    }

    // IPv6 hosts parse with brackets stripped by the url crate
    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(SeedRejection::PrivateAddress(host));
        }
    }

    Ok(())
}

/// Checks DNS resolution and reserved domain suffixes
async fn semantic_checks(url: &Url) -> Result<(), SeedRejection> {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return Err(SeedRejection::MissingHost),
    };

    const RESERVED_SUFFIXES: &[&str] = &[".invalid", ".example", ".test", ".localhost"];
    for suffix in RESERVED_SUFFIXES {
        if host.ends_with(suffix) {
            return Err(SeedRejection::ReservedDomain(host));
        }
    }

    // Literal IPs were already screened by the security checks
    if host.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    tokio::net::lookup_host((host.as_str(), 80))
        .await
        .map_err(|_| SeedRejection::DnsFailure(host.clone()))?;

    Ok(())
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_unspecified() || v4.is_link_local()
        }
        IpAddr::V6(v6) => {
            // fc00::/7 is the unique-local range
            v6.is_loopback() || v6.is_unspecified() || (v6.segments()[0] & 0xfe00) == 0xfc00
        }
    }
}

/// Validates domain name structure: label lengths, characters, placement
/// of dots and hyphens
fn is_valid_domain_name(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}
