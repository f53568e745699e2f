use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Webtrail
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
///
/// Read-only for the duration of a crawl.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Delay applied before each request dispatch, per worker slot (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum number of redirect hops to follow per URL
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent", default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where timestamped crawl reports are written
    #[serde(rename = "runs-dir", default = "default_runs_dir")]
    pub runs_dir: String,
}

fn default_delay_ms() -> u64 {
    100
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_concurrent() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; Webtrail/0.1; +https://example.com/bot)".to_string()
}

fn default_runs_dir() -> String {
    "crawling_runs".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_redirects: default_max_redirects(),
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            runs_dir: default_runs_dir(),
        }
    }
}

impl CrawlConfig {
    /// Politeness delay as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.delay_ms, 100);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.user_agent.contains("Webtrail"));
    }

    #[test]
    fn test_delay_and_timeout_durations() {
        let config = CrawlConfig {
            delay_ms: 250,
            timeout_secs: 5,
            ..CrawlConfig::default()
        };
        assert_eq!(config.delay(), Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_default_runs_dir() {
        let config = OutputConfig::default();
        assert_eq!(config.runs_dir, "crawling_runs");
    }
}
