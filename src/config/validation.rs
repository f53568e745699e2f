use crate::config::types::{Config, CrawlConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_redirects < 1 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be >= 1, got {}",
            config.max_redirects
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.runs_dir.is_empty() {
        return Err(ConfigError::Validation(
            "runs_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_max_redirects_rejected() {
        let mut config = Config::default();
        config.crawler.max_redirects = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_concurrent_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_max_concurrent_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 1000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let mut config = Config::default();
        config.crawler.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_runs_dir_rejected() {
        let mut config = Config::default();
        config.output.runs_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
