use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// The seed must be an absolute http(s) URL with a host
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            seed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_seed_url() {
        assert!(validate_seed_url("https://example.com/").is_ok());
        assert!(validate_seed_url("http://example.com:8080/shop").is_ok());

        assert!(validate_seed_url("").is_err());
        assert!(validate_seed_url("   ").is_err());
        assert!(validate_seed_url("not a url").is_err());
        assert!(validate_seed_url("ftp://example.com/").is_err());
    }

    #[test]
    fn test_default_config_needs_seed() {
        let config = Config::default();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        let config = Config::for_seed("https://example.com/");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = Config::for_seed("https://example.com/");
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::for_seed("https://example.com/");
        config.crawler.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let mut config = Config::for_seed("https://example.com/");
        config.output.output_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
