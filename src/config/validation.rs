use crate::config::types::{Config, CrawlerConfig, OutputConfig, TopicConfig, UserAgentConfig};
use crate::url::normalize_url;
use crate::ConfigError;
use url::Url;

const MAX_WORKERS: usize = 200;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_topic_config(&config.topic)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    normalize_url(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed '{}': {}", config.seed, e)))?;

    if config.target_count < 1 {
        return Err(ConfigError::Validation(
            "target_count must be >= 1".to_string(),
        ));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.robots_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "robots_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.idle_backoff_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "idle_backoff_ms must be >= 10ms, got {}ms",
            config.idle_backoff_ms
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    if let Some(scope) = &config.link_scope {
        if scope.trim().is_empty() || scope.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "link_scope must be a single element id, got '{}'",
                scope
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    // The name doubles as the robots.txt product token
    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.index_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "index_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_topic_config(config: &TopicConfig) -> Result<(), ConfigError> {
    if !config.keywords.is_empty() && config.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "topic keywords must not all be blank".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MatchMode;

    fn sample_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                seed: "https://example.com/".to_string(),
                target_count: 10,
                workers: 4,
                time_limit_secs: 0,
                page_timeout_secs: 10,
                robots_timeout_secs: 2,
                idle_backoff_ms: 500,
                progress_interval: 100,
                link_scope: None,
            },
            user_agent: UserAgentConfig {
                crawler_name: "SumiIndex".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/bot".to_string(),
                contact_email: "bot@example.com".to_string(),
            },
            output: OutputConfig {
                index_path: "index.db".to_string(),
                export_interval_secs: 0,
            },
            topic: TopicConfig::default(),
        }
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(validate(&sample_config()).is_ok());
    }

    #[test]
    fn test_seed_must_be_http() {
        let mut config = sample_config();
        config.crawler.seed = "ftp://example.com/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.crawler.seed = "/relative/path".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = sample_config();
        config.crawler.workers = 0;
        assert!(validate(&config).is_err());

        config.crawler.workers = MAX_WORKERS + 1;
        assert!(validate(&config).is_err());

        config.crawler.workers = MAX_WORKERS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = sample_config();
        config.crawler.target_count = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_link_scope_must_be_an_id() {
        let mut config = sample_config();
        config.crawler.link_scope = Some("content".to_string());
        assert!(validate(&config).is_ok());

        config.crawler.link_scope = Some("".to_string());
        assert!(validate(&config).is_err());

        config.crawler.link_scope = Some("main content".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_characters() {
        let mut config = sample_config();
        config.user_agent.crawler_name = "Sumi Index".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "Sumi-Index".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_blank_topic_rejected() {
        let mut config = sample_config();
        config.topic = TopicConfig {
            keywords: vec!["  ".to_string()],
            mode: MatchMode::All,
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }
}
