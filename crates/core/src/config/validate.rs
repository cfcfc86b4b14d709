use super::{types::Config, ConfigError};

/// Largest page the search API accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Validate configuration
/// Currently validates:
/// - Page size within 1..=100
/// - Search URL is set
/// - Query vocabulary is not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.fetch.page_size == 0 || config.fetch.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "fetch.page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    if config.naver.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "naver.url cannot be empty".to_string(),
        ));
    }

    if config.collector.food_word.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "collector.food_word cannot be empty".to_string(),
        ));
    }

    if config.collector.category_query.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "collector.category_query cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let mut config = Config::default();
        config.fetch.page_size = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.fetch.page_size = 101;
        assert!(validate_config(&config).is_err());

        config.fetch.page_size = 100;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_blank_food_word_fails() {
        let mut config = Config::default();
        config.collector.food_word = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("food_word"));
    }
}
