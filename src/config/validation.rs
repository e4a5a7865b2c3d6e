use crate::config::types::{AggregatorConfig, Config, CostConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_aggregator_config(&config.aggregator)?;
    validate_cost_config(&config.cost)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher limits
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_download_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-download-bytes must be greater than zero".to_string(),
        ));
    }

    if config.max_decompressed_bytes < config.max_download_bytes {
        return Err(ConfigError::Validation(format!(
            "max-decompressed-bytes ({}) must be >= max-download-bytes ({})",
            config.max_decompressed_bytes, config.max_download_bytes
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates fan-out settings
fn validate_aggregator_config(config: &AggregatorConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }
    Ok(())
}

/// Validates pricing
fn validate_cost_config(config: &CostConfig) -> Result<(), ConfigError> {
    if !config.price_per_thousand_urls.is_finite() || config.price_per_thousand_urls < 0.0 {
        return Err(ConfigError::Validation(format!(
            "price-per-thousand-urls must be a non-negative number, got {}",
            config.price_per_thousand_urls
        )));
    }

    if !config.minimum_charge.is_finite() || config.minimum_charge < 0.0 {
        return Err(ConfigError::Validation(format!(
            "minimum-charge must be a non-negative number, got {}",
            config.minimum_charge
        )));
    }

    if config.currency.trim().is_empty() {
        return Err(ConfigError::Validation(
            "currency cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.list_urls && config.max_listed_urls == 0 {
        return Err(ConfigError::Validation(
            "max-listed-urls must be >= 1 when list-urls is enabled".to_string(),
        ));
    }
    Ok(())
}
