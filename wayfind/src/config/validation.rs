//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    config
        .ranking
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("ranking: {}", e)))?;

    config
        .scorers
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("scorers: {}", e)))?;

    validate_discovery_config(&config.discovery)?;
    validate_search_defaults(&config.search)?;

    Ok(())
}

fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.default_count == 0 {
        return Err(ConfigError::ValidationError(
            "discovery.default_count must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_search_defaults(config: &SearchDefaults) -> Result<(), ConfigError> {
    if let Some(timeout) = config.default_timeout {
        if timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "search.default_timeout must be non-zero; omit it to disable the budget"
                    .to_string(),
            ));
        }
    }
    Ok(())
}
