//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::Path;
use std::time::Duration;

/// Builder for creating EngineConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: EngineConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Replace the ranking configuration wholesale.
    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.config.ranking = ranking;
        self
    }

    /// Replace the base scorer weights.
    pub fn with_weights(mut self, weights: ScorerWeights) -> Self {
        self.config.ranking.weights = weights;
        self
    }

    /// Set the minimum score an item needs to be returned.
    pub fn with_score_floor(mut self, floor: f64) -> Self {
        self.config.ranking.score_floor = floor;
        self
    }

    /// Set the default per-type result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.ranking.max_results = max_results;
        self
    }

    /// Replace the per-scorer settings.
    pub fn with_scorer_settings(mut self, scorers: ScorerSettings) -> Self {
        self.config.scorers = scorers;
        self
    }

    /// Set the distance over which location scores decay.
    pub fn with_location_decay_km(mut self, decay_km: f64) -> Self {
        self.config.scorers.location.decay_km = decay_km;
        self
    }

    /// Set the number of discovery recommendations attached to a search.
    pub fn with_discovery_count(mut self, count: usize) -> Self {
        self.config.discovery.default_count = count;
        self
    }

    /// Set the default time budget for a search.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.config.search.default_timeout = Some(timeout);
        self
    }

    /// Run searches without a default time budget.
    pub fn without_timeout(mut self) -> Self {
        self.config.search.default_timeout = None;
        self
    }

    /// Attach discovery results to searches unless the caller says otherwise.
    pub fn with_discovery_by_default(mut self) -> Self {
        self.config.search.include_discovery = true;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Configuration for local development: debug logging, no time budget.
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
            .without_timeout()
    }

    /// Configuration for automated tests: quiet logging, short budget.
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_default_timeout(Duration::from_secs(1))
    }

    /// Configuration for production: JSON logs at info level.
    pub fn production() -> Self {
        Self::new()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Weights tilted toward the caller's network.
    pub fn social_focused() -> Self {
        Self::new().with_ranking(RankingConfig::social_focused())
    }

    /// Weights tilted toward proximity.
    pub fn nearby_focused() -> Self {
        Self::new().with_ranking(RankingConfig::nearby_focused())
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<EngineConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
