//! Configuration model definitions.
//!
//! This module contains the configuration structures for all wayfind components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use crate::search::scoring::{
    IntentWeighting, LexicalSettings, LocationSettings, RankingConfig, ScorerSettings,
    ScorerWeights, SocialSettings, TrendingSettings,
};

/// Main configuration structure for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Weights, intent reweighting, score floor and result cap
    pub ranking: RankingConfig,

    /// Per-scorer tuning
    pub scorers: ScorerSettings,

    /// Discovery recommendations
    pub discovery: DiscoveryConfig,

    /// Defaults applied to every search call
    pub search: SearchDefaults,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for discovery recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Number of recommendations attached to a search with discovery enabled
    pub default_count: usize,

    /// Queries with fewer characters than this count as "short" and get
    /// discovery results when requested
    pub short_query_len: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_count: 10,
            short_query_len: 3,
        }
    }
}

/// Defaults for search calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchDefaults {
    /// Time budget used when the caller supplies none
    #[serde(with = "humantime_serde")]
    pub default_timeout: Option<Duration>,

    /// Whether discovery is attached when the caller does not say
    pub include_discovery: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            default_timeout: Some(Duration::from_secs(5)),
            include_discovery: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable development format with timestamps
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}
