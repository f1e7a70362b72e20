//! Engine configuration.
//!
//! [`EngineConfig`] is assembled from compiled-in defaults, then the first
//! matching file in [`DEFAULT_CONFIG_FILES`] and the per-user config
//! directory, then `WAYFIND_*` environment variables. [`ConfigBuilder`] builds
//! one in code. Both paths end in [`validate_config`].

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;
pub use validation::validate_config;

/// Files probed in the working directory, in order
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "wayfind.toml",
    "wayfind.yaml",
    "wayfind.yml",
    "wayfind.json",
    ".wayfind/config.toml",
    ".wayfind/config.yaml",
    ".wayfind/config.yml",
    ".wayfind/config.json",
];

/// Prefix for environment overrides
///
/// Nested keys use a double underscore, e.g. `WAYFIND_RANKING__SCORE_FLOOR=10`.
pub const ENV_PREFIX: &str = "WAYFIND_";

/// Why a configuration could not be produced
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration file is missing or has an unsupported extension
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// The merged sources could not be deserialized
    #[error("Configuration parsing error: {0}")]
    ParseError(String),

    /// The values are out of range
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
