//! # Wayfind
//!
//! Search and discovery ranking for a social place-discovery app. Given a
//! free-text query and the caller's social context, wayfind ranks four kinds
//! of content (places, curated lists, people and posts) by blending text
//! relevance, social proximity, collaborative and content-based signals,
//! physical distance and popularity. Every result carries a score in
//! `[0, 100]`, human-readable reasons and a match category.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wayfind::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let repository = InMemoryRepository::new();
//! repository
//!     .add_place(Place::builder("Blue Bottle").category("cafe").tags(["coffee", "cozy"]).build())
//!     .await;
//!
//! let engine = SearchEngine::with_defaults(Arc::new(repository))?;
//! let me = User::new("u1", "Alex Park", "alexp");
//! let results = engine
//!     .search_intelligently(
//!         "cozy coffee",
//!         &SearchContext::for_user(me),
//!         &SearchFilters::default(),
//!         SearchOptions::default(),
//!     )
//!     .await;
//!
//! for place in &results.places {
//!     println!("{} {:.1} {:?}", place.item.name, place.score, place.reasons);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **search**: query interpretation, the six scorers and the ranker
//! - **discovery**: query-less recommendations built from the same scorers
//! - **storage**: the [`storage::CandidateRepository`] seam and an in-memory
//!   implementation
//! - **core**: the [`SearchEngine`] facade tying them together
//! - **telemetry**: degradation warnings and the analytics sink
//!
//! The search entry points never fail. Pools that cannot be fetched, scorers
//! that misbehave and exhausted time budgets degrade the result and are
//! reported in its analytics.

pub mod config;
pub mod core;
pub mod discovery;
pub mod logging;
pub mod models;
pub mod search;
pub mod storage;
pub mod telemetry;

pub use crate::core::SearchEngine;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::core::SearchEngine;

    pub use crate::config::{ConfigBuilder, ConfigLoader, EngineConfig, LogLevel};

    pub use crate::models::{
        DiscoveryItem, GeoPoint, ItemKind, Place, PlaceList, Post, SearchContext, User,
        UserHistory,
    };

    pub use crate::search::{
        AlgorithmFlags, CancellationFlag, IntelligentSearchResult, IntentLabel, MatchCategory,
        ScoredItem, SearchOptions,
    };

    pub use crate::discovery::DiscoveryRecommendation;

    pub use crate::storage::{CandidateRepository, InMemoryRepository, SearchFilters, StorageError};

    pub use crate::telemetry::{EngineWarning, TelemetrySink};

    pub use crate::{Result, WayfindError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for wayfind operations
///
/// Only construction and configuration can fail; searches degrade instead.
#[derive(Debug, thiserror::Error)]
pub enum WayfindError {
    /// Error reported by a candidate repository
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),
}

impl From<crate::config::ConfigError> for WayfindError {
    fn from(err: crate::config::ConfigError) -> Self {
        WayfindError::Configuration(err.to_string())
    }
}

/// Result type for wayfind operations
pub type Result<T> = std::result::Result<T, WayfindError>;

/// Load configuration from the default files and the environment, install
/// logging and build an engine over `repository`
///
/// Keep the returned guard alive for as long as file logging should flush.
/// A logging subscriber installed earlier by the host application is left
/// in place.
pub fn init(
    repository: std::sync::Arc<dyn storage::CandidateRepository>,
) -> Result<(SearchEngine, logging::LoggingGuard)> {
    let config = config::ConfigLoader::new()
        .load_default_files()
        .load_env()
        .extract()?;

    let guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(logging::LogError::AlreadyInitialized) => logging::LoggingGuard::default(),
        Err(e) => return Err(e.into()),
    };

    Ok((SearchEngine::new(repository, config)?, guard))
}
