//! Trait definitions for candidate retrieval

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{Place, PlaceList, Post, User};
use crate::storage::errors::StorageError;
use crate::storage::filters::SearchFilters;

/// Supplies the candidate pools for one call
///
/// Implementations may pre-filter, cache or page however they like; the
/// engine re-applies `filters` to whatever comes back. Each pool is fetched
/// independently, so one failing pool never hides the others.
#[async_trait]
pub trait CandidateRepository: Send + Sync + Debug + 'static {
    /// Places matching the filters
    async fn places(&self, filters: &SearchFilters) -> std::result::Result<Vec<Place>, StorageError>;

    /// Lists matching the filters
    async fn lists(&self, filters: &SearchFilters) -> std::result::Result<Vec<PlaceList>, StorageError>;

    /// Users matching the filters
    async fn users(&self, filters: &SearchFilters) -> std::result::Result<Vec<User>, StorageError>;

    /// Posts matching the filters
    async fn posts(&self, filters: &SearchFilters) -> std::result::Result<Vec<Post>, StorageError>;

    /// Check if the repository is healthy and available
    async fn health_check(&self) -> std::result::Result<bool, StorageError> {
        Ok(true)
    }
}
