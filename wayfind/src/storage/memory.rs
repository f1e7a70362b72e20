//! In-memory candidate repository for embedding, tests and demos

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Place, PlaceList, Post, User};
use crate::storage::errors::StorageError;
use crate::storage::filters::SearchFilters;
use crate::storage::traits::CandidateRepository;

#[derive(Debug, Default)]
struct Pools {
    places: Vec<Place>,
    lists: Vec<PlaceList>,
    users: Vec<User>,
    posts: Vec<Post>,
}

/// Keeps the four pools in memory and applies filters on read
///
/// Cloning shares the underlying data. The radius filter is skipped here
/// because the repository has no caller location; the engine applies it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    pools: Arc<RwLock<Pools>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from ready-made pools
    pub fn with_data(
        places: Vec<Place>,
        lists: Vec<PlaceList>,
        users: Vec<User>,
        posts: Vec<Post>,
    ) -> Self {
        Self {
            pools: Arc::new(RwLock::new(Pools {
                places,
                lists,
                users,
                posts,
            })),
        }
    }

    pub async fn add_place(&self, place: Place) {
        self.pools.write().await.places.push(place);
    }

    pub async fn add_list(&self, list: PlaceList) {
        self.pools.write().await.lists.push(list);
    }

    pub async fn add_user(&self, user: User) {
        self.pools.write().await.users.push(user);
    }

    pub async fn add_post(&self, post: Post) {
        self.pools.write().await.posts.push(post);
    }

    /// Remove everything
    pub async fn clear(&self) {
        *self.pools.write().await = Pools::default();
    }

    /// Total number of stored items
    pub async fn len(&self) -> usize {
        let pools = self.pools.read().await;
        pools.places.len() + pools.lists.len() + pools.users.len() + pools.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CandidateRepository for InMemoryRepository {
    async fn places(&self, filters: &SearchFilters) -> Result<Vec<Place>, StorageError> {
        let pools = self.pools.read().await;
        Ok(pools
            .places
            .iter()
            .filter(|p| filters.matches_place(p, None))
            .cloned()
            .collect())
    }

    async fn lists(&self, filters: &SearchFilters) -> Result<Vec<PlaceList>, StorageError> {
        let pools = self.pools.read().await;
        Ok(pools
            .lists
            .iter()
            .filter(|l| filters.matches_list(l))
            .cloned()
            .collect())
    }

    async fn users(&self, filters: &SearchFilters) -> Result<Vec<User>, StorageError> {
        let pools = self.pools.read().await;
        Ok(pools
            .users
            .iter()
            .filter(|u| filters.matches_user(u))
            .cloned()
            .collect())
    }

    async fn posts(&self, filters: &SearchFilters) -> Result<Vec<Post>, StorageError> {
        let pools = self.pools.read().await;
        Ok(pools
            .posts
            .iter()
            .filter(|p| filters.matches_post(p))
            .cloned()
            .collect())
    }
}
