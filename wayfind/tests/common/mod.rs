#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use wayfind::models::{Place, PlaceList, Post, SearchContext, User};
use wayfind::storage::{CandidateRepository, InMemoryRepository, SearchFilters, StorageError};

pub fn me() -> User {
    User::new("u-me", "Alex Park", "alexp")
}

pub fn sara() -> User {
    User::new("u-sara", "Sara Chen", "sarac").with_follower_count(120)
}

pub fn cozy_places() -> Vec<Place> {
    vec![
        Place::builder("Blue Bottle Coffee")
            .id("p-blue")
            .category("cafe")
            .tags(["coffee", "cozy"])
            .saved_count(45)
            .build(),
        Place::builder("Tartine Bakery")
            .id("p-tartine")
            .category("bakery")
            .tags(["bakery", "cozy"])
            .saved_count(67)
            .build(),
        Place::builder("La Taqueria")
            .id("p-taqueria")
            .category("restaurant")
            .tags(["tacos"])
            .saved_count(89)
            .build(),
    ]
}

pub fn coffee_lists() -> Vec<PlaceList> {
    vec![
        PlaceList::new("l-stranger", "Coffee Spots", "u-stranger")
            .with_tags(["coffee"])
            .with_places(["p-blue"])
            .with_likes(300),
        PlaceList::new("l-sara", "Morning coffee", "u-sara")
            .with_tags(["coffee"])
            .with_places(["p-blue"])
            .with_likes(12),
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post::new("po-1", "u-sara", "Best cortado in town")
            .about_place("p-blue", "Blue Bottle Coffee")
            .with_tags(["coffee"])
            .with_likes(8),
    ]
}

pub fn users() -> Vec<User> {
    vec![me(), sara(), User::new("u-stranger", "Jordan Lee", "jlee")]
}

pub fn repository() -> InMemoryRepository {
    InMemoryRepository::with_data(cozy_places(), coffee_lists(), users(), posts())
}

pub fn context() -> SearchContext {
    SearchContext::for_user(me()).with_friends(vec![sara()])
}

/// Wraps a repository and fails the posts pool
#[derive(Debug, Clone)]
pub struct FailingPosts(pub InMemoryRepository);

#[async_trait]
impl CandidateRepository for FailingPosts {
    async fn places(&self, filters: &SearchFilters) -> Result<Vec<Place>, StorageError> {
        self.0.places(filters).await
    }

    async fn lists(&self, filters: &SearchFilters) -> Result<Vec<PlaceList>, StorageError> {
        self.0.lists(filters).await
    }

    async fn users(&self, filters: &SearchFilters) -> Result<Vec<User>, StorageError> {
        self.0.users(filters).await
    }

    async fn posts(&self, _filters: &SearchFilters) -> Result<Vec<Post>, StorageError> {
        Err(StorageError::Connection("posts service unreachable".into()))
    }

    async fn health_check(&self) -> Result<bool, StorageError> {
        Err(StorageError::Unavailable("posts service unreachable".into()))
    }
}

/// Wraps a repository and delays the places pool
#[derive(Debug, Clone)]
pub struct SlowPlaces(pub InMemoryRepository, pub Duration);

#[async_trait]
impl CandidateRepository for SlowPlaces {
    async fn places(&self, filters: &SearchFilters) -> Result<Vec<Place>, StorageError> {
        tokio::time::sleep(self.1).await;
        self.0.places(filters).await
    }

    async fn lists(&self, filters: &SearchFilters) -> Result<Vec<PlaceList>, StorageError> {
        self.0.lists(filters).await
    }

    async fn users(&self, filters: &SearchFilters) -> Result<Vec<User>, StorageError> {
        self.0.users(filters).await
    }

    async fn posts(&self, filters: &SearchFilters) -> Result<Vec<Post>, StorageError> {
        self.0.posts(filters).await
    }
}

pub fn shared<R: CandidateRepository>(repository: R) -> Arc<dyn CandidateRepository> {
    Arc::new(repository)
}
