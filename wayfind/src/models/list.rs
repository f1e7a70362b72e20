//! Curated place lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-curated collection of places
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaceList {
    /// Unique identifier for the list
    pub id: String,

    /// List title
    pub name: String,

    /// Free-text description
    pub description: String,

    /// User who owns the list
    pub owner_id: String,

    /// Tags describing the list
    pub tags: Vec<String>,

    /// Places in the list, by ID
    pub place_ids: Vec<String>,

    /// How many users liked the list
    pub likes: u64,

    /// Whether the list is visible to other users
    pub is_public: bool,

    /// When the list was created
    pub created_at: DateTime<Utc>,
}

impl Default for PlaceList {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            owner_id: String::new(),
            tags: Vec::new(),
            place_ids: Vec::new(),
            likes: 0,
            is_public: true,
            created_at: DateTime::<Utc>::default(),
        }
    }
}

impl PlaceList {
    /// Create a new list owned by `owner_id`
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the places
    pub fn with_places<I, S>(mut self, place_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.place_ids = place_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the like counter
    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }
}
