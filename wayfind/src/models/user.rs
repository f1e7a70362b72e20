//! User and post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An application user, as seen by search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct User {
    /// Unique identifier
    pub id: String,

    /// Full display name, e.g. "Sara Chen"
    pub display_name: String,

    /// Handle without the leading '@'
    pub username: String,

    /// Profile bio
    pub bio: String,

    /// Categories the user declared as favorites
    pub favorite_categories: Vec<String>,

    /// Free-form interest tags
    pub tags: Vec<String>,

    /// Places this user saved
    pub saved_place_ids: Vec<String>,

    /// Lists this user liked
    pub liked_list_ids: Vec<String>,

    /// Number of followers
    pub follower_count: u64,
}

impl User {
    /// Create a new user
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Set favorite categories
    pub fn with_favorite_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set interest tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set saved places
    pub fn with_saved_places<I, S>(mut self, place_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.saved_place_ids = place_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set liked lists
    pub fn with_liked_lists<I, S>(mut self, list_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liked_list_ids = list_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the follower counter
    pub fn with_follower_count(mut self, follower_count: u64) -> Self {
        self.follower_count = follower_count;
        self
    }

    /// Lightweight reference to this user
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            username: self.username.clone(),
        }
    }

    /// Name to show in reasons, falling back to the handle
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Reference to a user detected in a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
    pub username: String,
}

impl UserRef {
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// A post about a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Post {
    /// Unique identifier
    pub id: String,

    /// Author's user ID
    pub author_id: String,

    /// Post body
    pub content: String,

    /// Place the post is about, if any
    pub place_id: Option<String>,

    /// Denormalized name of that place
    pub place_name: Option<String>,

    /// Tags on the post
    pub tags: Vec<String>,

    /// Like counter
    pub likes: u64,

    /// When the post was published
    pub created_at: DateTime<Utc>,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: String::new(),
            author_id: String::new(),
            content: String::new(),
            place_id: None,
            place_name: None,
            tags: Vec::new(),
            likes: 0,
            created_at: DateTime::<Utc>::default(),
        }
    }
}

impl Post {
    /// Create a new post
    pub fn new(id: impl Into<String>, author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            content: content.into(),
            created_at: Utc::now(),
            ..Default::default()
        }
    }

    /// Attach the post to a place
    pub fn about_place(mut self, place_id: impl Into<String>, place_name: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self.place_name = Some(place_name.into());
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

    /// Set the like counter
    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }
}
