//! Per-call search context supplied by the data layer

use serde::{Deserialize, Serialize};

use super::place::GeoPoint;
use super::user::User;

/// Activity history of the current user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct UserHistory {
    /// Previous search queries, most recent last
    pub searches: Vec<String>,

    /// IDs of places the user saved
    pub saved_places: Vec<String>,

    /// IDs of lists the user liked
    pub liked_lists: Vec<String>,

    /// IDs of places the user visited
    pub visited_places: Vec<String>,
}

/// Everything the engine knows about the caller for one invocation
///
/// The context is read-only: scorers and the ranker only ever borrow it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SearchContext {
    /// The signed-in user, if the session provider supplied one
    pub current_user: Option<User>,

    /// Mutual connections
    pub friends: Vec<User>,

    /// Users the current user follows
    pub following: Vec<User>,

    /// Activity history
    pub user_history: UserHistory,

    /// Current device location
    pub location: Option<GeoPoint>,
}

/// Relationship between the current user and another user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Friend,
    Following,
}

impl SearchContext {
    /// Create a context for the given user
    pub fn for_user(user: User) -> Self {
        Self {
            current_user: Some(user),
            ..Default::default()
        }
    }

    /// Set friends
    pub fn with_friends(mut self, friends: Vec<User>) -> Self {
        self.friends = friends;
        self
    }

    /// Set followed users
    pub fn with_following(mut self, following: Vec<User>) -> Self {
        self.following = following;
        self
    }

    /// Set the current location
    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint::new(lat, lng));
        self
    }

    /// Set the history
    pub fn with_history(mut self, history: UserHistory) -> Self {
        self.user_history = history;
        self
    }

    /// ID of the current user, if any
    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.id.as_str())
    }

    /// Friends first, then followed users, with their relation
    ///
    /// A user that is both a friend and followed is only yielded once, as a friend.
    pub fn known_users(&self) -> impl Iterator<Item = (&User, Relation)> {
        let friends = self.friends.iter().map(|u| (u, Relation::Friend));
        let following = self
            .following
            .iter()
            .filter(|u| !self.friends.iter().any(|f| f.id == u.id))
            .map(|u| (u, Relation::Following));
        friends.chain(following)
    }

    /// Look up how the current user relates to `user_id`
    pub fn relation_to(&self, user_id: &str) -> Option<(&User, Relation)> {
        if user_id.is_empty() {
            return None;
        }
        self.known_users().find(|(u, _)| u.id == user_id)
    }
}
