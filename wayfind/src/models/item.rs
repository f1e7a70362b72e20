//! Uniform, borrowed view over the four candidate domains

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::list::PlaceList;
use super::place::{GeoPoint, Place};
use super::user::{Post, User};

/// The four candidate pools
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Place,
    List,
    User,
    Post,
}

impl ItemKind {
    /// All kinds, in result order
    pub const ALL: [ItemKind; 4] = [ItemKind::Place, ItemKind::List, ItemKind::User, ItemKind::Post];

    /// Pool name used in analytics
    pub fn pool_name(self) -> &'static str {
        match self {
            Self::Place => "places",
            Self::List => "lists",
            Self::User => "users",
            Self::Post => "posts",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place => write!(f, "place"),
            Self::List => write!(f, "list"),
            Self::User => write!(f, "user"),
            Self::Post => write!(f, "post"),
        }
    }
}

/// Borrowed view of one candidate, used by every scorer
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    Place(&'a Place),
    List(&'a PlaceList),
    User(&'a User),
    Post(&'a Post),
}

impl<'a> Candidate<'a> {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Place(_) => ItemKind::Place,
            Self::List(_) => ItemKind::List,
            Self::User(_) => ItemKind::User,
            Self::Post(_) => ItemKind::Post,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Self::Place(p) => &p.id,
            Self::List(l) => &l.id,
            Self::User(u) => &u.id,
            Self::Post(p) => &p.id,
        }
    }

    /// Primary display text (place/list name, user display name, post's place)
    pub fn name(&self) -> &'a str {
        match self {
            Self::Place(p) => &p.name,
            Self::List(l) => &l.name,
            Self::User(u) => &u.display_name,
            Self::Post(p) => p.place_name.as_deref().unwrap_or(""),
        }
    }

    /// Secondary names matched alongside [`Candidate::name`]
    pub fn alt_name(&self) -> Option<&'a str> {
        match self {
            Self::User(u) if !u.username.is_empty() => Some(&u.username),
            _ => None,
        }
    }

    pub fn description(&self) -> &'a str {
        match self {
            Self::Place(p) => &p.description,
            Self::List(l) => &l.description,
            Self::User(u) => &u.bio,
            Self::Post(p) => &p.content,
        }
    }

    pub fn address(&self) -> Option<&'a str> {
        match self {
            Self::Place(p) => p.address.as_deref(),
            _ => None,
        }
    }

    /// Lowercased, deduplicated tag set
    ///
    /// Places contribute their category, users their favorite categories.
    pub fn tag_set(&self) -> BTreeSet<String> {
        let raw: Box<dyn Iterator<Item = &String> + '_> = match self {
            Self::Place(p) => Box::new(p.tags.iter().chain(p.category.iter())),
            Self::List(l) => Box::new(l.tags.iter()),
            Self::User(u) => Box::new(u.tags.iter().chain(u.favorite_categories.iter())),
            Self::Post(p) => Box::new(p.tags.iter()),
        };
        raw.filter_map(|t| normalize_tag(t)).collect()
    }

    /// The user who owns or authored the item; a user owns itself
    pub fn owner_id(&self) -> &'a str {
        match self {
            Self::Place(p) => &p.created_by,
            Self::List(l) => &l.owner_id,
            Self::User(u) => &u.id,
            Self::Post(p) => &p.author_id,
        }
    }

    /// Popularity counter used for trending and tie-breaks
    pub fn popularity(&self) -> u64 {
        match self {
            Self::Place(p) => p.saved_count,
            Self::List(l) => l.likes,
            Self::User(u) => u.follower_count,
            Self::Post(p) => p.likes,
        }
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        match self {
            Self::Place(p) => p.coordinates,
            _ => None,
        }
    }
}

/// Normalize a tag for comparison; empty tags are discarded
pub fn normalize_tag(tag: &str) -> Option<String> {
    let normalized = tag.trim().trim_start_matches('#').trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Anything the ranker can score
pub trait Rankable: Clone + Send + Sync + 'static {
    /// Pool this type belongs to
    const KIND: ItemKind;

    fn candidate(&self) -> Candidate<'_>;
}

impl Rankable for Place {
    const KIND: ItemKind = ItemKind::Place;

    fn candidate(&self) -> Candidate<'_> {
        Candidate::Place(self)
    }
}

impl Rankable for PlaceList {
    const KIND: ItemKind = ItemKind::List;

    fn candidate(&self) -> Candidate<'_> {
        Candidate::List(self)
    }
}

impl Rankable for User {
    const KIND: ItemKind = ItemKind::User;

    fn candidate(&self) -> Candidate<'_> {
        Candidate::User(self)
    }
}

impl Rankable for Post {
    const KIND: ItemKind = ItemKind::Post;

    fn candidate(&self) -> Candidate<'_> {
        Candidate::Post(self)
    }
}

/// A discovery recommendation target: either a place or a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscoveryItem {
    Place(Place),
    List(PlaceList),
}

impl DiscoveryItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Place(_) => ItemKind::Place,
            Self::List(_) => ItemKind::List,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Place(p) => &p.id,
            Self::List(l) => &l.id,
        }
    }

    pub fn popularity(&self) -> u64 {
        match self {
            Self::Place(p) => p.saved_count,
            Self::List(l) => l.likes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_tag_set_includes_category() {
        let place = Place::builder("Tartine")
            .tags(["Bakery", " cozy ", "#Pastry", ""])
            .category("Bakery")
            .build();
        let tags: Vec<_> = Candidate::Place(&place).tag_set().into_iter().collect();
        assert_eq!(tags, vec!["bakery", "cozy", "pastry"]);
    }

    #[test]
    fn test_user_owns_itself() {
        let user = User::new("u1", "Sara Chen", "sarac");
        assert_eq!(Candidate::User(&user).owner_id(), "u1");
        assert_eq!(Candidate::User(&user).alt_name(), Some("sarac"));
    }

    #[test]
    fn test_discovery_item_serializes_tagged() {
        let item = DiscoveryItem::List(PlaceList::new("l1", "Brunch", "u1"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "list");
        assert_eq!(json["value"]["id"], "l1");
    }
}
