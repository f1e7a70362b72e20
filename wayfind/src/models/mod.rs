//! Domain models for places, lists, users, posts and the search context

pub mod context;
pub mod item;
pub mod list;
pub mod place;
pub mod user;

// Re-export important models
pub use context::{Relation, SearchContext, UserHistory};
pub use item::{Candidate, DiscoveryItem, ItemKind, Rankable, normalize_tag};
pub use list::PlaceList;
pub use place::{GeoPoint, Place, PlaceBuilder};
pub use user::{Post, User, UserRef};
