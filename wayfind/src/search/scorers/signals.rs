//! Context-derived signals computed once per call

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Candidate, Place, PlaceList, Post, SearchContext, User, normalize_tag};

/// Precomputed view of the caller's social graph and taste
///
/// Built once from the search context and the place/list pools so that
/// scorers do not rescan the context for every candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialSignals {
    /// Current user id, if known
    pub current_user_id: Option<String>,

    /// Tags of places and lists saved or liked by friends and followed users
    pub network_tags: BTreeSet<String>,

    /// Place/list ids saved or liked by the network, with who did it
    pub network_saves: BTreeMap<String, BTreeSet<String>>,

    /// Favorite categories, user tags and tags of the user's saved items
    pub interest_tags: BTreeSet<String>,

    /// Place ids the current user already saved
    pub saved_place_ids: BTreeSet<String>,

    /// List ids the current user already liked
    pub liked_list_ids: BTreeSet<String>,
}

impl SocialSignals {
    pub fn build(context: &SearchContext, places: &[Place], lists: &[PlaceList]) -> Self {
        let place_tags: BTreeMap<&str, BTreeSet<String>> = places
            .iter()
            .map(|p| (p.id.as_str(), Candidate::Place(p).tag_set()))
            .collect();
        let list_tags: BTreeMap<&str, BTreeSet<String>> = lists
            .iter()
            .map(|l| (l.id.as_str(), Candidate::List(l).tag_set()))
            .collect();

        let mut signals = SocialSignals {
            current_user_id: context.current_user_id().map(str::to_string),
            ..Default::default()
        };

        for (user, _) in context.known_users() {
            let saved = user.saved_place_ids.iter().filter_map(|id| place_tags.get_key_value(id.as_str()));
            let liked = user.liked_list_ids.iter().filter_map(|id| list_tags.get_key_value(id.as_str()));
            for (id, tags) in saved.chain(liked) {
                signals.network_tags.extend(tags.iter().cloned());
                signals
                    .network_saves
                    .entry(id.to_string())
                    .or_default()
                    .insert(user.id.clone());
            }
        }

        let history = &context.user_history;
        signals.saved_place_ids.extend(history.saved_places.iter().cloned());
        signals.liked_list_ids.extend(history.liked_lists.iter().cloned());

        if let Some(user) = &context.current_user {
            signals.saved_place_ids.extend(user.saved_place_ids.iter().cloned());
            signals.liked_list_ids.extend(user.liked_list_ids.iter().cloned());
            signals.interest_tags.extend(
                user.favorite_categories
                    .iter()
                    .chain(user.tags.iter())
                    .filter_map(|t| normalize_tag(t)),
            );
        }

        for id in &signals.saved_place_ids {
            if let Some(tags) = place_tags.get(id.as_str()) {
                signals.interest_tags.extend(tags.iter().cloned());
            }
        }
        for id in &signals.liked_list_ids {
            if let Some(tags) = list_tags.get(id.as_str()) {
                signals.interest_tags.extend(tags.iter().cloned());
            }
        }

        signals
    }

    /// Whether the current user owns, saved or liked this item
    pub fn already_has(&self, candidate: &Candidate<'_>) -> bool {
        if self
            .current_user_id
            .as_deref()
            .is_some_and(|id| !id.is_empty() && id == candidate.owner_id())
        {
            return true;
        }
        match candidate {
            Candidate::Place(p) => self.saved_place_ids.contains(&p.id),
            Candidate::List(l) => self.liked_list_ids.contains(&l.id),
            _ => false,
        }
    }
}

/// Every normalized tag and category that appears in the pools
pub fn tag_vocabulary(
    places: &[Place],
    lists: &[PlaceList],
    users: &[User],
    posts: &[Post],
) -> BTreeSet<String> {
    let mut vocabulary = BTreeSet::new();
    for p in places {
        vocabulary.extend(Candidate::Place(p).tag_set());
    }
    for l in lists {
        vocabulary.extend(Candidate::List(l).tag_set());
    }
    for u in users {
        vocabulary.extend(Candidate::User(u).tag_set());
    }
    for p in posts {
        vocabulary.extend(Candidate::Post(p).tag_set());
    }
    vocabulary
}
