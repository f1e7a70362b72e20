//! Candidate filters

use serde::{Deserialize, Serialize};

use crate::models::{Candidate, GeoPoint, Place, PlaceList, Post, User, normalize_tag};

/// Caller-supplied restrictions on the candidate pools
///
/// Place filters (category, price range, address, radius) only restrict the
/// place pool. Required tags restrict places, lists and posts. Users are
/// never filtered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SearchFilters {
    /// Place category, case-insensitive; matched against list tags too
    pub category: Option<String>,

    /// Exact price range, e.g. "$$"
    pub price_range: Option<String>,

    /// Substring of the place address, case-insensitive
    pub location: Option<String>,

    /// Maximum distance from the caller's location
    pub radius_km: Option<f64>,

    /// Tags every matching item must carry
    pub tags: Vec<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = Some(price_range.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether no restriction is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn has_required_tags(&self, candidate: &Candidate<'_>) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        let tags = candidate.tag_set();
        self.tags
            .iter()
            .filter_map(|t| normalize_tag(t))
            .all(|t| tags.contains(&t))
    }

    /// Whether `place` passes; `center` enables the radius check
    pub fn matches_place(&self, place: &Place, center: Option<GeoPoint>) -> bool {
        if let Some(category) = &self.category {
            let matches = place
                .category
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(category.trim()));
            if !matches {
                return false;
            }
        }

        if let Some(price) = &self.price_range {
            if place.price_range.as_deref().map(str::trim) != Some(price.trim()) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            let needle = location.trim().to_lowercase();
            let matches = place
                .address
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&needle));
            if !needle.is_empty() && !matches {
                return false;
            }
        }

        if let (Some(radius), Some(center)) = (self.radius_km, center) {
            match place.coordinates {
                Some(point) if point.distance_km(&center) <= radius => {}
                _ => return false,
            }
        }

        self.has_required_tags(&Candidate::Place(place))
    }

    pub fn matches_list(&self, list: &PlaceList) -> bool {
        let candidate = Candidate::List(list);
        if let Some(category) = self.category.as_deref().and_then(normalize_tag) {
            if !candidate.tag_set().contains(&category) {
                return false;
            }
        }
        self.has_required_tags(&candidate)
    }

    pub fn matches_user(&self, _user: &User) -> bool {
        true
    }

    pub fn matches_post(&self, post: &Post) -> bool {
        self.has_required_tags(&Candidate::Post(post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> Place {
        Place::builder("Blue Bottle Coffee")
            .category("Cafe")
            .price_range("$$")
            .address("66 Mint St, San Francisco")
            .tags(["coffee", "cozy"])
            .coordinates(37.7825, -122.4074)
            .build()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches_place(&place(), None));
        assert!(filters.matches_list(&PlaceList::new("l1", "x", "u1")));
    }

    #[test]
    fn test_place_filters() {
        let p = place();
        assert!(SearchFilters::new().with_category("cafe").matches_place(&p, None));
        assert!(!SearchFilters::new().with_category("bar").matches_place(&p, None));
        assert!(SearchFilters::new().with_price_range("$$").matches_place(&p, None));
        assert!(!SearchFilters::new().with_price_range("$").matches_place(&p, None));
        assert!(SearchFilters::new().with_location("mint st").matches_place(&p, None));
        assert!(!SearchFilters::new().with_location("oakland").matches_place(&p, None));
        assert!(SearchFilters::new().with_tags(["#Coffee"]).matches_place(&p, None));
        assert!(!SearchFilters::new().with_tags(["coffee", "tacos"]).matches_place(&p, None));
    }

    #[test]
    fn test_radius_needs_center() {
        let p = place();
        let filters = SearchFilters::new().with_radius_km(2.0);
        assert!(filters.matches_place(&p, None));
        assert!(filters.matches_place(&p, Some(GeoPoint::new(37.7749, -122.4194))));
        assert!(!filters.matches_place(&p, Some(GeoPoint::new(37.8716, -122.2727))));
        assert!(!filters.matches_place(&Place::new("p2", "No coords"), Some(GeoPoint::new(37.7749, -122.4194))));
    }

    #[test]
    fn test_list_category_uses_tags() {
        let list = PlaceList::new("l1", "Cafes", "u1").with_tags(["cafe"]);
        assert!(SearchFilters::new().with_category("Cafe").matches_list(&list));
        assert!(!SearchFilters::new().with_category("bar").matches_list(&list));
    }
}
