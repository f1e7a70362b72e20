//! Place model and geographic helpers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mean Earth radius used by the haversine distance, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` using the haversine formula
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Whether both coordinates are finite and inside the valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A saved or discoverable place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Place {
    /// Unique identifier for the place
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Street address, if known
    pub address: Option<String>,

    /// Primary category (e.g. "cafe", "bakery")
    pub category: Option<String>,

    /// Tags attached by users
    pub tags: Vec<String>,

    /// Price bucket such as "$" or "$$$"
    pub price_range: Option<String>,

    /// Coordinates, if the place has been geocoded
    pub coordinates: Option<GeoPoint>,

    /// How many users saved this place
    pub saved_count: u64,

    /// User who added the place
    pub created_by: String,
}

impl Place {
    /// Create a new place with minimal information
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a builder for more complex place creation
    pub fn builder(name: impl Into<String>) -> PlaceBuilder {
        PlaceBuilder::new_with_name(name)
    }
}

/// Builder for creating Place instances
#[derive(Debug, Clone)]
pub struct PlaceBuilder {
    place: Place,
}

impl PlaceBuilder {
    /// Create a new place builder with a specified ID
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            place: Place::new(id, name),
        }
    }

    /// Create a new place builder with an auto-generated UUID
    pub fn new_with_name(name: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), name)
    }

    /// Override the identifier
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.place.id = id.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.place.description = description.into();
        self
    }

    /// Set the address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.place.address = Some(address.into());
        self
    }

    /// Set the primary category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.place.category = Some(category.into());
        self
    }

    /// Add a single tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.place.tags.push(tag.into());
        self
    }

    /// Add multiple tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.place.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the price bucket
    pub fn price_range(mut self, price_range: impl Into<String>) -> Self {
        self.place.price_range = Some(price_range.into());
        self
    }

    /// Set the coordinates
    pub fn coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.place.coordinates = Some(GeoPoint::new(lat, lng));
        self
    }

    /// Set the saved counter
    pub fn saved_count(mut self, saved_count: u64) -> Self {
        self.place.saved_count = saved_count;
        self
    }

    /// Set the user who added the place
    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.place.created_by = user_id.into();
        self
    }

    /// Build the place
    pub fn build(self) -> Place {
        self.place
    }
}
