use serde::{Deserialize, Serialize};

/// One place-of-business record as returned by the restaurant search API.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub cuisine: String,
    pub rating: f64,
    pub rating_count: u32,
    pub price_range: String,
    pub location: Location,
    /// Empty when the venue has no website.
    #[serde(default)]
    pub website_uri: String,
    #[serde(default)]
    pub google_maps_uri: String,
}

impl Restaurant {
    pub fn website(&self) -> Option<&str> {
        non_empty(&self.website_uri)
    }

    pub fn google_maps(&self) -> Option<&str> {
        non_empty(&self.google_maps_uri)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
