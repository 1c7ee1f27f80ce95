//! Restaurant directory backend: the listing contract shared with the map
//! front end, and the service that serves it.

pub mod config;
pub mod controller;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod pagination;
pub mod repositories;

pub use models::restaurant::{Location, Restaurant};
pub use models::restaurant_response::RestaurantResponse;
