use std::collections::HashSet;
use std::path::Path;
use serde::Deserialize;
use tracing::{debug, info, warn};
use crate::errors::{ContractError, DirectoryError};
use crate::models::restaurant::Restaurant;
use crate::models::restaurant_response::RestaurantResponse;

const PAGE_TOKEN_PREFIX: &str = "pt_";

/// Filters and cursor for one listing request.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct ListingQuery {
    pub page_token: Option<String>,
    pub page_size: Option<usize>,
    pub cuisine: Option<String>,
    pub name: Option<String>,
}

/// Read-only restaurant directory held in memory for the lifetime of the server.
pub struct RestaurantDirectoryRepo {
    restaurants: Vec<Restaurant>,
    default_page_size: usize,
    max_page_size: usize,
}

impl RestaurantDirectoryRepo {
    pub fn new(
        restaurants: Vec<Restaurant>,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::with_capacity(restaurants.len());
        for (position, restaurant) in restaurants.iter().enumerate() {
            if restaurant.id.is_empty() {
                return Err(ContractError::EmptyId { position }.into());
            }
            if !seen.insert(restaurant.id.as_str()) {
                return Err(ContractError::DuplicateId(restaurant.id.clone()).into());
            }
            if !restaurant.location.is_within_bounds() {
                warn!(
                    id = %restaurant.id,
                    latitude = restaurant.location.latitude,
                    longitude = restaurant.location.longitude,
                    "Restaurant has out of range coordinates"
                );
            }
        }

        Ok(Self {
            restaurants,
            default_page_size,
            max_page_size,
        })
    }

    pub async fn load_from_file(
        path: impl AsRef<Path>,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let restaurants: Vec<Restaurant> =
            serde_json::from_str(&raw).map_err(ContractError::Malformed)?;

        info!("Loaded {} restaurants from {}", restaurants.len(), path.display());
        Self::new(restaurants, default_page_size, max_page_size)
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn retrieve_restaurant(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| restaurant.id == id)
    }

    pub fn search_for_restaurants(
        &self,
        restaurant_name: &str,
        page_token: Option<String>,
        page_size: Option<usize>,
    ) -> Result<RestaurantResponse, DirectoryError> {
        self.list_page(&ListingQuery {
            page_token,
            page_size,
            cuisine: None,
            name: Some(restaurant_name.to_string()),
        })
    }

    pub fn list_page(&self, query: &ListingQuery) -> Result<RestaurantResponse, DirectoryError> {
        let page_size = self.resolve_page_size(query.page_size)?;
        let name = query.name.as_deref().map(str::to_lowercase);
        let cuisine = query.cuisine.as_deref().map(|c| c.trim().to_lowercase());

        let matching: Vec<&Restaurant> = self
            .restaurants
            .iter()
            .filter(|restaurant| match &name {
                Some(name) => restaurant.name.to_lowercase().contains(name.as_str()),
                None => true,
            })
            .filter(|restaurant| match &cuisine {
                Some(cuisine) => restaurant.cuisine.trim().to_lowercase() == *cuisine,
                None => true,
            })
            .collect();

        let total = matching.len();
        let offset = match query.page_token.as_deref() {
            Some(token) => decode_page_token(token, total)?,
            None => 0,
        };
        let end = offset.saturating_add(page_size).min(total);
        let next_page_token = if end < total {
            Some(encode_page_token(end))
        } else {
            None
        };

        debug!(
            offset,
            end,
            total,
            has_next_page = next_page_token.is_some(),
            "Serving restaurant page"
        );

        let data = matching[offset..end].iter().map(|r| (*r).clone()).collect();
        Ok(RestaurantResponse::ok(data, total as u64, next_page_token))
    }

    fn resolve_page_size(&self, requested: Option<usize>) -> Result<usize, DirectoryError> {
        match requested {
            None => Ok(self.default_page_size),
            Some(size) if size >= 1 && size <= self.max_page_size => Ok(size),
            Some(size) => Err(DirectoryError::InvalidPageSize {
                requested: size,
                max: self.max_page_size,
            }),
        }
    }
}

fn encode_page_token(offset: usize) -> String {
    format!("{}{:x}", PAGE_TOKEN_PREFIX, offset)
}

/// Tokens only ever point at an existing item; anything else is stale or forged.
fn decode_page_token(token: &str, total: usize) -> Result<usize, DirectoryError> {
    let offset = token
        .strip_prefix(PAGE_TOKEN_PREFIX)
        .and_then(|hex| usize::from_str_radix(hex, 16).ok())
        .ok_or_else(|| DirectoryError::InvalidPageToken(token.to_string()))?;

    if offset == 0 || offset >= total {
        return Err(DirectoryError::InvalidPageToken(token.to_string()));
    }
    Ok(offset)
}
