use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use crate::errors::ContractError;
use crate::models::restaurant::Restaurant;

pub const STATUS_OK: &str = "ok";

/// One page of a paginated restaurant listing.
///
/// `next_page_token` travels as `nextPageToken` and is omitted on the final page.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantResponse {
    pub data: Vec<Restaurant>,
    pub status: String,
    pub total_results: u64,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

impl RestaurantResponse {
    pub fn ok(data: Vec<Restaurant>, total_results: u64, next_page_token: Option<String>) -> Self {
        Self {
            data,
            status: STATUS_OK.to_string(),
            total_results,
            next_page_token,
        }
    }

    /// Parses a payload and checks it against the listing contract.
    pub fn from_json(payload: &str) -> Result<Self, ContractError> {
        let response: RestaurantResponse = serde_json::from_str(payload)?;
        response.validate()?;
        Ok(response)
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::with_capacity(self.data.len());
        for (position, restaurant) in self.data.iter().enumerate() {
            if restaurant.id.is_empty() {
                return Err(ContractError::EmptyId { position });
            }
            if !seen.insert(restaurant.id.as_str()) {
                return Err(ContractError::DuplicateId(restaurant.id.clone()));
            }
        }

        let returned = self.data.len() as u64;
        if self.total_results < returned {
            return Err(ContractError::TotalResultsBelowPage {
                total: self.total_results,
                returned,
            });
        }

        Ok(())
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }
}
