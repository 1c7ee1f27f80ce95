pub mod restaurant;
pub mod restaurant_response;
