use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::errors::DirectoryError;
use crate::repositories::directory_repo::{ListingQuery, RestaurantDirectoryRepo};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_restaurants))
        .route("/search", get(search_restaurants_by_name))
        .route("/:id", get(retrieve_restaurant))
        .route_layer(Extension(app_state.directory_repo))
}

pub async fn list_restaurants(
    Extension(directory_repo): Extension<Arc<RestaurantDirectoryRepo>>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return reject_query(rejection),
    };

    match directory_repo.list_page(&query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            warn!("Something went wrong listing restaurants due to: {}", e);
            e.into_response()
        }
    }
}

pub async fn retrieve_restaurant(
    Extension(directory_repo): Extension<Arc<RestaurantDirectoryRepo>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match directory_repo.retrieve_restaurant(&id) {
        Some(restaurant) => (StatusCode::OK, Json(restaurant.clone())).into_response(),
        None => {
            warn!("Restaurant with id: {} was requested but does not exist", id);
            DirectoryError::NotFound(id).into_response()
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchRestaurantParam {
    pub restaurant_name: String,
    pub page_token: Option<String>,
    pub page_size: Option<usize>,
}

pub async fn search_restaurants_by_name(
    Extension(directory_repo): Extension<Arc<RestaurantDirectoryRepo>>,
    query: Result<Query<SearchRestaurantParam>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return reject_query(rejection),
    };

    let restaurants_res = directory_repo.search_for_restaurants(
        &query.restaurant_name,
        query.page_token,
        query.page_size,
    );

    match restaurants_res {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            e.into_response()
        }
    }
}

fn reject_query(rejection: QueryRejection) -> Response {
    warn!("Rejected restaurant query string due to: {}", rejection.body_text());
    DirectoryError::InvalidQuery(rejection.body_text()).into_response()
}
