use std::sync::Arc;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use crate::controller::AppState;
use crate::repositories::directory_repo::RestaurantDirectoryRepo;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(app_state.directory_repo))
}

/// Liveness probe, also reports how many restaurants are being served
async fn get_health_check(
    Extension(directory_repo): Extension<Arc<RestaurantDirectoryRepo>>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "restaurants": directory_repo.len(),
    }))
}
