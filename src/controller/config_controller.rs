use axum::routing::get;
use axum::{Extension, Json, Router};
use crate::config::PublicRuntimeConfig;
use crate::controller::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/config", get(retrieve_public_config))
        .route_layer(Extension(app_state.public_config))
}

pub async fn retrieve_public_config(
    Extension(public_config): Extension<PublicRuntimeConfig>,
) -> Json<PublicRuntimeConfig> {
    Json(public_config)
}
