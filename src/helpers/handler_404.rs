use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use tracing::debug;
use crate::errors::error_body;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri);
    error_body(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("Oops looks like you landed at the wrong endpoint: {}", uri.path()),
    )
}
