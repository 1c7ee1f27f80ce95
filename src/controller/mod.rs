use std::sync::Arc;
use anyhow::Context;
use axum::{middleware, Router};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::info;
use crate::config::{Config, PublicRuntimeConfig};
use crate::helpers::handler_404::page_not_found_handler;
use crate::helpers::host_guard::{guard_dev_host, HostAllowList};
use crate::repositories::directory_repo::RestaurantDirectoryRepo;

pub mod config_controller;
pub mod health_check;
pub mod restaurant_controller;

#[derive(Clone)]
pub struct AppState {
    pub directory_repo: Arc<RestaurantDirectoryRepo>,
    pub public_config: PublicRuntimeConfig,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let application = build_application(app_state, config)?;

    let address = config.socket_addr();
    info!("API server listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn build_application(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<Router> {
    let origins = config.cors_origins()?;
    let api_prefix = config.api_prefix()?;

    let mut application = router_endpoints(app_state, &api_prefix)
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::OPTIONS])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
        );

    if config.is_development() {
        let allow_list = Arc::new(HostAllowList::new(config.dev_hosts()));
        info!("Development mode, accepting hosts: localhost + {:?}", config.dev_hosts());
        application = application.layer(middleware::from_fn_with_state(allow_list, guard_dev_host));
    }

    Ok(application)
}

pub fn router_endpoints(app_state: AppState, api_prefix: &str) -> Router {
    let api = Router::new()
        .nest("/restaurants", restaurant_controller::router(app_state.clone()))
        .merge(config_controller::router(app_state.clone()));

    let router = health_check::router(app_state);
    if api_prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(api_prefix, api)
    }
}
