use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use restaurant_directory_backend::config::Config;
use restaurant_directory_backend::controller::{self, AppState};
use restaurant_directory_backend::repositories::directory_repo::RestaurantDirectoryRepo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;
    info!("Starting restaurant directory in {} mode", config.environment);

    let directory_repo = RestaurantDirectoryRepo::load_from_file(
        &config.restaurants_file,
        config.default_page_size,
        config.max_page_size,
    )
    .await
    .with_context(|| format!("Failed to load restaurants from {}", config.restaurants_file.display()))?;

    let app_state = AppState {
        directory_repo: Arc::new(directory_repo),
        public_config: config.public_runtime_config(),
    };

    controller::serve(app_state, &config).await
}
