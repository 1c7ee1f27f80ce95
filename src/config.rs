use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use anyhow::{bail, Context};
use axum::http::HeaderValue;
use clap::Parser;
use reqwest::Url;
use serde::Serialize;
use serde_with::skip_serializing_none;

pub const DEVELOPMENT: &str = "development";
pub const PAGE_SIZE_LIMIT: usize = 1000;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = DEVELOPMENT)]
    pub environment: String,

    /// Public URL the front end uses to reach this API.
    #[clap(env, long, default_value = "https://localhost:3000/api")]
    pub api_base_url: String,

    #[clap(env, long)]
    pub maps_api_key: Option<String>,

    #[clap(env, long)]
    pub maps_map_id: Option<String>,

    /// Extra Host header values accepted while running in development.
    #[clap(env, long, default_value = "zupports-assignment.test")]
    pub allowed_dev_hosts: String,

    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    #[clap(env, long, default_value = "data/restaurants.json")]
    pub restaurants_file: PathBuf,

    #[clap(env, long, default_value_t = 20)]
    pub default_page_size: usize,

    #[clap(env, long, default_value_t = 100)]
    pub max_page_size: usize,
}

/// The browser-safe subset of the configuration.
#[skip_serializing_none]
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicRuntimeConfig {
    pub api_base_url: String,
    pub maps_api_key: Option<String>,
    pub maps_map_id: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.base_url()?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("API_BASE_URL must use http or https, got `{}`", base_url.scheme());
        }

        if self.max_page_size > PAGE_SIZE_LIMIT {
            bail!(
                "MAX_PAGE_SIZE must be at most {}, got {}",
                PAGE_SIZE_LIMIT,
                self.max_page_size
            );
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            bail!(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE ({}), got {}",
                self.max_page_size,
                self.default_page_size
            );
        }

        self.cors_origins()?;
        Ok(())
    }

    pub fn base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("API_BASE_URL `{}` is not a valid URL", self.api_base_url))
    }

    /// Path prefix the API routes are mounted under, taken from `api_base_url`.
    pub fn api_prefix(&self) -> anyhow::Result<String> {
        let base_url = self.base_url()?;
        Ok(base_url.path().trim_end_matches('/').to_string())
    }

    pub fn cors_origins(&self) -> anyhow::Result<Vec<HeaderValue>> {
        split_list(&self.origin_urls)
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin `{}`", origin))
            })
            .collect()
    }

    pub fn dev_hosts(&self) -> Vec<String> {
        split_list(&self.allowed_dev_hosts)
            .map(|host| host.to_ascii_lowercase())
            .collect()
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEVELOPMENT)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn public_runtime_config(&self) -> PublicRuntimeConfig {
        PublicRuntimeConfig {
            api_base_url: self.api_base_url.clone(),
            maps_api_key: self.maps_api_key.clone(),
            maps_map_id: self.maps_map_id.clone(),
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
