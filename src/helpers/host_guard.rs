use std::sync::Arc;
use axum::extract::State;
use axum::http::header::HOST;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use crate::errors::error_body;

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Host header values the development server answers to.
#[derive(Clone, Debug)]
pub struct HostAllowList {
    hosts: Vec<String>,
}

impl HostAllowList {
    pub fn new(extra_hosts: Vec<String>) -> Self {
        let mut hosts: Vec<String> = LOCAL_HOSTS.iter().map(|h| h.to_string()).collect();
        hosts.extend(extra_hosts.into_iter().map(|h| h.to_ascii_lowercase()));
        Self { hosts }
    }

    pub fn allows(&self, host_header: &str) -> bool {
        let host = strip_port(host_header.trim()).to_ascii_lowercase();
        self.hosts.iter().any(|allowed| *allowed == host)
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

pub async fn guard_dev_host<B>(
    State(allow_list): State<Arc<HostAllowList>>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if allow_list.allows(&host) {
        return next.run(request).await;
    }

    warn!("Blocked request for host `{}`, add it to ALLOWED_DEV_HOSTS to allow it", host);
    error_body(
        StatusCode::FORBIDDEN,
        "forbidden_host",
        format!("Host `{}` is not allowed", host),
    )
}
