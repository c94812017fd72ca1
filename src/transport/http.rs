use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

const USER_AGENT: &str = concat!("relevai-rust/", env!("CARGO_PKG_VERSION"));

fn pool_max_idle_per_host() -> usize {
    env::var("RELEVAI_HTTP_POOL_MAX_IDLE_PER_HOST")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(32)
}

fn pool_idle_timeout() -> Duration {
    Duration::from_secs(
        env::var("RELEVAI_HTTP_POOL_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(90),
    )
}

fn proxy(config: &ClientConfig) -> Result<Option<reqwest::Proxy>> {
    match &config.proxy {
        Some(url) => reqwest::Proxy::all(url).map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid proxy URL: {}", e),
                ErrorContext::new().with_field_path("proxy"),
            )
        }),
        None => Ok(None),
    }
}

/// Build the async HTTP client used by [`crate::AiLangClient`] and [`crate::auth::TokenManager`].
pub fn build_async_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout)
        .pool_max_idle_per_host(pool_max_idle_per_host())
        .pool_idle_timeout(Some(pool_idle_timeout()))
        // Conservative HTTP/2 keepalive defaults for long-lived connections.
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Some(Duration::from_secs(30)))
        .http2_keep_alive_timeout(Duration::from_secs(10));

    if let Some(proxy) = proxy(config)? {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))
}

/// Build the blocking HTTP client. Must not be called from inside an async runtime.
pub fn build_blocking_client(config: &ClientConfig) -> Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout)
        .pool_max_idle_per_host(pool_max_idle_per_host())
        .pool_idle_timeout(Some(pool_idle_timeout()));

    if let Some(proxy) = proxy(config)? {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
