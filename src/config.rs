//! Client configuration.
//!
//! Every value has a default and can be overridden from the environment
//! (`RELEVAI_*` variables) or through the client builder.

use crate::serializer::SerializerKind;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

/// Default AI Lang API root. Endpoint paths are joined onto it, so it keeps its trailing slash.
pub const DEFAULT_BASE_URL: &str = "https://api.relev.ai/ai-lang/v1/";

/// Seconds before expiry at which a cached access token is considered stale.
pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 30;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub serializer: SerializerKind,
    pub safety_margin: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
            serializer: SerializerKind::Json,
            safety_margin: Duration::from_secs(DEFAULT_SAFETY_MARGIN_SECS),
        }
    }
}

impl ClientConfig {
    /// Read configuration from `RELEVAI_*` environment variables.
    ///
    /// - `RELEVAI_BASE_URL`
    /// - `RELEVAI_HTTP_TIMEOUT_SECS` (default 30)
    /// - `RELEVAI_PROXY_URL`
    /// - `RELEVAI_SERIALIZER` (`json`, `compressed`, `compact`; default `json`)
    /// - `RELEVAI_TOKEN_SAFETY_MARGIN_SECS` (default 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(url) = lookup("RELEVAI_BASE_URL").filter(|s| !s.trim().is_empty()) {
            cfg.base_url = url;
        }
        if let Some(secs) = lookup("RELEVAI_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            cfg.timeout = Duration::from_secs(secs.max(1));
        }
        cfg.proxy = lookup("RELEVAI_PROXY_URL").filter(|s| !s.trim().is_empty());
        if let Some(secs) = lookup("RELEVAI_TOKEN_SAFETY_MARGIN_SECS")
            .and_then(|s| s.parse::<u64>().ok())
        {
            cfg.safety_margin = Duration::from_secs(secs);
        }
        if let Some(name) = lookup("RELEVAI_SERIALIZER") {
            cfg.serializer = name.parse().map_err(|e: Error| match e {
                Error::Configuration { message, context } => Error::Configuration {
                    message,
                    context: context.with_field_path("RELEVAI_SERIALIZER"),
                },
                other => other,
            })?;
        }

        Ok(cfg)
    }

    /// Resolve an endpoint path (e.g. `api/chat`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<url::Url> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = url::Url::parse(&base).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        base.join(path.trim_start_matches('/')).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint path: {}", e),
                ErrorContext::new().with_field_path(path.to_string()),
            )
        })
    }
}
