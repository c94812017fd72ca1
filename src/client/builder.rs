use super::blocking::BlockingAiLangClient;
use super::core::AiLangClient;
use crate::auth::{BlockingTokenManager, Credential, TokenManager};
use crate::config::ClientConfig;
use crate::serializer::{Serializer, SerializerKind};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`AiLangClient`] and [`BlockingAiLangClient`].
///
/// Keep this surface area small and predictable. Everything not set here comes
/// from [`ClientConfig::default`], or from the environment when starting with
/// [`AiLangClientBuilder::from_env`].
pub struct AiLangClientBuilder {
    config: ClientConfig,
    credential: Option<Credential>,
    token_manager: Option<Arc<TokenManager>>,
    serializer: Option<Serializer>,
}

impl AiLangClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            credential: None,
            token_manager: None,
            serializer: None,
        }
    }

    /// Start from `RELEVAI_*` environment configuration and credentials.
    ///
    /// The client is anonymous only when no credential variable is set at all.
    /// A partially configured credential is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), Credential::keyring_api_key)
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        stored_api_key: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut builder = Self::new().config(ClientConfig::from_lookup(&lookup)?);
        builder.credential = Credential::optional_from_lookup(&lookup, stored_api_key)?;
        if builder.credential.is_none() {
            tracing::debug!("no credential settings in environment, client is anonymous");
        }
        Ok(builder)
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Share an existing async token manager (and its cached token) with this client.
    /// Ignored by [`AiLangClientBuilder::build_blocking`].
    pub fn token_manager(mut self, manager: Arc<TokenManager>) -> Self {
        self.token_manager = Some(manager);
        self
    }

    /// Override the API root, mainly for testing with mock servers.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn safety_margin(mut self, margin: Duration) -> Self {
        self.config.safety_margin = margin;
        self
    }

    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.config.serializer = serializer.kind();
        self.serializer = Some(serializer);
        self
    }

    /// Select a serializer by kind. Resolved at build time, so an unavailable
    /// backend makes `build` fail.
    pub fn serializer_kind(mut self, kind: SerializerKind) -> Self {
        self.config.serializer = kind;
        self.serializer = None;
        self
    }

    fn resolve_serializer(&mut self) -> Result<Serializer> {
        match self.serializer.take() {
            Some(s) => Ok(s),
            None => Serializer::new(self.config.serializer),
        }
    }

    fn validate(&self) -> Result<()> {
        self.config.endpoint("")?;
        if let Some(Credential::ApiKey { api_key, .. }) = &self.credential {
            if api_key.is_empty() {
                return Err(Error::configuration("API key must not be empty"));
            }
        }
        Ok(())
    }

    pub fn build(mut self) -> Result<AiLangClient> {
        self.validate()?;
        let serializer = self.resolve_serializer()?;
        let http = crate::transport::build_async_client(&self.config)?;
        let tokens = match (self.token_manager, self.credential) {
            (Some(manager), _) => Some(manager),
            (None, Some(credential)) => Some(Arc::new(TokenManager::with_http_client(
                credential,
                http.clone(),
                self.config.safety_margin,
            ))),
            (None, None) => None,
        };
        Ok(AiLangClient {
            http,
            config: self.config,
            serializer,
            tokens,
        })
    }

    pub fn build_blocking(mut self) -> Result<BlockingAiLangClient> {
        self.validate()?;
        let serializer = self.resolve_serializer()?;
        let http = crate::transport::build_blocking_client(&self.config)?;
        let tokens = self.credential.map(|credential| {
            Arc::new(BlockingTokenManager::with_http_client(
                credential,
                http.clone(),
                self.config.safety_margin,
            ))
        });
        Ok(BlockingAiLangClient {
            http,
            config: self.config,
            serializer,
            tokens,
        })
    }
}

impl Default for AiLangClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
