use super::{token_from_reply, Credential, RenewalHooks, Token};
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Async token cache for one [`Credential`].
///
/// The cache lock is held across a refresh, so concurrent callers that all
/// find the token stale trigger a single request to the auth server.
pub struct TokenManager {
    credential: Credential,
    http: reqwest::Client,
    safety_margin: Duration,
    cached: Mutex<Option<Token>>,
    hooks: RenewalHooks,
}

impl TokenManager {
    /// Manager with default transport settings and safety margin.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::from_config(credential, &ClientConfig::default())
    }

    /// Manager whose HTTP client and safety margin come from `config`
    /// (timeout and proxy included).
    pub fn from_config(credential: Credential, config: &ClientConfig) -> Result<Self> {
        let http = crate::transport::build_async_client(config)?;
        Ok(Self::with_http_client(credential, http, config.safety_margin))
    }

    pub fn with_http_client(
        credential: Credential,
        http: reqwest::Client,
        safety_margin: Duration,
    ) -> Self {
        Self {
            credential,
            http,
            safety_margin,
            cached: Mutex::new(None),
            hooks: RenewalHooks::default(),
        }
    }

    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Seed the cache with a token obtained elsewhere.
    pub fn with_token(mut self, token: Token) -> Self {
        *self.cached.get_mut() = Some(token);
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// Register a callback run after each successful renewal.
    pub fn on_renewal(&self, hook: impl Fn(&Token) + Send + Sync + 'static) {
        self.hooks.add(Arc::new(hook));
    }

    /// A currently-valid access token, refreshed first if it is missing or
    /// within the safety margin of expiry.
    pub async fn get_token(&self) -> Result<String> {
        Ok(self.token().await?.value().to_string())
    }

    /// Like [`TokenManager::get_token`] but returns the whole [`Token`].
    pub async fn token(&self) -> Result<Token> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(self.safety_margin)) {
            return Ok(token.clone());
        }
        let token = self.fetch().await?;
        *cached = Some(token.clone());
        drop(cached);
        self.hooks.notify(&token);
        Ok(token)
    }

    /// Renew unconditionally.
    pub async fn refresh(&self) -> Result<Token> {
        let mut cached = self.cached.lock().await;
        let token = self.fetch().await?;
        *cached = Some(token.clone());
        drop(cached);
        self.hooks.notify(&token);
        Ok(token)
    }

    /// The cached token, without checking or refreshing it.
    pub async fn current(&self) -> Option<Token> {
        self.cached.lock().await.clone()
    }

    /// Subject claim of a valid token, `"unknown"` when the token carries none.
    pub async fn user_id(&self) -> Result<String> {
        Ok(self
            .token()
            .await?
            .subject()
            .unwrap_or_else(|| "unknown".to_string()))
    }

    async fn fetch(&self) -> std::result::Result<Token, AuthError> {
        let auth_url = self.credential.auth_url();
        debug!(
            grant_type = self.credential.grant_type(),
            client_id = self.credential.client_id(),
            auth_url,
            "requesting access token"
        );
        let response = self
            .http
            .post(auth_url)
            .form(&self.credential.token_request_form())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "token retrieval failed");
                AuthError::Transport(e.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        token_from_reply(status, &body, self.safety_margin)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credential", &self.credential)
            .field("safety_margin", &self.safety_margin)
            .finish_non_exhaustive()
    }
}
