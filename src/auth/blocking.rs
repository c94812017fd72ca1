use super::{token_from_reply, Credential, RenewalHooks, Token};
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::Result;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error};

/// Blocking counterpart of [`super::TokenManager`].
///
/// Every call blocks the current thread. Do not use from inside an async
/// runtime.
pub struct BlockingTokenManager {
    credential: Credential,
    http: reqwest::blocking::Client,
    safety_margin: Duration,
    cached: Mutex<Option<Token>>,
    hooks: RenewalHooks,
}

impl BlockingTokenManager {
    pub fn new(credential: Credential) -> Result<Self> {
        Self::from_config(credential, &ClientConfig::default())
    }

    /// Manager whose HTTP client and safety margin come from `config`
    /// (timeout and proxy included).
    pub fn from_config(credential: Credential, config: &ClientConfig) -> Result<Self> {
        let http = crate::transport::build_blocking_client(config)?;
        Ok(Self::with_http_client(credential, http, config.safety_margin))
    }

    pub fn with_http_client(
        credential: Credential,
        http: reqwest::blocking::Client,
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

    pub fn with_token(mut self, token: Token) -> Self {
        *self.cached.get_mut().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    pub fn on_renewal(&self, hook: impl Fn(&Token) + Send + Sync + 'static) {
        self.hooks.add(Arc::new(hook));
    }

    pub fn get_token(&self) -> Result<String> {
        Ok(self.token()?.value().to_string())
    }

    pub fn token(&self) -> Result<Token> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(self.safety_margin)) {
            return Ok(token.clone());
        }
        let token = self.fetch()?;
        *cached = Some(token.clone());
        drop(cached);
        self.hooks.notify(&token);
        Ok(token)
    }

    pub fn refresh(&self) -> Result<Token> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        let token = self.fetch()?;
        *cached = Some(token.clone());
        drop(cached);
        self.hooks.notify(&token);
        Ok(token)
    }

    pub fn current(&self) -> Option<Token> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user_id(&self) -> Result<String> {
        Ok(self
            .token()?
            .subject()
            .unwrap_or_else(|| "unknown".to_string()))
    }

    fn fetch(&self) -> std::result::Result<Token, AuthError> {
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
            .map_err(|e| {
                error!(error = %e, "token retrieval failed");
                AuthError::Transport(e.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        token_from_reply(status, &body, self.safety_margin)
    }
}

impl std::fmt::Debug for BlockingTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingTokenManager")
            .field("credential", &self.credential)
            .field("safety_margin", &self.safety_margin)
            .finish_non_exhaustive()
    }
}
