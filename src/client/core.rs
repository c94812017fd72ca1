use super::endpoint::{self, CHAT_PATH, EMBED_PATH, REQUEST_ID_HEADER};
use crate::auth::TokenManager;
use crate::config::ClientConfig;
use crate::serializer::Serializer;
use crate::transport::TransportError;
use crate::types::{ChatRequest, ChatResponse, EmbedRequest, EmbedResponse};
use crate::{Credential, Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::builder::AiLangClientBuilder;

/// Async client for the AI Lang API.
///
/// Each call obtains a bearer token from the [`TokenManager`] (refreshing it
/// when stale), encodes the body with the configured [`Serializer`], and
/// decodes the reply with the same serializer.
pub struct AiLangClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
    pub(crate) serializer: Serializer,
    pub(crate) tokens: Option<Arc<TokenManager>>,
}

impl AiLangClient {
    /// Client with default configuration authenticated by `credential`.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::builder().credential(credential).build()
    }

    pub fn builder() -> AiLangClientBuilder {
        AiLangClientBuilder::new()
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post(CHAT_PATH, request).await
    }

    pub async fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse> {
        self.post(EMBED_PATH, request).await
    }

    /// POST `payload` to `path` (relative to the base URL) and decode the reply.
    pub async fn post<T, R>(&self, path: &str, payload: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let call = endpoint::prepare(&self.config, &self.serializer, path, payload)?;

        let mut request = self
            .http
            .post(call.url)
            .header(CONTENT_TYPE, call.content_type)
            .header(ACCEPT, call.content_type)
            .header(REQUEST_ID_HEADER, call.request_id.as_str())
            .body(call.body);

        if let Some(tokens) = &self.tokens {
            request = request.bearer_auth(tokens.get_token().await?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        endpoint::interpret(&self.serializer, &call.request_id, status, &body)
    }

    pub fn token_manager(&self) -> Option<&Arc<TokenManager>> {
        self.tokens.as_ref()
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for AiLangClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiLangClient")
            .field("base_url", &self.config.base_url)
            .field("serializer", &self.serializer.kind())
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}
