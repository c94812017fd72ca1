use super::endpoint::{self, CHAT_PATH, EMBED_PATH, REQUEST_ID_HEADER};
use crate::auth::BlockingTokenManager;
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

/// Blocking client for the AI Lang API. Same behavior as
/// [`super::AiLangClient`], but every call blocks the current thread.
pub struct BlockingAiLangClient {
    pub(crate) http: reqwest::blocking::Client,
    pub(crate) config: ClientConfig,
    pub(crate) serializer: Serializer,
    pub(crate) tokens: Option<Arc<BlockingTokenManager>>,
}

impl BlockingAiLangClient {
    pub fn new(credential: Credential) -> Result<Self> {
        AiLangClientBuilder::new()
            .credential(credential)
            .build_blocking()
    }

    pub fn builder() -> AiLangClientBuilder {
        AiLangClientBuilder::new()
    }

    pub fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post(CHAT_PATH, request)
    }

    pub fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse> {
        self.post(EMBED_PATH, request)
    }

    pub fn post<T, R>(&self, path: &str, payload: &T) -> Result<R>
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
            request = request.bearer_auth(tokens.get_token()?);
        }

        let response = request
            .send()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        endpoint::interpret(&self.serializer, &call.request_id, status, &body)
    }

    pub fn token_manager(&self) -> Option<&Arc<BlockingTokenManager>> {
        self.tokens.as_ref()
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for BlockingAiLangClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingAiLangClient")
            .field("base_url", &self.config.base_url)
            .field("serializer", &self.serializer.kind())
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}
