//! Request preparation and response interpretation shared by the async and
//! blocking clients.

use crate::config::ClientConfig;
use crate::serializer::{Codec, Serializer};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

pub const CHAT_PATH: &str = "api/chat";
pub const EMBED_PATH: &str = "api/embed";

/// Correlation id sent with every call. The service may ignore it.
pub const REQUEST_ID_HEADER: &str = "x-relevai-request-id";

pub(crate) struct PreparedCall {
    pub url: url::Url,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub request_id: String,
}

pub(crate) fn prepare<T: Serialize + ?Sized>(
    config: &ClientConfig,
    serializer: &Serializer,
    path: &str,
    payload: &T,
) -> Result<PreparedCall> {
    let url = config.endpoint(path)?;
    let body = serializer.encode(payload)?;
    let request_id = Uuid::new_v4().to_string();
    debug!(
        %url,
        request_id = %request_id,
        serializer = serializer.name(),
        bytes = body.len(),
        "sending request"
    );
    Ok(PreparedCall {
        url,
        body,
        content_type: serializer.content_type(),
        request_id,
    })
}

pub(crate) fn interpret<R: DeserializeOwned>(
    serializer: &Serializer,
    request_id: &str,
    status: u16,
    body: &[u8],
) -> Result<R> {
    if !(200..300).contains(&status) {
        let body = String::from_utf8_lossy(body).into_owned();
        warn!(status, request_id, "request failed");
        return Err(Error::Request { status, body });
    }
    debug!(status, request_id, bytes = body.len(), "response received");
    serializer.decode(body)
}
