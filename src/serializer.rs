//! Payload serializers.
//!
//! A [`Codec`] turns any `serde` value into bytes (or base64 text) and back.
//! Three formats exist:
//!
//! | Format | Type | Cargo feature | Content type |
//! |--------|------|---------------|--------------|
//! | JSON | [`JsonCodec`] | always | `application/json` |
//! | zlib-compressed JSON | `CompressedCodec` | `compressed` | `application/zlib` |
//! | MessagePack | `CompactCodec` | `compact` | `application/msgpack` |
//!
//! The format is chosen when a [`Serializer`] is constructed. Asking for a
//! backend whose feature was not compiled in fails right there with
//! [`Error::Configuration`], so a misconfigured client never gets as far as
//! issuing a request.
//!
//! ```rust
//! use relevai::serializer::{Codec, Serializer};
//!
//! let json = Serializer::json();
//! let text = json.encode_text(&serde_json::json!({"key": "value"})).unwrap();
//! assert_eq!(text, "eyJrZXkiOiJ2YWx1ZSJ9");
//! let back: serde_json::Value = json.decode_text(&text).unwrap();
//! assert_eq!(back["key"], "value");
//! ```

#[cfg(feature = "compact")]
mod compact;
#[cfg(feature = "compressed")]
mod compressed;
mod json;

#[cfg(feature = "compact")]
pub use compact::CompactCodec;
#[cfg(feature = "compressed")]
pub use compressed::CompressedCodec;
pub use json::JsonCodec;

use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// zlib level used when none is given.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 1;

/// Encode/decode capability shared by every serializer backend.
pub trait Codec {
    /// Short backend name (`json`, `compressed`, `compact`).
    fn name(&self) -> &'static str;

    /// MIME type of the bytes produced by [`Codec::encode`].
    fn content_type(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Standard base64 of [`Codec::encode`].
    fn encode_text<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(STANDARD.encode(self.encode(value)?))
    }

    fn decode_text<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let bytes = STANDARD.decode(text.trim()).map_err(|e| {
            Error::serialization_with_context(
                format!("invalid base64 payload: {}", e),
                ErrorContext::new().with_source(self.name()),
            )
        })?;
        self.decode(&bytes)
    }
}

/// Backend selector, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializerKind {
    #[default]
    Json,
    Compressed,
    Compact,
}

impl SerializerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SerializerKind::Json => "json",
            SerializerKind::Compressed => "compressed",
            SerializerKind::Compact => "compact",
        }
    }
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerializerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SerializerKind::Json),
            "compressed" | "zlib" => Ok(SerializerKind::Compressed),
            "compact" | "msgpack" => Ok(SerializerKind::Compact),
            other => Err(Error::configuration_with_context(
                format!("unknown serializer '{}'", other),
                ErrorContext::new().with_details("expected one of: json, compressed, compact"),
            )),
        }
    }
}

/// The serializer a client was configured with.
#[derive(Debug, Clone)]
pub enum Serializer {
    Json(JsonCodec),
    #[cfg(feature = "compressed")]
    Compressed(CompressedCodec),
    #[cfg(feature = "compact")]
    Compact(CompactCodec),
}

impl Serializer {
    pub fn json() -> Self {
        Serializer::Json(JsonCodec)
    }

    /// zlib-compressed JSON at `level` (0..=9).
    pub fn compressed(level: u32) -> Result<Self> {
        #[cfg(feature = "compressed")]
        {
            CompressedCodec::new(level).map(Serializer::Compressed)
        }
        #[cfg(not(feature = "compressed"))]
        {
            let _ = level;
            Err(Error::backend_unavailable("compressed", "compressed"))
        }
    }

    /// MessagePack.
    pub fn compact() -> Result<Self> {
        #[cfg(feature = "compact")]
        {
            Ok(Serializer::Compact(CompactCodec))
        }
        #[cfg(not(feature = "compact"))]
        {
            Err(Error::backend_unavailable("compact", "compact"))
        }
    }

    pub fn new(kind: SerializerKind) -> Result<Self> {
        match kind {
            SerializerKind::Json => Ok(Self::json()),
            SerializerKind::Compressed => Self::compressed(DEFAULT_COMPRESSION_LEVEL),
            SerializerKind::Compact => Self::compact(),
        }
    }

    pub fn kind(&self) -> SerializerKind {
        match self {
            Serializer::Json(_) => SerializerKind::Json,
            #[cfg(feature = "compressed")]
            Serializer::Compressed(_) => SerializerKind::Compressed,
            #[cfg(feature = "compact")]
            Serializer::Compact(_) => SerializerKind::Compact,
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::json()
    }
}

macro_rules! dispatch {
    ($self:ident, $codec:ident => $body:expr) => {
        match $self {
            Serializer::Json($codec) => $body,
            #[cfg(feature = "compressed")]
            Serializer::Compressed($codec) => $body,
            #[cfg(feature = "compact")]
            Serializer::Compact($codec) => $body,
        }
    };
}

impl Codec for Serializer {
    fn name(&self) -> &'static str {
        dispatch!(self, c => c.name())
    }

    fn content_type(&self) -> &'static str {
        dispatch!(self, c => c.content_type())
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        dispatch!(self, c => c.encode(value))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        dispatch!(self, c => c.decode(bytes))
    }
}
