use super::Codec;
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// MessagePack. Structs are written as maps so field names survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactCodec;

impl Codec for CompactCodec {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn content_type(&self) -> &'static str {
        "application/msgpack"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(value).map_err(|e| {
            Error::serialization_with_context(e.to_string(), ErrorContext::new().with_source("compact"))
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        rmp_serde::from_slice(bytes).map_err(|e| {
            Error::serialization_with_context(e.to_string(), ErrorContext::new().with_source("compact"))
        })
    }
}
