use super::Codec;
use crate::{Error, ErrorContext, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

/// JSON wrapped in a zlib stream.
#[derive(Debug, Clone, Copy)]
pub struct CompressedCodec {
    level: u32,
}

impl CompressedCodec {
    pub fn new(level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::configuration_with_context(
                format!("compression level {} out of range", level),
                ErrorContext::new()
                    .with_field_path("serializer.level")
                    .with_details("expected 0..=9"),
            ));
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    fn io_error(&self, e: std::io::Error) -> Error {
        Error::serialization_with_context(e.to_string(), ErrorContext::new().with_source("compressed"))
    }
}

impl Codec for CompressedCodec {
    fn name(&self) -> &'static str {
        "compressed"
    }

    fn content_type(&self) -> &'static str {
        "application/zlib"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(value)?;
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 2), Compression::new(self.level));
        encoder.write_all(&json).map_err(|e| self.io_error(e))?;
        encoder.finish().map_err(|e| self.io_error(e))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let mut json = Vec::new();
        ZlibDecoder::new(bytes)
            .read_to_end(&mut json)
            .map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_level() {
        assert!(CompressedCodec::new(10).is_err());
        assert_eq!(CompressedCodec::new(9).unwrap().level(), 9);
    }

    #[test]
    fn repetitive_payload_shrinks() {
        let codec = CompressedCodec::new(6).unwrap();
        let value = vec!["the same sentence over and over"; 200];
        let raw = serde_json::to_vec(&value).unwrap();
        let packed = codec.encode(&value).unwrap();
        assert!(packed.len() < raw.len() / 4);
        let back: Vec<String> = codec.decode(&packed).unwrap();
        assert_eq!(back.len(), 200);
    }
}
