//! Primary decoder contracts.
//!
//! A primary decoder fully understands a schema language and is tried first for
//! every message. The IDL fallback in `mcap2json-ros2idl` only runs when no
//! primary decoder is registered for a schema, or when it fails.

use crate::{
    encoding::{MessageEncoding, SchemaEncoding},
    error::DecoderError,
};

/// Key identifying a (schema_encoding, message_encoding) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingKey {
    pub schema_encoding: SchemaEncoding,
    pub message_encoding: MessageEncoding,
}

impl EncodingKey {
    pub fn new(schema_encoding: SchemaEncoding, message_encoding: MessageEncoding) -> Self {
        Self {
            schema_encoding,
            message_encoding,
        }
    }
}

/// Schema-local decoder built from MCAP schema metadata.
///
/// Built once per schema and reused for every message that references it.
pub trait TopicDecoder: Send + Sync {
    /// Decode a single message payload into JSON.
    fn decode(&self, message_data: &[u8]) -> Result<serde_json::Value, DecoderError>;
}

/// Factory that builds [`TopicDecoder`]s, dispatched by [`EncodingKey`].
pub trait MessageDecoder: Send + Sync {
    /// Returns the encoding pair this decoder handles.
    fn encoding_key(&self) -> EncodingKey;

    /// Build a decoder for the given MCAP schema.
    ///
    /// Returns `Err` if the schema cannot be parsed. Callers memoize the
    /// failure and do not retry the same schema.
    fn build_topic_decoder(
        &self,
        schema_name: &str,
        schema_data: &[u8],
    ) -> Result<Box<dyn TopicDecoder>, DecoderError>;
}
