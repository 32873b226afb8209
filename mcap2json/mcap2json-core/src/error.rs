//! Error types for the decoder layer.

/// Error returned by [`MessageDecoder`](crate::MessageDecoder) and
/// [`TopicDecoder`](crate::TopicDecoder) implementations.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// Schema data could not be parsed.
    #[error("failed to parse schema '{schema_name}': {source}")]
    SchemaParse {
        schema_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema data parsed but cannot be used for decoding.
    #[error("invalid schema '{schema_name}': {detail}")]
    SchemaInvalid { schema_name: String, detail: String },

    /// Message payload bytes could not be decoded.
    #[error("failed to decode message for schema '{schema_name}': {source}")]
    MessageDecode {
        schema_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
