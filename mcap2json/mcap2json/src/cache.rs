//! Run-scoped memoization of per-schema decoder state.
//!
//! Both caches live for one pass over a file; nothing carries over between runs.

use std::{collections::HashMap, sync::Arc};

use mcap2json_core::{EncodingKey, MessageDecoder, MessageEncoding, SchemaEncoding, TopicDecoder};
use mcap2json_ros2idl::IdlSchema;

/// Registered primary decoders, keyed by the encoding pair they handle.
pub(crate) type DecoderRegistry = HashMap<EncodingKey, Arc<dyn MessageDecoder>>;

/// Maximum number of IDL characters echoed back when no fields were found.
const IDL_PREVIEW_CHARS: usize = 200;

enum CacheEntry {
    Ready(Box<dyn TopicDecoder>),
    /// No decoder is registered for the pair, or building one failed.
    Failed,
}

/// Primary decoders keyed by `(message encoding, schema id)`.
#[derive(Default)]
pub(crate) struct DecoderCache {
    entries: HashMap<(MessageEncoding, u16), CacheEntry>,
}

impl DecoderCache {
    /// Look up, or build once, the primary decoder for a schema.
    pub fn get_or_build(
        &mut self,
        registry: &DecoderRegistry,
        schema: &mcap::Schema<'_>,
        message_encoding: &MessageEncoding,
    ) -> Option<&dyn TopicDecoder> {
        let entry = self
            .entries
            .entry((message_encoding.clone(), schema.id))
            .or_insert_with(|| build_entry(registry, schema, message_encoding));
        match entry {
            CacheEntry::Ready(decoder) => Some(&**decoder),
            CacheEntry::Failed => None,
        }
    }
}

fn build_entry(
    registry: &DecoderRegistry,
    schema: &mcap::Schema<'_>,
    message_encoding: &MessageEncoding,
) -> CacheEntry {
    let key = EncodingKey::new(
        SchemaEncoding::from(schema.encoding.as_str()),
        message_encoding.clone(),
    );
    let Some(factory) = registry.get(&key) else {
        tracing::debug!(
            schema = %schema.name,
            schema_encoding = %key.schema_encoding,
            message_encoding = %key.message_encoding,
            "no primary decoder registered"
        );
        return CacheEntry::Failed;
    };
    match factory.build_topic_decoder(&schema.name, &schema.data) {
        Ok(decoder) => CacheEntry::Ready(decoder),
        Err(err) => {
            tracing::warn!(schema = %schema.name, %err, "primary decoder unavailable for schema");
            CacheEntry::Failed
        }
    }
}

/// Outcome of preparing a `ros2idl` schema for fallback decoding.
pub(crate) enum IdlEntry {
    Ready(Arc<IdlSchema>),
    /// The IDL text declares no record matching the schema name.
    NoFields { preview: String },
    /// The schema data is not UTF-8 text.
    NotText(String),
}

/// Parsed IDL schemas keyed by schema id.
#[derive(Default)]
pub(crate) struct IdlCache {
    entries: HashMap<u16, IdlEntry>,
}

impl IdlCache {
    pub fn get_or_parse(&mut self, schema: &mcap::Schema<'_>) -> &IdlEntry {
        self.entries
            .entry(schema.id)
            .or_insert_with(|| parse_entry(schema))
    }
}

fn parse_entry(schema: &mcap::Schema<'_>) -> IdlEntry {
    let text = match std::str::from_utf8(&schema.data) {
        Ok(text) => text,
        Err(err) => return IdlEntry::NotText(err.to_string()),
    };
    let parsed = IdlSchema::parse(&schema.name, text);
    if parsed.is_resolved() {
        return IdlEntry::Ready(Arc::new(parsed));
    }
    tracing::debug!(schema = %schema.name, "no fields extracted from IDL");
    IdlEntry::NoFields {
        preview: idl_preview(text),
    }
}

fn idl_preview(text: &str) -> String {
    match text.char_indices().nth(IDL_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
