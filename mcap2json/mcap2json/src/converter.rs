//! Turns MCAP messages into JSON records.
//!
//! Decoding is attempted in order: a registered primary decoder (CDR channels
//! only), then the IDL fallback for `ros2idl` schemas, then a base64 dump of
//! the raw payload. Failures at each stage are recorded on the record itself.

use base64::Engine as _;
use mcap2json_core::{MessageEncoding, SchemaEncoding};
use serde_json::{Map, Value as JsonValue};

use crate::{
    cache::{DecoderCache, DecoderRegistry, IdlCache, IdlEntry},
    message::ConversionStats,
};

/// Schema name reported for messages on schemaless channels.
const UNKNOWN_MESSAGE_TYPE: &str = "unknown";

pub(crate) struct MessageConverter<'r> {
    registry: &'r DecoderRegistry,
    decoders: DecoderCache,
    idl: IdlCache,
    stats: ConversionStats,
}

impl<'r> MessageConverter<'r> {
    pub fn new(registry: &'r DecoderRegistry) -> Self {
        Self {
            registry,
            decoders: DecoderCache::default(),
            idl: IdlCache::default(),
            stats: ConversionStats::default(),
        }
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    pub fn record_written(&mut self) {
        self.stats.written += 1;
    }

    /// Build the JSON record for one message.
    pub fn convert(&mut self, message: &mcap::Message<'_>) -> JsonValue {
        self.stats.messages += 1;

        let channel = &message.channel;
        let schema = channel.schema.as_deref();
        let message_encoding = MessageEncoding::from(channel.message_encoding.as_str());

        let mut record = Map::new();
        record.insert("topic".into(), channel.topic.clone().into());
        record.insert("timestamp".into(), message.log_time.into());
        record.insert(
            "message_type".into(),
            schema.map_or(UNKNOWN_MESSAGE_TYPE, |s| s.name.as_str()).into(),
        );

        let mut data = None;
        if let Some(schema) = schema
            && message_encoding == MessageEncoding::Cdr
        {
            data = self.decode_primary(schema, &message_encoding, &message.data, &mut record);
        }
        if data.is_none()
            && let Some(schema) = schema
            && SchemaEncoding::from(schema.encoding.as_str()).is_ros2_idl()
        {
            data = self.decode_idl(schema, &message.data, &mut record);
        }

        match data {
            Some(data) => {
                self.stats.decoded += 1;
                record.insert("data".into(), data);
            }
            None => {
                self.stats.raw += 1;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&message.data);
                let mut raw = Map::new();
                raw.insert("raw_data".into(), encoded.into());
                record.insert("data".into(), raw.into());
                record.insert("encoding".into(), channel.message_encoding.clone().into());
                if let Some(schema) = schema {
                    record.insert("schema_encoding".into(), schema.encoding.clone().into());
                }
            }
        }
        JsonValue::Object(record)
    }

    fn decode_primary(
        &mut self,
        schema: &mcap::Schema<'_>,
        message_encoding: &MessageEncoding,
        payload: &[u8],
        record: &mut Map<String, JsonValue>,
    ) -> Option<JsonValue> {
        let decoder = self
            .decoders
            .get_or_build(self.registry, schema, message_encoding)?;
        match decoder.decode(payload) {
            Ok(JsonValue::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(schema = %schema.name, %err, "primary decode failed");
                record.insert("decode_error".into(), format!("Decoding failed: {err}").into());
                None
            }
        }
    }

    fn decode_idl(
        &mut self,
        schema: &mcap::Schema<'_>,
        payload: &[u8],
        record: &mut Map<String, JsonValue>,
    ) -> Option<JsonValue> {
        match self.idl.get_or_parse(schema) {
            IdlEntry::Ready(idl) => {
                let decoded = idl.decode(payload);
                (!decoded.is_empty()).then(|| decoded.to_json())
            }
            IdlEntry::NoFields { preview } => {
                record.insert(
                    "idl_parse_info".into(),
                    format!("No fields found for {}", schema.name).into(),
                );
                record.insert("idl_preview".into(), preview.clone().into());
                None
            }
            IdlEntry::NotText(reason) => {
                record.insert("idl_decode_error".into(), reason.clone().into());
                None
            }
        }
    }
}
