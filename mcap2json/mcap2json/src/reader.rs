//! MCAP file reader that converts every message to a JSON record.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::Path,
    sync::Arc,
};

use mcap2json_core::{MessageDecoder, SchemaEncoding};
use memmap2::Mmap;

use crate::{
    cache::DecoderRegistry,
    converter::MessageConverter,
    error::McapReaderError,
    message::{ConversionStats, IdlDefinition, TopicInfo},
};

/// Reads MCAP files and renders their messages as JSON.
///
/// Primary decoders are optional: without any, CDR messages with a `ros2idl`
/// schema still go through the IDL fallback and everything else is emitted raw.
pub struct McapReader {
    decoders: DecoderRegistry,
    topics: Option<BTreeSet<String>>,
    limit: Option<u64>,
}

/// Builder for configuring [`McapReader`].
pub struct McapReaderBuilder {
    decoders: Vec<Arc<dyn MessageDecoder>>,
    topics: Option<BTreeSet<String>>,
    limit: Option<u64>,
}

impl McapReader {
    /// Create a builder for [`McapReader`].
    pub fn builder() -> McapReaderBuilder {
        McapReaderBuilder {
            decoders: Vec::new(),
            topics: None,
            limit: None,
        }
    }

    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            topics: None,
            limit: None,
        }
    }

    /// Register a decoder for a specific encoding pair.
    pub fn register_decoder(&mut self, decoder: Box<dyn MessageDecoder>) {
        self.register_shared_decoder(Arc::from(decoder));
    }

    /// Register a shared decoder for a specific encoding pair.
    pub fn register_shared_decoder(&mut self, decoder: Arc<dyn MessageDecoder>) {
        self.decoders.insert(decoder.encoding_key(), decoder);
    }

    fn accepts_topic(&self, topic: &str) -> bool {
        self.topics.as_ref().is_none_or(|t| t.contains(topic))
    }

    fn mmap_file(&self, path: &Path) -> Result<Mmap, McapReaderError> {
        let file = fs::File::open(path)?;
        Ok(unsafe { Mmap::map(&file) }?)
    }

    fn read_summary(&self, path: &Path) -> Result<Option<mcap::read::Summary>, McapReaderError> {
        let mmap = self.mmap_file(path)?;
        Ok(mcap::read::Summary::read(&mmap)?)
    }

    /// Convert every message that passes the topic filter and hand the JSON
    /// record to `callback`, in file order.
    ///
    /// Stops once the configured limit of records was written. Decoder caches
    /// are scoped to this call.
    pub fn for_each_record(
        &self,
        path: &Path,
        mut callback: impl FnMut(serde_json::Value) -> Result<(), Box<dyn std::error::Error + Send + Sync>>,
    ) -> Result<ConversionStats, McapReaderError> {
        let mmap = self.mmap_file(path)?;
        let mut converter = MessageConverter::new(&self.decoders);

        for message in mcap::MessageStream::new(&mmap)? {
            if self.limit.is_some_and(|limit| converter.stats().written >= limit) {
                break;
            }
            let message = message?;
            if !self.accepts_topic(&message.channel.topic) {
                continue;
            }

            let record = converter.convert(&message);
            callback(record).map_err(McapReaderError::Callback)?;
            converter.record_written();
        }

        let stats = converter.stats();
        tracing::debug!(?stats, path = %path.display(), "conversion finished");
        Ok(stats)
    }

    /// Total message count from the summary statistics, restricted to the
    /// topic filter when one is set.
    ///
    /// `None` when the file has no summary or no statistics record.
    pub fn message_count(&self, path: &Path) -> Result<Option<u64>, McapReaderError> {
        let Some(summary) = self.read_summary(path)? else {
            return Ok(None);
        };
        let Some(stats) = summary.stats.as_ref() else {
            return Ok(None);
        };

        let count = match &self.topics {
            None => stats.message_count,
            Some(_) => summary
                .channels
                .values()
                .filter(|ch| self.accepts_topic(&ch.topic))
                .map(|ch| {
                    stats
                        .channel_message_counts
                        .get(&ch.id)
                        .copied()
                        .unwrap_or_default()
                })
                .sum(),
        };
        Ok(Some(count))
    }

    /// Scan every message and tally it per topic, sorted by topic name.
    ///
    /// Ignores the topic filter and limit.
    pub fn list_topics(&self, path: &Path) -> Result<Vec<TopicInfo>, McapReaderError> {
        let mmap = self.mmap_file(path)?;
        let mut topics: BTreeMap<String, TopicInfo> = BTreeMap::new();

        for message in mcap::MessageStream::new(&mmap)? {
            let message = message?;
            let channel = &message.channel;
            let info = topics
                .entry(channel.topic.clone())
                .or_insert_with(|| TopicInfo {
                    topic: channel.topic.clone(),
                    message_type: "unknown".to_string(),
                    count: 0,
                });
            info.count += 1;
            if info.message_type == "unknown"
                && let Some(schema) = &channel.schema
            {
                info.message_type = schema.name.clone();
            }
        }
        Ok(topics.into_values().collect())
    }

    /// List the `ros2idl` schemas recorded in the summary, sorted by schema id.
    ///
    /// With a non-empty `topics`, only schemas used by at least one of those
    /// topics are returned.
    pub fn idl_definitions(
        &self,
        path: &Path,
        topics: &[String],
    ) -> Result<Vec<IdlDefinition>, McapReaderError> {
        let summary = self
            .read_summary(path)?
            .ok_or_else(|| McapReaderError::SummaryNotAvailable {
                path: path.display().to_string(),
            })?;

        let mut definitions: BTreeMap<u16, IdlDefinition> = summary
            .schemas
            .values()
            .filter(|s| SchemaEncoding::from(s.encoding.as_str()).is_ros2_idl())
            .map(|s| {
                let definition = IdlDefinition {
                    schema_id: s.id,
                    name: s.name.clone(),
                    topics: Vec::new(),
                    text: String::from_utf8_lossy(&s.data).into_owned(),
                };
                (s.id, definition)
            })
            .collect();

        for channel in summary.channels.values() {
            if let Some(schema) = &channel.schema
                && let Some(definition) = definitions.get_mut(&schema.id)
            {
                definition.topics.push(channel.topic.clone());
            }
        }
        for definition in definitions.values_mut() {
            definition.topics.sort();
            definition.topics.dedup();
        }
        if !topics.is_empty() {
            definitions.retain(|_, d| d.topics.iter().any(|t| topics.contains(t)));
        }
        Ok(definitions.into_values().collect())
    }
}

impl Default for McapReader {
    fn default() -> Self {
        Self::new()
    }
}

impl McapReaderBuilder {
    /// Register a primary message decoder.
    pub fn with_decoder(mut self, decoder: Box<dyn MessageDecoder>) -> Self {
        self.decoders.push(Arc::from(decoder));
        self
    }

    /// Only convert messages on these topics. An empty list keeps every topic.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics: BTreeSet<String> = topics.into_iter().map(Into::into).collect();
        self.topics = (!topics.is_empty()).then_some(topics);
        self
    }

    /// Stop after this many records were written.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the reader.
    pub fn build(self) -> McapReader {
        let mut reader = McapReader::new();
        reader.topics = self.topics;
        reader.limit = self.limit;
        for decoder in self.decoders {
            reader.register_shared_decoder(decoder);
        }
        reader
    }
}
