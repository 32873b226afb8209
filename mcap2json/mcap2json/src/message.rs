//! Plain result types returned by [`McapReader`](crate::McapReader).

/// Counters for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Messages that passed the topic filter.
    pub messages: u64,
    /// Messages rendered with a `data` mapping from a decoder.
    pub decoded: u64,
    /// Messages rendered as base64 raw payloads.
    pub raw: u64,
    /// Records handed to the output callback.
    pub written: u64,
}

/// One row of the topic listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInfo {
    pub topic: String,
    /// Schema name of the first message seen with a schema, or `"unknown"`.
    pub message_type: String,
    pub count: u64,
}

/// A `ros2idl` schema stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlDefinition {
    pub schema_id: u16,
    pub name: String,
    /// Topics whose channel uses this schema, sorted.
    pub topics: Vec<String>,
    /// IDL text, with invalid UTF-8 replaced.
    pub text: String,
}
