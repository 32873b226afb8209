//! Error types for the MCAP reader.

/// Errors produced by [`McapReader`](crate::McapReader).
///
/// Per-message decode problems never show up here; they are recorded inside
/// the emitted JSON record instead.
#[derive(Debug, thiserror::Error)]
pub enum McapReaderError {
    /// I/O error while opening or memory-mapping a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error from the underlying `mcap` crate (bad magic, CRC mismatch, ...).
    #[error(transparent)]
    Mcap(#[from] mcap::McapError),

    /// The MCAP file has no summary section.
    #[error("MCAP summary not available in {path}")]
    SummaryNotAvailable { path: String },

    /// An error returned by the user-supplied callback in
    /// [`McapReader::for_each_record`](crate::McapReader::for_each_record).
    #[error(transparent)]
    Callback(Box<dyn std::error::Error + Send + Sync>),
}
