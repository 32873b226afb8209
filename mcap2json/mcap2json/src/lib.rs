//! Convert MCAP recordings into line-oriented JSON.
//!
//! Each message becomes one JSON object carrying its topic, log time and
//! schema name plus either a decoded `data` mapping or the raw payload in
//! base64. ROS 2 messages with `ros2idl` schemas are decoded through the
//! best-effort fallback in [`ros2idl`] when no primary decoder handles them.

mod cache;
mod converter;
mod error;
mod message;
mod reader;

pub use error::McapReaderError;
pub use mcap2json_core as core;
pub use mcap2json_ros2idl as ros2idl;
pub use message::{ConversionStats, IdlDefinition, TopicInfo};
pub use reader::{McapReader, McapReaderBuilder};
