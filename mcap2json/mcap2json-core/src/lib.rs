//! Encoding-agnostic core types and decoder contracts for `mcap2json`.
//!
//! This crate provides the decoded [`Value`] tree produced by the schema-driven
//! fallback decoder, its JSON rendering, and the [`MessageDecoder`] trait used
//! to plug in fully-typed primary decoders.

mod decoder;
mod encoding;
mod error;
mod value;

pub use decoder::{EncodingKey, MessageDecoder, TopicDecoder};
pub use encoding::{MessageEncoding, SchemaEncoding};
pub use error::DecoderError;
pub use value::{Record, Value};
