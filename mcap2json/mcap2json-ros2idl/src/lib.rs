//! Best-effort ROS 2 IDL → CDR fallback decoder for `mcap2json`.
//!
//! Used when no fully-typed decoder is available for a `ros2idl` schema.
//! Instead of resolving the IDL grammar, it pulls `(type, name)` pairs out of
//! record bodies and walks the payload with them, degrading to placeholder
//! values wherever the layout cannot be reconstructed.
//!
//! # Pipeline
//!
//! ```text
//! schema bytes (UTF-8 IDL text) + schema name
//!   └─ extract_fields / build_record_map  – tolerant nom scan → FieldList, RecordMap
//!       └─ decode                         – CDR bytes → ordered Record
//! ```
//!
//! [`IdlSchema`] bundles both extraction results so a schema is parsed once and
//! shared read-only by every decode of its messages.

mod cdr;
mod decoder;
mod error;
mod lex;
mod parser;
mod schema;
mod types;

pub use cdr::{Cursor, ENCAPSULATION_HEADER_SIZE};
pub use decoder::decode;
pub use error::CdrError;
pub use schema::{
    FieldDescriptor, FieldList, IdlSchema, RecordMap, build_record_map, extract_fields,
    record_name_of,
};
pub use types::{
    ARRAY_SUFFIX, DURATION_TYPE, HEADER_TYPE, PrimitiveType, STRING_TYPE, TIME_TYPE,
    normalize_type_name,
};
