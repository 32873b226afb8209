//! Faults raised while reading a CDR buffer.

/// A field-level read fault.
///
/// Never escapes [`decode`](crate::decode): the failing field's value becomes an
/// error placeholder carrying this message and the rest of the record is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CdrError {
    #[error("unexpected end of buffer at offset {offset}: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("length prefix {len} at offset {offset} exceeds the {remaining} remaining bytes")]
    LengthOverflow {
        offset: usize,
        len: usize,
        remaining: usize,
    },
}
