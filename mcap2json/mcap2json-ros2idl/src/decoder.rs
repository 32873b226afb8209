//! Schema-driven walk of a CDR buffer.
//!
//! Fields are read strictly in declaration order. Faults are local: a failing
//! read ends its own record with an error placeholder, an unknown type becomes
//! an unresolved placeholder, and neither ever escapes [`decode`].

use mcap2json_core::{Record, Value};

use crate::{
    cdr::Cursor,
    error::CdrError,
    schema::{FieldDescriptor, RecordMap},
    types::{PrimitiveType, STRING_TYPE, is_header_type, is_time_type},
};

/// Decode a top-level message payload (encapsulation header included).
///
/// Returns the fields decoded before the buffer ran out or a read faulted;
/// remaining fields are omitted.
pub fn decode(data: &[u8], fields: &[FieldDescriptor], records: &RecordMap) -> Record {
    let mut walker = Walker {
        records,
        active: Vec::new(),
    };
    walker.decode_fields(&mut Cursor::new(data), fields)
}

struct Walker<'m> {
    records: &'m RecordMap,
    /// Records currently being decoded, outermost first. A record that refers
    /// back to one of these can never make progress and is left unresolved.
    active: Vec<&'m str>,
}

impl<'m> Walker<'m> {
    fn decode_fields(&mut self, cursor: &mut Cursor<'_>, fields: &[FieldDescriptor]) -> Record {
        let mut out = Record::with_capacity(fields.len());
        for field in fields {
            if cursor.is_exhausted() {
                break;
            }
            match self.decode_field(cursor, &field.ty) {
                Ok(value) => out.insert(field.name.clone(), value),
                Err(err) => {
                    tracing::trace!(field = %field.name, ty = %field.ty, %err, "record aborted");
                    out.insert(field.name.clone(), Value::Error(err.to_string()));
                    break;
                }
            }
        }
        out
    }

    fn decode_field(&mut self, cursor: &mut Cursor<'_>, ty: &str) -> Result<Value, CdrError> {
        if let Some(p) = PrimitiveType::from_name(ty) {
            return cursor.read_primitive(p);
        }
        if ty == STRING_TYPE {
            return cursor.read_string().map(Value::string);
        }
        if is_header_type(ty) {
            return decode_header(cursor).map(Value::Record);
        }
        if is_time_type(ty) {
            return decode_time(cursor).map(Value::Record);
        }
        Ok(self.decode_nested(cursor, ty))
    }

    /// Decode a field whose type names a record in the map.
    ///
    /// The nested record gets its own cursor over the rest of the buffer,
    /// starting at the next 4-byte boundary; the outer cursor then moves past
    /// whatever it consumed. An unknown type, or a nested record that decodes
    /// to nothing, leaves the outer cursor where it was.
    fn decode_nested(&mut self, cursor: &mut Cursor<'_>, ty: &str) -> Value {
        let records = self.records;
        let Some((name, fields)) = records.resolve(ty) else {
            return Value::Unresolved(ty.to_string());
        };
        if self.active.contains(&name) {
            tracing::debug!(ty, record = name, "self-referential record left unresolved");
            return Value::Unresolved(ty.to_string());
        }

        let mut aligned = *cursor;
        aligned.align(4);
        let mut inner = Cursor::nested(aligned.remaining());

        self.active.push(name);
        let record = self.decode_fields(&mut inner, fields);
        self.active.pop();

        if record.is_empty() {
            return Value::Unresolved(ty.to_string());
        }
        *cursor = aligned;
        cursor.advance(inner.offset());
        Value::Record(record)
    }
}

/// Hard-coded `std_msgs/Header` layout: a time stamp then a frame id string.
fn decode_header(cursor: &mut Cursor<'_>) -> Result<Record, CdrError> {
    cursor.align(4);
    let stamp = decode_time(cursor)?;
    let frame_id = cursor.read_string()?;

    let mut header = Record::with_capacity(2);
    header.insert("stamp", Value::Record(stamp));
    header.insert("frame_id", Value::string(frame_id));
    Ok(header)
}

/// `builtin_interfaces` time layout: `int32 sec` then `uint32 nanosec`.
fn decode_time(cursor: &mut Cursor<'_>) -> Result<Record, CdrError> {
    let sec = cursor.read_i32()?;
    let nanosec = cursor.read_u32()?;

    let mut time = Record::with_capacity(2);
    time.insert("sec", Value::Int(sec.into()));
    time.insert("nanosec", Value::UInt(nanosec.into()));
    Ok(time)
}
