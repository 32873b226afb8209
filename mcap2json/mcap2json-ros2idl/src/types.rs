//! Type names: the fixed CDR primitive table and field-type normalization.

/// Normalized name of the length-prefixed UTF-8 string type.
pub const STRING_TYPE: &str = "string";
/// Normalized name of the synthetic `std_msgs/Header` type.
pub const HEADER_TYPE: &str = "Header";
/// Normalized name of the synthetic `builtin_interfaces/Time` type.
pub const TIME_TYPE: &str = "Time";
/// Normalized name of the synthetic `builtin_interfaces/Duration` type.
pub const DURATION_TYPE: &str = "Duration";

/// Suffix that replaces an array bracket on a field type.
pub const ARRAY_SUFFIX: &str = "_array";

/// Fixed-size scalar types readable straight off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Bool,
}

/// Canonical primitive name → primitive. Process-wide, never derived at runtime.
const PRIMITIVE_TABLE: [(&str, PrimitiveType); 11] = [
    ("uint8", PrimitiveType::U8),
    ("int8", PrimitiveType::I8),
    ("uint16", PrimitiveType::U16),
    ("int16", PrimitiveType::I16),
    ("uint32", PrimitiveType::U32),
    ("int32", PrimitiveType::I32),
    ("uint64", PrimitiveType::U64),
    ("int64", PrimitiveType::I64),
    ("float", PrimitiveType::F32),
    ("double", PrimitiveType::F64),
    ("boolean", PrimitiveType::Bool),
];

/// Spellings mapped onto canonical names after `::` collapsing.
const TYPE_ALIASES: [(&str, &str); 12] = [
    ("octet", "uint8"),
    ("byte", "uint8"),
    ("char", "uint8"),
    ("bool", "boolean"),
    ("float32", "float"),
    ("float64", "double"),
    ("std_msgs_Header", HEADER_TYPE),
    ("std_msgs_msg_Header", HEADER_TYPE),
    ("builtin_interfaces_Time", TIME_TYPE),
    ("builtin_interfaces_msg_Time", TIME_TYPE),
    ("builtin_interfaces_Duration", DURATION_TYPE),
    ("builtin_interfaces_msg_Duration", DURATION_TYPE),
];

impl PrimitiveType {
    /// Look up a normalized type name in the primitive table.
    pub fn from_name(name: &str) -> Option<Self> {
        PRIMITIVE_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
    }

    /// Encoded size in bytes.
    pub fn size(self) -> usize {
        match self {
            PrimitiveType::U8 | PrimitiveType::I8 | PrimitiveType::Bool => 1,
            PrimitiveType::U16 | PrimitiveType::I16 => 2,
            PrimitiveType::U32 | PrimitiveType::I32 | PrimitiveType::F32 => 4,
            PrimitiveType::U64 | PrimitiveType::I64 | PrimitiveType::F64 => 8,
        }
    }

    /// Alignment requirement; always equal to the size for CDR primitives.
    pub fn align(self) -> usize {
        self.size()
    }
}

/// Normalize a raw IDL type token.
///
/// `::` separators collapse to `_`, a trailing `[...]` becomes [`ARRAY_SUFFIX`],
/// and known aliases map to canonical names. Total and pure: every input has
/// exactly one output.
pub fn normalize_type_name(raw: &str) -> String {
    let mut name = raw.trim().replace("::", "_");
    if let Some(open) = name.find('[')
        && name.ends_with(']')
    {
        name.truncate(open);
        name.push_str(ARRAY_SUFFIX);
    }
    match TYPE_ALIASES.iter().find(|(alias, _)| *alias == name) {
        Some((_, canonical)) => canonical.to_string(),
        None => name,
    }
}

/// Whether a normalized type is decoded with the hard-coded header layout.
pub fn is_header_type(name: &str) -> bool {
    name == HEADER_TYPE || name.ends_with(HEADER_TYPE)
}

/// Whether a normalized type is decoded as a `{sec, nanosec}` pair.
pub fn is_time_type(name: &str) -> bool {
    name == TIME_TYPE || name == DURATION_TYPE
}
