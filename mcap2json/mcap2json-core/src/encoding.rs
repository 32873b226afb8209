//! Schema and message encodings from the MCAP well-known registry.
//! <https://mcap.dev/spec/registry>
//!
//! Unknown strings round-trip through the `Unknown` variant, so the original
//! text can always be echoed back into output records.

use std::fmt;

macro_rules! registry_encoding {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// Unknown/custom encoding
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)*
                    Self::Unknown(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($text => Self::$variant,)*
                    other => Self::Unknown(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

registry_encoding! {
    /// Encoding of a channel's message payloads.
    MessageEncoding {
        Ros1 => "ros1",
        /// CDR, used by ROS 2.
        Cdr => "cdr",
        Protobuf => "protobuf",
        FlatBuffer => "flatbuffer",
        Cbor => "cbor",
        MsgPack => "msgpack",
        Json => "json",
    }
}

registry_encoding! {
    /// Encoding of a schema record's data.
    SchemaEncoding {
        /// No schema (self-describing formats like JSON).
        None => "",
        Protobuf => "protobuf",
        FlatBuffer => "flatbuffer",
        Ros1Msg => "ros1msg",
        Ros2Msg => "ros2msg",
        /// ROS 2 IDL text, the input of the fallback decoder.
        Ros2Idl => "ros2idl",
        OmgIdl => "omgidl",
        JsonSchema => "jsonschema",
    }
}

impl SchemaEncoding {
    /// Whether the schema data is IDL text the fallback decoder can read.
    pub fn is_ros2_idl(&self) -> bool {
        matches!(self, Self::Ros2Idl)
    }
}
