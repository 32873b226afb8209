use mcap2json_core::{Record, Value};
use mcap2json_ros2idl::{
    ENCAPSULATION_HEADER_SIZE, FieldDescriptor, IdlSchema, RecordMap, decode,
};
use serde_json::json;

// ── helpers ──────────────────────────────────────────────────────────────────

/// Pad a payload so its next byte lands on an `n`-byte boundary of the full
/// buffer, encapsulation header included.
fn align(buf: &mut Vec<u8>, n: usize) {
    let pad = (n - ((ENCAPSULATION_HEADER_SIZE + buf.len()) % n)) % n;
    buf.resize(buf.len() + pad, 0);
}

/// Build a minimal CDR buffer: 4-byte little-endian encapsulation header + payload.
fn cdr_with_payload(payload: Vec<u8>) -> Vec<u8> {
    let mut buf = vec![0x00, 0x01, 0x00, 0x00]; // CDR_LE encapsulation
    buf.extend(payload);
    buf
}

/// Append a length-prefixed string (NUL included in the count).
fn push_string(buf: &mut Vec<u8>, s: &str) {
    align(buf, 4);
    buf.extend(((s.len() + 1) as u32).to_le_bytes());
    buf.extend(s.as_bytes());
    buf.push(0);
}

fn fields(layout: &[(&str, &str)]) -> Vec<FieldDescriptor> {
    layout
        .iter()
        .map(|(ty, name)| FieldDescriptor::new(*ty, *name))
        .collect()
}

fn decode_flat(payload: Vec<u8>, layout: &[(&str, &str)]) -> Record {
    decode(&cdr_with_payload(payload), &fields(layout), &RecordMap::new())
}

// ── primitives ───────────────────────────────────────────────────────────────

#[test]
fn each_primitive_reads_back_its_value() {
    let cases: Vec<(&str, Vec<u8>, Value)> = vec![
        ("uint8", vec![0xFE], Value::UInt(254)),
        ("int8", vec![0xFE], Value::Int(-2)),
        ("uint16", 65_000u16.to_le_bytes().to_vec(), Value::UInt(65_000)),
        ("int16", (-300i16).to_le_bytes().to_vec(), Value::Int(-300)),
        ("uint32", 4_000_000_000u32.to_le_bytes().to_vec(), Value::UInt(4_000_000_000)),
        ("int32", (-70_000i32).to_le_bytes().to_vec(), Value::Int(-70_000)),
        ("uint64", u64::MAX.to_le_bytes().to_vec(), Value::UInt(u64::MAX)),
        ("int64", i64::MIN.to_le_bytes().to_vec(), Value::Int(i64::MIN)),
        ("float", 1.5f32.to_le_bytes().to_vec(), Value::Float(1.5)),
        ("double", (-0.25f64).to_le_bytes().to_vec(), Value::Float(-0.25)),
        ("boolean", vec![1], Value::Bool(true)),
    ];

    for (ty, bytes, expected) in cases {
        let mut payload = Vec::new();
        align(&mut payload, bytes.len());
        payload.extend(bytes);
        let record = decode_flat(payload, &[(ty, "v")]);
        assert_eq!(record.get("v"), Some(&expected), "type {ty}");
    }
}

#[test]
fn small_field_then_uint32_skips_padding() {
    let mut payload = vec![7u8];
    align(&mut payload, 4);
    payload.extend(0xDEADBEEFu32.to_le_bytes());

    let record = decode_flat(payload, &[("uint8", "a"), ("uint32", "b")]);
    assert_eq!(record.get("a"), Some(&Value::UInt(7)));
    assert_eq!(record.get("b"), Some(&Value::UInt(0xDEADBEEF)));
}

#[test]
fn uint64_after_header_is_read_at_offset_8() {
    let mut buf = vec![0x00, 0x01, 0x00, 0x00];
    buf.extend([0u8; 4]);
    buf.extend(0x1122334455667788u64.to_le_bytes());

    let record = decode(&buf, &fields(&[("uint64", "v")]), &RecordMap::new());
    assert_eq!(record.get("v"), Some(&Value::UInt(0x1122334455667788)));
}

#[test]
fn double_after_uint32_needs_no_padding() {
    // uint32 occupies bytes 4..8, so the double starts on the 8-byte boundary at 8.
    let mut buf = vec![0x00, 0x01, 0x00, 0x00];
    buf.extend(1u32.to_le_bytes());
    buf.extend(2.5f64.to_le_bytes());

    let record = decode(&buf, &fields(&[("uint32", "n"), ("double", "x")]), &RecordMap::new());
    assert_eq!(record.get("n"), Some(&Value::UInt(1)));
    assert_eq!(record.get("x"), Some(&Value::Float(2.5)));
}

// ── strings ──────────────────────────────────────────────────────────────────

#[test]
fn string_drops_trailing_nul() {
    let mut payload = Vec::new();
    push_string(&mut payload, "hello");
    let record = decode_flat(payload, &[("string", "s")]);
    assert_eq!(record.get("s").and_then(Value::as_str), Some("hello"));
}

#[test]
fn only_one_trailing_nul_is_dropped_and_prefix_sets_the_advance() {
    let mut payload = Vec::new();
    payload.extend(4u32.to_le_bytes());
    payload.extend(b"abc\0");
    payload.extend(3u32.to_le_bytes());
    payload.extend(b"a\0\0");
    align(&mut payload, 4);
    payload.extend(9u32.to_le_bytes());

    let record = decode_flat(payload, &[("string", "s"), ("string", "t"), ("uint32", "n")]);
    assert_eq!(record.get("s").and_then(Value::as_str), Some("abc"));
    assert_eq!(record.get("t").and_then(Value::as_str), Some("a\0"));
    assert_eq!(record.get("n"), Some(&Value::UInt(9)));
}

#[test]
fn zero_length_string_is_empty_and_next_field_follows_prefix() {
    let mut payload = Vec::new();
    payload.extend(0u32.to_le_bytes());
    payload.extend(99u32.to_le_bytes());

    let record = decode_flat(payload, &[("string", "s"), ("uint32", "n")]);
    assert_eq!(record.get("s").and_then(Value::as_str), Some(""));
    assert_eq!(record.get("n"), Some(&Value::UInt(99)));
}

#[test]
fn invalid_utf8_is_replaced_not_rejected() {
    let mut payload = Vec::new();
    payload.extend(3u32.to_le_bytes());
    payload.extend([b'a', 0xFF, 0]);

    let record = decode_flat(payload, &[("string", "s")]);
    let s = record.get("s").and_then(Value::as_str).unwrap();
    assert!(s.starts_with('a'));
    assert!(s.contains('\u{FFFD}'));
}

#[test]
fn oversized_length_prefix_aborts_the_record() {
    let mut payload = Vec::new();
    payload.extend(100u32.to_le_bytes());
    payload.extend(b"abc");

    let record = decode_flat(payload, &[("string", "s"), ("uint8", "after")]);
    assert_eq!(record.len(), 1);
    match record.get("s") {
        Some(Value::Error(reason)) => assert!(reason.contains("exceeds")),
        other => panic!("expected error placeholder, got {other:?}"),
    }
}

// ── truncation ───────────────────────────────────────────────────────────────

#[test]
fn exhausted_buffer_omits_remaining_fields() {
    let mut payload = Vec::new();
    payload.extend(1u32.to_le_bytes());
    payload.extend(2u32.to_le_bytes());

    let record = decode_flat(payload, &[("uint32", "a"), ("uint32", "b"), ("uint32", "c")]);
    assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn partial_primitive_becomes_error_placeholder() {
    let record = decode_flat(vec![1, 2], &[("uint32", "a"), ("uint32", "b")]);
    assert_eq!(record.len(), 1);
    assert!(matches!(record.get("a"), Some(Value::Error(_))));
}

#[test]
fn buffer_shorter_than_header_decodes_to_nothing() {
    let record = decode(&[0x00, 0x01], &fields(&[("uint8", "a")]), &RecordMap::new());
    assert!(record.is_empty());
}

// ── synthetic types ──────────────────────────────────────────────────────────

#[test]
fn header_decodes_stamp_and_frame_id() {
    let mut payload = Vec::new();
    payload.extend(100i32.to_le_bytes());
    payload.extend(200u32.to_le_bytes());
    push_string(&mut payload, "base_link");

    let record = decode_flat(payload, &[("Header", "header")]);
    assert_eq!(
        record.to_json(),
        json!({
            "header": {
                "stamp": { "sec": 100, "nanosec": 200 },
                "frame_id": "base_link"
            }
        })
    );
}

#[test]
fn time_field_decodes_sec_and_nanosec() {
    let mut payload = vec![1u8];
    align(&mut payload, 4);
    payload.extend((-5i32).to_le_bytes());
    payload.extend(7u32.to_le_bytes());

    let record = decode_flat(payload, &[("uint8", "flag"), ("Time", "stamp")]);
    assert_eq!(record.to_json()["stamp"], json!({ "sec": -5, "nanosec": 7 }));
}

// ── nested records ───────────────────────────────────────────────────────────

#[test]
fn unknown_type_is_placeholder_and_cursor_stays() {
    let payload = 42u32.to_le_bytes().to_vec();
    let record = decode_flat(payload, &[("pkg_msg_Unknown", "mystery"), ("uint32", "n")]);

    assert_eq!(
        record.get("mystery"),
        Some(&Value::Unresolved("pkg_msg_Unknown".to_string()))
    );
    assert_eq!(record.to_json()["mystery"], json!("<pkg_msg_Unknown>"));
    assert_eq!(record.get("n"), Some(&Value::UInt(42)));
}

#[test]
fn nested_record_is_decoded_and_outer_cursor_advances() {
    let mut records = RecordMap::new();
    records.insert("Inner", fields(&[("uint32", "value"), ("string", "label")]));

    let mut payload = vec![7u8];
    align(&mut payload, 4);
    payload.extend(42u32.to_le_bytes());
    push_string(&mut payload, "ab");
    align(&mut payload, 2);
    payload.extend(0x1234u16.to_le_bytes());

    let record = decode(
        &cdr_with_payload(payload),
        &fields(&[
            ("uint8", "flag"),
            ("pkg_msg_Inner", "inner"),
            ("uint16", "after"),
        ]),
        &records,
    );
    assert_eq!(
        record.to_json(),
        json!({
            "flag": 7,
            "inner": { "value": 42, "label": "ab" },
            "after": 0x1234
        })
    );
}

#[test]
fn fault_inside_nested_record_stays_local() {
    let mut records = RecordMap::new();
    records.insert("Inner", fields(&[("uint16", "a"), ("uint64", "b")]));

    let mut payload = Vec::new();
    payload.extend(5u16.to_le_bytes());
    payload.extend([0u8; 3]);

    let record = decode(
        &cdr_with_payload(payload),
        &fields(&[("Inner", "inner")]),
        &records,
    );
    let inner = record.get("inner").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("a"), Some(&Value::UInt(5)));
    assert!(matches!(inner.get("b"), Some(Value::Error(_))));
}

#[test]
fn self_referential_record_terminates() {
    let schema = IdlSchema::parse("pkg/msg/Loop", "struct Loop { Loop next; uint8 x; };");
    let bytes = cdr_with_payload(vec![3, 4]);

    let record = schema.decode(&bytes);
    let next = record.get("next").and_then(Value::as_record).unwrap();
    assert_eq!(next.get("next"), Some(&Value::Unresolved("Loop".to_string())));
    assert_eq!(next.get("x"), Some(&Value::UInt(3)));
}

// ── end to end ───────────────────────────────────────────────────────────────

#[test]
fn idl_schema_decodes_namespaced_message() {
    let idl = r#"
module demo_msgs {
  module msg {
    struct Reading {
      std_msgs::msg::Header header;
      float32 temperature;
      boolean valid;
    };
  };
};
"#;
    let schema = IdlSchema::parse("demo_msgs/msg/Reading", idl);

    let mut payload = Vec::new();
    payload.extend(1i32.to_le_bytes());
    payload.extend(2u32.to_le_bytes());
    push_string(&mut payload, "map");
    align(&mut payload, 4);
    payload.extend(21.5f32.to_le_bytes());
    payload.push(1);

    let record = schema.decode(&cdr_with_payload(payload));
    assert_eq!(
        record.to_json(),
        json!({
            "header": { "stamp": { "sec": 1, "nanosec": 2 }, "frame_id": "map" },
            "temperature": 21.5,
            "valid": true
        })
    );
}
