//! Tests for command layouts
//!
//! These tests verify:
//! - build/parse round-trips for every command
//! - Byte-exact frames for known requests
//! - Validation errors before any bytes are produced
//! - Framing errors on short or overlong frames

use serde_json::json;
use sparkwire::protocol::values_to_json;
use sparkwire::{identify, CommandIndex, ErrorCode, ObjectId, SparkError, Value, Values};

// =============================================================================
// Helper Functions
// =============================================================================

fn id(segments: &[u8]) -> ObjectId {
    ObjectId::try_from(segments).unwrap()
}

fn object_entry(slot: u8, data: &[u8]) -> Values {
    Values::new()
        .with("object_id", id(&[slot]))
        .with("type", 6u16)
        .with("size", data.len() as u16)
        .with("data", data.to_vec())
}

/// A valid request for each command, opcode omitted
fn sample_request(name: &str) -> Values {
    match name {
        "READ_VALUE" | "READ_SYSTEM_VALUE" => Values::new()
            .with("object_id", id(&[3]))
            .with("type", 6u16)
            .with("size", 10u16),
        "WRITE_VALUE" | "WRITE_SYSTEM_VALUE" => Values::new()
            .with("object_id", id(&[127, 7]))
            .with("type", 6u16)
            .with("size", 4u16)
            .with("data", vec![1u8, 2, 3, 4]),
        "CREATE_OBJECT" => Values::new()
            .with("type", 10u16)
            .with("size", 2u16)
            .with("data", vec![0x01u8, 0x00]),
        "DELETE_OBJECT" | "FREE_SLOT" | "FREE_SLOT_ROOT" => {
            Values::new().with("object_id", id(&[1, 2, 3]))
        }
        "LIST_OBJECTS" | "DELETE_PROFILE" | "ACTIVATE_PROFILE" => {
            Values::new().with("profile_id", 2u8)
        }
        "LOG_VALUES" => Values::new().with("flags", 1u8).with("object_id", id(&[9])),
        "RESET" => Values::new().with("flags", 0u8),
        "CREATE_PROFILE" | "LIST_PROFILES" => Values::new(),
        other => panic!("no sample for {}", other),
    }
}

/// A valid response for each command
fn sample_response(name: &str) -> Values {
    let ok = Values::new().with("errcode", ErrorCode::Ok);
    match name {
        "READ_VALUE" | "READ_SYSTEM_VALUE" | "WRITE_VALUE" | "WRITE_SYSTEM_VALUE" => ok
            .with("type", 6u16)
            .with("size", 3u16)
            .with("data", vec![7u8, 8, 9]),
        "CREATE_OBJECT" => ok.with("object_id", id(&[4, 1])),
        "LIST_OBJECTS" | "LOG_VALUES" => ok.with(
            "objects",
            vec![object_entry(1, &[0xAA]), object_entry(2, &[0xBB, 0xCC])],
        ),
        "CREATE_PROFILE" => ok.with("profile_id", 3u8),
        "LIST_PROFILES" => ok.with("profile_id", 1u8).with(
            "profiles",
            vec![
                Values::new().with("profile_id", 0u8),
                Values::new().with("profile_id", 1u8),
            ],
        ),
        _ => ok,
    }
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_request_roundtrip_every_command() {
    for spec in CommandIndex::global().unwrap().iter() {
        let request = sample_request(spec.name);
        let frame = spec.request.build(&request).unwrap();

        assert_eq!(frame[0], spec.opcode_byte(), "{}", spec.name);

        let parsed = spec.request.parse(&frame).unwrap();
        let expected = request.with("opcode", spec.opcode_byte());
        assert_eq!(parsed, expected, "{}", spec.name);
    }
}

#[test]
fn test_response_roundtrip_every_command() {
    for spec in CommandIndex::global().unwrap().iter() {
        let response = sample_response(spec.name);
        let frame = spec.response.build(&response).unwrap();
        assert_eq!(spec.response.parse(&frame).unwrap(), response, "{}", spec.name);
    }
}

#[test]
fn test_optional_field_absent_stays_absent() {
    let spec = identify("LOG_VALUES").unwrap();
    let request = Values::new().with("flags", 1u8);

    let frame = spec.request.build(&request).unwrap();
    assert_eq!(&frame[..], &[0x0A, 0x01]);

    let parsed = spec.request.parse(&frame).unwrap();
    assert!(!parsed.contains("object_id"));
    assert_eq!(parsed.uint("flags"), Some(1));
}

#[test]
fn test_empty_group_roundtrip() {
    let spec = identify("LIST_OBJECTS").unwrap();
    let response = Values::new()
        .with("errcode", ErrorCode::Ok)
        .with("objects", Vec::<Values>::new());

    let frame = spec.response.build(&response).unwrap();
    assert_eq!(&frame[..], &[0x00]);
    assert_eq!(spec.response.parse(&frame).unwrap(), response);
}

// =============================================================================
// Byte Layout Tests
// =============================================================================

#[test]
fn test_write_value_nested_address_bytes() {
    let spec = identify("WRITE_VALUE").unwrap();
    let request = Values::new()
        .with("object_id", id(&[127, 7]))
        .with("type", 6u16)
        .with("size", 10u16)
        .with("data", vec![0x0Fu8; 10]);

    let frame = spec.request.build(&request).unwrap();

    assert_eq!(frame[0], 0x02);
    assert_eq!(&frame[1..3], &[0xFF, 0x07]);
    assert_eq!(&frame[3..5], &[0x06, 0x00]);
    assert_eq!(&frame[5..7], &[0x0A, 0x00]);
    assert_eq!(&frame[7..], &[0x0F; 10]);

    let parsed = spec.request.parse(&frame).unwrap();
    assert_eq!(parsed.object_id("object_id"), Some(&id(&[127, 7])));
    assert_eq!(parsed.data("data"), Some(&[0x0Fu8; 10][..]));
}

#[test]
fn test_read_value_flat_address_bytes() {
    let spec = identify("READ_VALUE").unwrap();
    let frame = spec.request.build(&sample_request("READ_VALUE")).unwrap();
    assert_eq!(&frame[..], &[0x01, 0x03, 0x06, 0x00, 0x0A, 0x00]);
}

#[test]
fn test_u16_fields_are_little_endian() {
    let spec = identify("READ_VALUE").unwrap();
    let request = Values::new()
        .with("object_id", id(&[1]))
        .with("type", 0x1234u16)
        .with("size", 0xFFFFu16);

    let frame = spec.request.build(&request).unwrap();
    assert_eq!(&frame[2..], &[0x34, 0x12, 0xFF, 0xFF]);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_missing_required_field() {
    let spec = identify("WRITE_VALUE").unwrap();
    let mut request = sample_request("WRITE_VALUE");
    request.remove("type");

    let err = spec.request.build(&request).unwrap_err();
    assert!(matches!(
        err,
        SparkError::MissingField { field: "type", .. }
    ));
}

#[test]
fn test_required_fields_listing() {
    let spec = identify("WRITE_VALUE").unwrap();
    let required: Vec<_> = spec.request.required_fields().collect();
    assert_eq!(required, vec!["object_id", "type", "size", "data"]);

    let log = identify("LOG_VALUES").unwrap();
    assert_eq!(log.request.required_fields().collect::<Vec<_>>(), vec!["flags"]);
}

#[test]
fn test_unknown_field_rejected() {
    let spec = identify("DELETE_OBJECT").unwrap();
    let request = sample_request("DELETE_OBJECT").with("pancakes", 1u8);

    assert!(matches!(
        spec.request.build(&request),
        Err(SparkError::InvalidField { .. })
    ));
}

#[test]
fn test_size_must_match_data() {
    let spec = identify("WRITE_VALUE").unwrap();
    let request = sample_request("WRITE_VALUE").with("size", 5u16);

    assert!(matches!(
        spec.request.build(&request),
        Err(SparkError::InvalidField { .. })
    ));
}

#[test]
fn test_wrong_opcode_rejected() {
    let spec = identify("RESET").unwrap();
    let request = sample_request("RESET").with("opcode", 0x02u8);
    assert!(spec.request.build(&request).is_err());

    let matching = sample_request("RESET").with("opcode", 0x0Bu8);
    assert_eq!(&spec.request.build(&matching).unwrap()[..], &[0x0B, 0x00]);
}

#[test]
fn test_narrowing_overflow_rejected() {
    let spec = identify("ACTIVATE_PROFILE").unwrap();
    let request = Values::new().with("profile_id", 256u32);
    assert!(matches!(
        spec.request.build(&request),
        Err(SparkError::InvalidField { .. })
    ));
}

#[test]
fn test_wrong_value_kind_rejected() {
    let spec = identify("DELETE_OBJECT").unwrap();
    let request = Values::new().with("object_id", 3u8);
    assert!(spec.request.build(&request).is_err());
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_truncated_frame_reports_offset() {
    let spec = identify("READ_VALUE").unwrap();
    let err = spec.request.parse(&[0x01, 0x03, 0x06]).unwrap_err();

    assert!(err.is_framing());
    assert!(matches!(
        err,
        SparkError::Truncated { offset: 2, expected: 2, actual: 1, .. }
    ));
}

#[test]
fn test_short_data_is_truncation() {
    let spec = identify("READ_VALUE").unwrap();
    let err = spec.response.parse(&[0x00, 0x06, 0x00, 0x04, 0x00, 0xAA]).unwrap_err();
    assert!(matches!(err, SparkError::Truncated { offset: 5, expected: 4, actual: 1, .. }));
}

#[test]
fn test_trailing_bytes_rejected() {
    let spec = identify("DELETE_OBJECT").unwrap();
    let err = spec.request.parse(&[0x04, 0x01, 0x99]).unwrap_err();
    assert!(matches!(err, SparkError::TrailingBytes { offset: 2, count: 1 }));
}

#[test]
fn test_opcode_mismatch_on_parse() {
    let spec = identify("DELETE_OBJECT").unwrap();
    assert!(spec.request.parse(&[0x06, 0x01]).is_err());
}

#[test]
fn test_device_error_code_is_data() {
    let spec = identify("DELETE_OBJECT").unwrap();

    let parsed = spec.response.parse(&[0x09]).unwrap();
    assert_eq!(parsed.errcode("errcode"), Some(ErrorCode::ObjectNotDeletable));

    let parsed = spec.response.parse(&[0xC8]).unwrap();
    assert_eq!(parsed.errcode("errcode"), Some(ErrorCode::Unknown(200)));
}

// =============================================================================
// JSON Boundary Tests
// =============================================================================

#[test]
fn test_values_from_json() {
    let spec = identify("WRITE_VALUE").unwrap();
    let json = json!({
        "object_id": [127, 7],
        "type": 6,
        "size": 2,
        "data": "0f0f",
    });

    let values = spec.request.values_from_json(json.as_object().unwrap()).unwrap();
    assert_eq!(values.object_id("object_id"), Some(&id(&[127, 7])));
    assert_eq!(values.data("data"), Some(&[0x0Fu8, 0x0F][..]));

    let flat = json!({"object_id": 5});
    let values = identify("DELETE_OBJECT")
        .unwrap()
        .request
        .values_from_json(flat.as_object().unwrap())
        .unwrap();
    assert_eq!(values.object_id("object_id"), Some(&id(&[5])));
}

#[test]
fn test_values_to_json() {
    let spec = identify("LIST_OBJECTS").unwrap();
    let response = sample_response("LIST_OBJECTS");

    let json = values_to_json(&response);
    assert_eq!(json["errcode"], json!("OK"));
    assert_eq!(json["objects"][1]["data"], json!("bbcc"));
    assert_eq!(json["objects"][0]["object_id"], json!([1]));

    let back = spec.response.values_from_json(&json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn test_values_from_json_rejects_bad_input() {
    let spec = identify("WRITE_VALUE").unwrap();

    let bad_hex = json!({"data": "zz"});
    assert!(spec.request.values_from_json(bad_hex.as_object().unwrap()).is_err());

    let unknown = json!({"pancakes": 1});
    assert!(spec.request.values_from_json(unknown.as_object().unwrap()).is_err());

    let bad_segment = json!({"object_id": [1, 300]});
    assert!(spec.request.values_from_json(bad_segment.as_object().unwrap()).is_err());
}

#[test]
fn test_value_accessors() {
    let values = sample_request("WRITE_VALUE");
    assert_eq!(values.get("type"), Some(&Value::Uint(6)));
    assert_eq!(values.uint("object_id"), None);
    assert_eq!(values.len(), 4);
}
