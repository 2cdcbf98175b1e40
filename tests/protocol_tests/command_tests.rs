//! Tests for command exchanges
//!
//! These tests verify:
//! - Each construction mode (args, decoded, encoded)
//! - Sides that were never supplied read back as None
//! - Lazy conversion results are cached
//! - Raw frames can be identified by opcode

use bytes::Bytes;
use sparkwire::{identify, pretty_raw, Command, ErrorCode, ObjectId, SparkError, Values};

// =============================================================================
// Helper Functions
// =============================================================================

fn write_value_args() -> Values {
    Values::new()
        .with("object_id", ObjectId::new([127u8, 7]).unwrap())
        .with("type", 6u16)
        .with("size", 10u16)
        .with("data", vec![0x0Fu8; 10])
}

fn write_value_req() -> Values {
    write_value_args().with("opcode", 2u8)
}

fn write_value_resp() -> Values {
    Values::new()
        .with("errcode", ErrorCode::Ok)
        .with("type", 6u16)
        .with("size", 10u16)
        .with("data", vec![0x0Fu8; 10])
}

fn encoded_pair() -> (Bytes, Bytes) {
    let spec = identify("WRITE_VALUE").unwrap();
    (
        spec.request.build(&write_value_args()).unwrap(),
        spec.response.build(&write_value_resp()).unwrap(),
    )
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_from_args_encodes_immediately() {
    let spec = identify("WRITE_VALUE").unwrap();
    let cmd = Command::from_args(spec, write_value_args()).unwrap();

    let encoded = cmd.encoded_request().unwrap().unwrap();
    assert_eq!(&encoded[1..3], &[0xFF, 0x07]);

    // decoded form matches parsing the encoded form
    let reparsed = spec.request.parse(encoded).unwrap();
    assert_eq!(cmd.decoded_request().unwrap(), Some(&reparsed));
    assert_eq!(reparsed, write_value_req());
}

#[test]
fn test_from_args_rejects_invalid_fields() {
    let spec = identify("WRITE_VALUE").unwrap();
    let mut args = write_value_args();
    args.remove("data");

    let err = Command::from_args(spec, args).unwrap_err();
    assert!(matches!(err, SparkError::MissingField { field: "data", .. }));
}

#[test]
fn test_from_decoded() {
    let spec = identify("WRITE_VALUE").unwrap();
    let cmd = Command::from_decoded(spec, Some(write_value_args()), None);

    assert!(cmd.encoded_request().unwrap().is_some());
    assert_eq!(cmd.decoded_request().unwrap(), Some(&write_value_args()));

    assert_eq!(cmd.encoded_response().unwrap(), None);
    assert_eq!(cmd.decoded_response().unwrap(), None);
}

#[test]
fn test_from_encoded() {
    let spec = identify("WRITE_VALUE").unwrap();
    let (request, response) = encoded_pair();

    let cmd = Command::from_encoded(spec, Some(request.clone()), Some(response.clone()));

    assert_eq!(cmd.encoded_request().unwrap(), Some(&request[..]));
    assert_eq!(cmd.encoded_response().unwrap(), Some(&response[..]));
    assert_eq!(cmd.decoded_request().unwrap(), Some(&write_value_req()));
    assert_eq!(cmd.decoded_response().unwrap(), Some(&write_value_resp()));
    assert_eq!(cmd.errcode().unwrap(), Some(ErrorCode::Ok));
}

#[test]
fn test_request_only() {
    let spec = identify("WRITE_VALUE").unwrap();
    let (request, _) = encoded_pair();

    let commands = [
        Command::from_encoded(spec, Some(request.clone()), None),
        Command::from_decoded(spec, Some(write_value_req()), None),
    ];

    for cmd in &commands {
        assert_eq!(cmd.encoded_request().unwrap(), Some(&request[..]));
        assert_eq!(cmd.decoded_request().unwrap(), Some(&write_value_req()));
        assert_eq!(cmd.encoded_response().unwrap(), None);
        assert_eq!(cmd.decoded_response().unwrap(), None);
        assert!(cmd.has_request());
        assert!(!cmd.has_response());
    }
}

#[test]
fn test_response_only() {
    let spec = identify("WRITE_VALUE").unwrap();
    let (_, response) = encoded_pair();

    let commands = [
        Command::from_encoded(spec, None, Some(response.clone())),
        Command::from_decoded(spec, None, Some(write_value_resp())),
    ];

    for cmd in &commands {
        assert_eq!(cmd.encoded_request().unwrap(), None);
        assert_eq!(cmd.decoded_request().unwrap(), None);
        assert_eq!(cmd.encoded_response().unwrap(), Some(&response[..]));
        assert_eq!(cmd.decoded_response().unwrap(), Some(&write_value_resp()));
        assert!(!cmd.has_request());
    }
}

#[test]
fn test_empty_command() {
    let cmd = Command::new(identify("RESET").unwrap());

    assert_eq!(cmd.encoded_request().unwrap(), None);
    assert_eq!(cmd.decoded_request().unwrap(), None);
    assert_eq!(cmd.errcode().unwrap(), None);
    assert_eq!(cmd.to_string(), "RESET(request=None, response=None)");
}

#[test]
fn test_empty_request_is_not_absent() {
    let spec = identify("CREATE_PROFILE").unwrap();
    let cmd = Command::from_decoded(spec, Some(Values::new()), None);

    assert_eq!(cmd.decoded_request().unwrap(), Some(&Values::new()));
    assert_eq!(cmd.encoded_request().unwrap(), Some(&[0x07u8][..]));
}

// =============================================================================
// Caching Tests
// =============================================================================

#[test]
fn test_derived_form_is_cached() {
    let spec = identify("WRITE_VALUE").unwrap();
    let (request, _) = encoded_pair();
    let cmd = Command::from_encoded(spec, Some(request), None);

    let first = cmd.decoded_request().unwrap().unwrap() as *const Values;
    let second = cmd.decoded_request().unwrap().unwrap() as *const Values;
    assert_eq!(first, second);
}

#[test]
fn test_bad_frame_fails_on_access() {
    let spec = identify("WRITE_VALUE").unwrap();
    let cmd = Command::from_encoded(spec, Some(Bytes::from_static(&[0x02, 0xFF])), None);

    // raw bytes are still available
    assert_eq!(cmd.encoded_request().unwrap(), Some(&[0x02u8, 0xFF][..]));

    let err = cmd.decoded_request().unwrap_err();
    assert!(err.is_framing());
}

#[test]
fn test_bad_values_fail_on_access() {
    let spec = identify("WRITE_VALUE").unwrap();
    let cmd = Command::from_decoded(spec, Some(Values::new().with("type", 6u16)), None);

    assert!(cmd.encoded_request().is_err());
    assert!(cmd.decoded_request().unwrap().is_some());
}

// =============================================================================
// Frame Identification Tests
// =============================================================================

#[test]
fn test_from_request_frame() {
    let (request, response) = encoded_pair();
    let cmd = Command::from_request_frame(request)
        .unwrap()
        .with_encoded_response(response);

    assert_eq!(cmd.name(), "WRITE_VALUE");
    assert_eq!(cmd.decoded_response().unwrap(), Some(&write_value_resp()));
}

#[test]
fn test_from_request_frame_unknown_opcode() {
    let err = Command::from_request_frame(Bytes::from_static(&[0x0D])).unwrap_err();
    assert!(err.is_lookup());

    let err = Command::from_request_frame(Bytes::new()).unwrap_err();
    assert!(err.is_framing());
}

#[test]
fn test_device_error_response() {
    let spec = identify("DELETE_OBJECT").unwrap();
    let cmd = Command::from_args(spec, Values::new().with("object_id", ObjectId::slot(4).unwrap()))
        .unwrap()
        .with_encoded_response(Bytes::from_static(&[0x09]));

    assert_eq!(cmd.errcode().unwrap(), Some(ErrorCode::ObjectNotDeletable));
    assert!(!cmd.errcode().unwrap().unwrap().is_ok());
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_pretty_raw() {
    assert_eq!(pretty_raw(Some(&[0xde, 0xad])), Some("dead".to_string()));
    assert_eq!(pretty_raw(Some(&[])), Some(String::new()));
    assert_eq!(pretty_raw(None), None);
}

#[test]
fn test_display() {
    let spec = identify("DELETE_OBJECT").unwrap();
    let cmd = Command::from_args(spec, Values::new().with("object_id", ObjectId::slot(4).unwrap()))
        .unwrap()
        .with_decoded_response(Values::new().with("errcode", ErrorCode::Ok));

    assert_eq!(cmd.to_string(), "DELETE_OBJECT(request=0404, response=00)");
}
