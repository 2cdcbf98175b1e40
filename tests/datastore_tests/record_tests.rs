//! Tests for ObjectRecord

use serde_json::json;
use sparkwire::payload::{self, ONE_WIRE_TEMP_SENSOR};
use sparkwire::{DataStore, MemoryDataStore, ObjectRecord, SparkError};

use super::behaviour::obj;

#[test]
fn test_document_shape() {
    let record = ObjectRecord::from_document(obj()).unwrap();

    assert_eq!(record.service_id, "pancakes");
    assert_eq!(record.obj_type, ONE_WIRE_TEMP_SENSOR);
    assert_eq!(record.to_document().unwrap(), obj());
}

#[test]
fn test_from_payload() {
    let object = json!({"settings": {"address": "KP7p/ggAABc=", "offset": 12}});
    let encoded = payload::encode(ONE_WIRE_TEMP_SENSOR, object.as_object().unwrap()).unwrap();

    let record = ObjectRecord::from_payload("probe", ONE_WIRE_TEMP_SENSOR, &encoded).unwrap();
    assert_eq!(record.object, *object.as_object().unwrap());
    assert_eq!(record.encode_payload().unwrap(), encoded);
}

#[test]
fn test_from_payload_unknown_type() {
    let err = ObjectRecord::from_payload("probe", 999, &[0x00u8]).unwrap_err();
    assert!(matches!(err, SparkError::UnknownObjectType(999)));
}

#[test]
fn test_invalid_document() {
    assert!(matches!(
        ObjectRecord::from_document(json!({"service_id": "x"})),
        Err(SparkError::InvalidDocument(_))
    ));
}

#[test]
fn test_store_and_recover() {
    let store = MemoryDataStore::new();
    let record = ObjectRecord::from_document(obj()).unwrap();
    store
        .insert_unique("service_id", record.to_document().unwrap())
        .unwrap();

    let found = store.find_by_key("service_id", json!("pancakes")).unwrap();
    let recovered = ObjectRecord::from_document(found[0].clone()).unwrap();
    assert_eq!(recovered, record);
    assert!(recovered.encode_payload().is_ok());
}
