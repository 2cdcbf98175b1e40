//! Payload codec
//!
//! Maps an object type tag to its transcoder and converts between JSON
//! mappings and length-delimited protobuf bodies.

use std::borrow::Cow;
use std::marker::PhantomData;

use prost::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SparkError};

use super::messages::{OneWireBus, OneWireTempSensor};
use super::varint::{put_varint, read_varint, varint_len};

/// Object type tag as carried in the `type` field of command frames
pub type ObjectType = u16;

/// Structured payload mapping (field name -> value)
pub type PayloadMap = Map<String, Value>;

/// Converts one object type between mapping and wire form
pub trait Transcoder: Send + Sync {
    /// Object type tag this transcoder is bound to
    fn object_type(&self) -> ObjectType;

    /// Human readable type name
    fn type_name(&self) -> &'static str;

    /// Encode a mapping to `[varint len][body]`
    fn encode(&self, values: &PayloadMap) -> Result<Vec<u8>>;

    /// Decode `[varint len][body]`, ignoring bytes past the declared length
    fn decode(&self, encoded: &[u8]) -> Result<PayloadMap>;
}

/// Transcoder backed by a prost message
pub struct ProtobufTranscoder<M> {
    obj_type: ObjectType,
    name: &'static str,
    _message: PhantomData<fn() -> M>,
}

impl<M> ProtobufTranscoder<M> {
    const fn new(obj_type: ObjectType, name: &'static str) -> Self {
        Self {
            obj_type,
            name,
            _message: PhantomData,
        }
    }
}

impl<M> Transcoder for ProtobufTranscoder<M>
where
    M: Message + Default + Serialize + DeserializeOwned,
{
    fn object_type(&self) -> ObjectType {
        self.obj_type
    }

    fn type_name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, values: &PayloadMap) -> Result<Vec<u8>> {
        let message: M = serde_json::from_value(Value::Object(values.clone())).map_err(|e| {
            SparkError::InvalidPayload {
                obj_type: self.obj_type,
                reason: e.to_string(),
            }
        })?;

        let body_len = message.encoded_len();
        let mut buf = Vec::with_capacity(varint_len(body_len as u64) + body_len);
        put_varint(&mut buf, body_len as u64);
        message
            .encode(&mut buf)
            .map_err(|e| SparkError::InvalidPayload {
                obj_type: self.obj_type,
                reason: e.to_string(),
            })?;

        tracing::trace!(
            obj_type = self.obj_type,
            body_len,
            "encoded {} payload",
            self.name
        );
        Ok(buf)
    }

    fn decode(&self, encoded: &[u8]) -> Result<PayloadMap> {
        let (declared, prefix_len) = read_varint(encoded)?;
        let available = encoded.len() - prefix_len;

        if declared > available as u64 {
            return Err(SparkError::Truncated {
                what: "payload body",
                offset: prefix_len,
                expected: declared as usize,
                actual: available,
            });
        }

        let body = &encoded[prefix_len..prefix_len + declared as usize];
        let message = M::decode(body).map_err(|e| SparkError::PayloadDecode {
            obj_type: self.obj_type,
            reason: e.to_string(),
        })?;

        match serde_json::to_value(&message)? {
            Value::Object(map) => Ok(map),
            other => Err(SparkError::PayloadDecode {
                obj_type: self.obj_type,
                reason: format!("expected an object mapping, got {}", other),
            }),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// OneWire temperature sensor
pub const ONE_WIRE_TEMP_SENSOR: ObjectType = 6;

/// OneWire bus master
pub const ONE_WIRE_BUS: ObjectType = 10;

static ONE_WIRE_TEMP_SENSOR_CODEC: ProtobufTranscoder<OneWireTempSensor> =
    ProtobufTranscoder::new(ONE_WIRE_TEMP_SENSOR, "OneWireTempSensor");

static ONE_WIRE_BUS_CODEC: ProtobufTranscoder<OneWireBus> =
    ProtobufTranscoder::new(ONE_WIRE_BUS, "OneWireBus");

/// Look up the transcoder for an object type
pub fn transcoder(obj_type: ObjectType) -> Result<&'static dyn Transcoder> {
    match obj_type {
        ONE_WIRE_TEMP_SENSOR => Ok(&ONE_WIRE_TEMP_SENSOR_CODEC),
        ONE_WIRE_BUS => Ok(&ONE_WIRE_BUS_CODEC),
        _ => Err(SparkError::UnknownObjectType(obj_type)),
    }
}

/// All registered object types, ascending
pub fn registered_types() -> &'static [ObjectType] {
    &[ONE_WIRE_TEMP_SENSOR, ONE_WIRE_BUS]
}

// =============================================================================
// Entry points
// =============================================================================

/// Encoded payload as handed over by a transport
///
/// Upstream transports deliver either a byte buffer or a list of
/// byte-sized integers (e.g. a JSON array); both decode the same way.
#[derive(Debug, Clone, Copy)]
pub enum RawPayload<'a> {
    Bytes(&'a [u8]),
    List(&'a [Value]),
}

impl<'a> RawPayload<'a> {
    /// Materialize as bytes, validating list entries are 0..=255
    pub fn to_bytes(self) -> Result<Cow<'a, [u8]>> {
        match self {
            RawPayload::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            RawPayload::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_u64()
                        .filter(|b| *b <= u8::MAX as u64)
                        .map(|b| b as u8)
                        .ok_or_else(|| SparkError::InvalidByte {
                            index: i,
                            value: item.to_string(),
                        })
                })
                .collect::<Result<Vec<u8>>>()
                .map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a [u8]> for RawPayload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawPayload::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for RawPayload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        RawPayload::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for RawPayload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        RawPayload::Bytes(bytes)
    }
}

impl<'a> From<&'a bytes::Bytes> for RawPayload<'a> {
    fn from(bytes: &'a bytes::Bytes) -> Self {
        RawPayload::Bytes(bytes)
    }
}

impl<'a> From<&'a [Value]> for RawPayload<'a> {
    fn from(items: &'a [Value]) -> Self {
        RawPayload::List(items)
    }
}

impl<'a> From<&'a Vec<Value>> for RawPayload<'a> {
    fn from(items: &'a Vec<Value>) -> Self {
        RawPayload::List(items)
    }
}

/// Encode an object mapping for `obj_type`
pub fn encode(obj_type: ObjectType, values: &PayloadMap) -> Result<Vec<u8>> {
    transcoder(obj_type)?.encode(values)
}

/// Decode an object payload for `obj_type`
pub fn decode<'a>(obj_type: ObjectType, encoded: impl Into<RawPayload<'a>>) -> Result<PayloadMap> {
    let codec = transcoder(obj_type)?;
    let bytes = encoded.into().to_bytes()?;
    codec.decode(&bytes)
}
