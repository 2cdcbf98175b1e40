//! Payload Module
//!
//! Object value bodies carried in the `data` field of command frames.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────┬──────────────────────────────┐
//! │ Len (varint) │ Body (protobuf, Len bytes)   │
//! └──────────────┴──────────────────────────────┘
//! ```
//!
//! The body schema is selected by the object type tag. Bytes after the
//! declared length are ignored on decode.
//!
//! ### Registered Types
//! - 6:  OneWireTempSensor
//! - 10: OneWireBus

mod codec;
pub mod messages;
pub mod varint;

pub use codec::{
    decode, encode, registered_types, transcoder, ObjectType, PayloadMap, ProtobufTranscoder,
    RawPayload, Transcoder, ONE_WIRE_BUS, ONE_WIRE_TEMP_SENSOR,
};
