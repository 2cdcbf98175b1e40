//! Object payload messages
//!
//! Protobuf bodies for each registered object type. The serde attributes
//! give the JSON mapping form: camelCase keys, base64 `bytes`, 64-bit
//! integers as strings, default scalars omitted, unknown keys rejected.

use serde::{Deserialize, Serialize};

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Base64 (standard alphabet) representation of protobuf `bytes`
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Repeated 64-bit integers as decimal strings, the way protobuf JSON
/// writes them. Numbers are accepted on input too.
mod u64_strings {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(values: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(u64::to_string))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(|repr| match repr {
                Repr::Number(n) => Ok(n),
                Repr::Text(text) => text.parse().map_err(D::Error::custom),
            })
            .collect()
    }
}

// =============================================================================
// OneWireTempSensor (type 6)
// =============================================================================

/// Temperature sensor on a OneWire bus
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct OneWireTempSensor {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<one_wire_temp_sensor::Settings>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<one_wire_temp_sensor::State>,
}

pub mod one_wire_temp_sensor {
    use super::{base64_bytes, is_default};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default, deny_unknown_fields)]
    pub struct Settings {
        /// 64-bit OneWire ROM address
        #[prost(bytes = "vec", tag = "1")]
        #[serde(with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
        pub address: Vec<u8>,

        /// Calibration offset in 1/256 degrees
        #[prost(sint32, tag = "2")]
        #[serde(skip_serializing_if = "is_default")]
        pub offset: i32,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default, deny_unknown_fields)]
    pub struct State {
        /// Temperature in 1/256 degrees
        #[prost(sint32, tag = "1")]
        #[serde(skip_serializing_if = "is_default")]
        pub value: i32,

        #[prost(bool, tag = "2")]
        #[serde(skip_serializing_if = "is_default")]
        pub connected: bool,
    }
}

// =============================================================================
// OneWireBus (type 10)
// =============================================================================

/// OneWire bus master and its enumerated devices
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct OneWireBus {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<one_wire_bus::Command>,

    /// ROM addresses found by the last search
    #[prost(fixed64, repeated, tag = "2")]
    #[serde(with = "u64_strings", skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<u64>,
}

pub mod one_wire_bus {
    use super::is_default;
    use serde::{Deserialize, Serialize};

    /// Bus operation requested by the host (reset, search)
    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default, deny_unknown_fields)]
    pub struct Command {
        #[prost(int32, tag = "1")]
        #[serde(skip_serializing_if = "is_default")]
        pub opcode: i32,

        #[prost(int32, tag = "2")]
        #[serde(skip_serializing_if = "is_default")]
        pub data: i32,
    }
}
