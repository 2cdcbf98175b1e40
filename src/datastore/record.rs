//! Block metadata record
//!
//! The document shape stored per block: the service-side id, the object
//! type and the decoded object body.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Result, SparkError};
use crate::payload::{self, ObjectType, PayloadMap, RawPayload};

/// One stored block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub service_id: String,

    #[serde(rename = "type")]
    pub obj_type: ObjectType,

    #[serde(rename = "obj")]
    pub object: PayloadMap,
}

impl ObjectRecord {
    pub fn new(service_id: impl Into<String>, obj_type: ObjectType, object: PayloadMap) -> Self {
        Self {
            service_id: service_id.into(),
            obj_type,
            object,
        }
    }

    /// Decode an encoded payload into a record
    pub fn from_payload<'a>(
        service_id: impl Into<String>,
        obj_type: ObjectType,
        encoded: impl Into<RawPayload<'a>>,
    ) -> Result<Self> {
        let object = payload::decode(obj_type, encoded)?;
        Ok(Self::new(service_id, obj_type, object))
    }

    /// Encode the object body for the controller
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        payload::encode(self.obj_type, &self.object)
    }

    pub fn to_document(&self) -> Result<Json> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_document(doc: Json) -> Result<Self> {
        serde_json::from_value(doc).map_err(|e| SparkError::InvalidDocument(e.to_string()))
    }
}
