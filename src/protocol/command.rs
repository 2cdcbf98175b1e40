//! Command exchange
//!
//! A [`Command`] is one request/response exchange. Each side (request,
//! response) holds an encoded and a decoded slot; whichever form was
//! supplied is stored, the other is derived on first access and cached.
//!
//! ```text
//!              build                         parse
//! decoded ───────────────► encoded    encoded ───────────────► decoded
//! ```
//!
//! A side that was never supplied reads back as `None` in both forms.

use std::fmt;

use bytes::Bytes;
use once_cell::sync::OnceCell;

use crate::error::{Result, SparkError};

use super::codec::{FieldKind, Schema};
use super::index::{CommandIndex, CommandSpec};
use super::{ErrorCode, Value, Values};

/// Render raw bytes as lowercase hex without separators
///
/// `None` passes through unchanged.
pub fn pretty_raw(raw: Option<&[u8]>) -> Option<String> {
    raw.map(hex::encode)
}

/// One side of an exchange
#[derive(Debug, Default)]
struct Side {
    encoded: OnceCell<Bytes>,
    decoded: OnceCell<Values>,
}

impl Side {
    fn from_encoded(encoded: Option<Bytes>) -> Self {
        Self {
            encoded: encoded.map(OnceCell::with_value).unwrap_or_default(),
            decoded: OnceCell::new(),
        }
    }

    fn from_decoded(decoded: Option<Values>) -> Self {
        Self {
            encoded: OnceCell::new(),
            decoded: decoded.map(OnceCell::with_value).unwrap_or_default(),
        }
    }

    fn encoded(&self, schema: &Schema) -> Result<Option<&[u8]>> {
        if let Some(encoded) = self.encoded.get() {
            return Ok(Some(&encoded[..]));
        }
        let Some(decoded) = self.decoded.get() else {
            return Ok(None);
        };

        let encoded = self.encoded.get_or_try_init(|| {
            tracing::trace!("building {} from {}", schema.label, decoded);
            schema.build(decoded)
        })?;
        Ok(Some(&encoded[..]))
    }

    fn decoded(&self, schema: &Schema) -> Result<Option<&Values>> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(Some(decoded));
        }
        let Some(encoded) = self.encoded.get() else {
            return Ok(None);
        };

        let decoded = self.decoded.get_or_try_init(|| {
            tracing::trace!("parsing {} from {}", schema.label, hex::encode(encoded));
            schema.parse(encoded)
        })?;
        Ok(Some(decoded))
    }

    fn is_empty(&self) -> bool {
        self.encoded.get().is_none() && self.decoded.get().is_none()
    }
}

/// One request/response exchange with a controller
#[derive(Debug)]
pub struct Command {
    spec: &'static CommandSpec,
    request: Side,
    response: Side,
}

impl Command {
    /// Empty exchange for `spec`, both sides absent
    pub fn new(spec: &'static CommandSpec) -> Self {
        Self {
            spec,
            request: Side::default(),
            response: Side::default(),
        }
    }

    /// Build a request from its fields
    ///
    /// The request is encoded immediately, so invalid arguments fail
    /// here. The decoded form is the given fields plus the opcode.
    pub fn from_args(spec: &'static CommandSpec, args: Values) -> Result<Self> {
        let encoded = spec.request.build(&args)?;

        let mut decoded = args;
        if let Some(FieldKind::Opcode(op)) = spec.request.fields.first().map(|f| f.kind) {
            if !decoded.contains("opcode") {
                decoded.insert("opcode", Value::Uint(op as u32));
            }
        }

        Ok(Self {
            spec,
            request: Side {
                encoded: OnceCell::with_value(encoded),
                decoded: OnceCell::with_value(decoded),
            },
            response: Side::default(),
        })
    }

    /// Wrap structured request and/or response values
    pub fn from_decoded(
        spec: &'static CommandSpec,
        request: Option<Values>,
        response: Option<Values>,
    ) -> Self {
        Self {
            spec,
            request: Side::from_decoded(request),
            response: Side::from_decoded(response),
        }
    }

    /// Wrap raw request and/or response frames
    pub fn from_encoded(
        spec: &'static CommandSpec,
        request: Option<Bytes>,
        response: Option<Bytes>,
    ) -> Self {
        Self {
            spec,
            request: Side::from_encoded(request),
            response: Side::from_encoded(response),
        }
    }

    /// Wrap a raw request frame, identifying the command by its opcode
    pub fn from_request_frame(frame: Bytes) -> Result<Self> {
        let opcode = *frame.first().ok_or(SparkError::Truncated {
            what: "opcode",
            offset: 0,
            expected: 1,
            actual: 0,
        })?;
        let spec = CommandIndex::global()?.by_opcode(opcode)?;
        Ok(Self::from_encoded(spec, Some(frame), None))
    }

    /// Attach the response frame read back from the transport
    pub fn with_encoded_response(mut self, response: Bytes) -> Self {
        self.response = Side::from_encoded(Some(response));
        self
    }

    /// Attach a structured response
    pub fn with_decoded_response(mut self, response: Values) -> Self {
        self.response = Side::from_decoded(Some(response));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn encoded_request(&self) -> Result<Option<&[u8]>> {
        self.request.encoded(&self.spec.request)
    }

    pub fn decoded_request(&self) -> Result<Option<&Values>> {
        self.request.decoded(&self.spec.request)
    }

    pub fn encoded_response(&self) -> Result<Option<&[u8]>> {
        self.response.encoded(&self.spec.response)
    }

    pub fn decoded_response(&self) -> Result<Option<&Values>> {
        self.response.decoded(&self.spec.response)
    }

    /// Error code of the response, if a response is present
    pub fn errcode(&self) -> Result<Option<ErrorCode>> {
        Ok(self
            .decoded_response()?
            .and_then(|response| response.errcode("errcode")))
    }

    pub fn has_request(&self) -> bool {
        !self.request.is_empty()
    }

    pub fn has_response(&self) -> bool {
        !self.response.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = pretty_raw(self.encoded_request().ok().flatten());
        let response = pretty_raw(self.encoded_response().ok().flatten());
        write!(
            f,
            "{}(request={}, response={})",
            self.spec.name,
            request.as_deref().unwrap_or("None"),
            response.as_deref().unwrap_or("None")
        )
    }
}
