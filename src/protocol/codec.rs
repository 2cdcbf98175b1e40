//! Protocol codec
//!
//! Field layouts and the build/parse functions that walk them.
//!
//! ## Field Encodings
//! ```text
//! Opcode   u8, fixed per command
//! Errcode  u8
//! Address  object id (continuation-flagged segments)
//! U8       u8
//! U16      u16 little-endian
//! Size     u16 little-endian, length of the next Data field
//! Data     Size bytes
//! Group    repeated sub-layout, runs to the end of the frame
//! ```
//!
//! A schema is a flat list of fields written in order. Optional fields
//! only appear at the end of a layout: they are written when present and
//! read when bytes remain.

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::{Map, Value as Json};

use crate::address::ObjectId;
use crate::error::{Result, SparkError};

use super::{ErrorCode, Value, Values};

/// Wire encoding of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Command selector, always equal to the contained opcode
    Opcode(u8),
    Errcode,
    Address,
    U8,
    U16,
    /// Byte length of the following `Data` field
    Size,
    Data,
    /// Repeated group consuming the rest of the frame
    Group(&'static [Field]),
}

/// A named field in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: true,
        }
    }
}

/// Request or response layout of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Label used in errors, e.g. `"WRITE_VALUE request"`
    pub label: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(label: &'static str, fields: &'static [Field]) -> Self {
        Self { label, fields }
    }

    /// Names of fields that `build` refuses to omit
    ///
    /// The opcode is filled in when absent and is not listed.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .filter(|f| !f.optional && !matches!(f.kind, FieldKind::Opcode(_)))
            .map(|f| f.name)
    }

    /// The opcode this layout starts with, if it is a request layout
    pub fn opcode(&self) -> Option<u8> {
        self.fields.iter().find_map(|f| match f.kind {
            FieldKind::Opcode(op) => Some(op),
            _ => None,
        })
    }

    /// Serialize `values` in field order
    ///
    /// Nothing is returned unless every field validates.
    pub fn build(&self, values: &Values) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(32);
        self.write_fields(self.fields, values, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Parse a complete frame
    pub fn parse(&self, bytes: &[u8]) -> Result<Values> {
        let mut reader = Reader::new(bytes);
        let values = self.read_fields(self.fields, &mut reader)?;

        if reader.remaining() > 0 {
            return Err(SparkError::TrailingBytes {
                offset: reader.pos,
                count: reader.remaining(),
            });
        }
        Ok(values)
    }

    // =========================================================================
    // Build
    // =========================================================================

    fn write_fields(&self, fields: &[Field], values: &Values, buf: &mut BytesMut) -> Result<()> {
        if let Some((name, _)) = values
            .iter()
            .find(|(name, _)| !fields.iter().any(|f| f.name == *name))
        {
            return Err(self.invalid(name, "unknown field"));
        }

        let mut last_size: Option<usize> = None;

        for field in fields {
            let value = match (values.get(field.name), field.kind) {
                (Some(value), _) => value,
                (None, FieldKind::Opcode(op)) => {
                    buf.put_u8(op);
                    continue;
                }
                (None, _) if field.optional => continue,
                (None, _) => {
                    return Err(SparkError::MissingField {
                        command: self.label,
                        field: field.name,
                    })
                }
            };

            match (field.kind, value) {
                (FieldKind::Opcode(op), Value::Uint(v)) if *v == op as u32 => buf.put_u8(op),
                (FieldKind::Opcode(op), other) => {
                    return Err(self.invalid(
                        field.name,
                        &format!("expected opcode {}, got {:?}", op, other),
                    ))
                }
                (FieldKind::Errcode, Value::Errcode(code)) => buf.put_u8((*code).into()),
                (FieldKind::Address, Value::Id(id)) => id.encode_into(buf),
                (FieldKind::U8, Value::Uint(v)) => buf.put_u8(self.narrow_u8(field, *v)?),
                (FieldKind::U16, Value::Uint(v)) => buf.put_u16_le(self.narrow_u16(field, *v)?),
                (FieldKind::Size, Value::Uint(v)) => {
                    let size = self.narrow_u16(field, *v)?;
                    last_size = Some(size as usize);
                    buf.put_u16_le(size);
                }
                (FieldKind::Data, Value::Data(data)) => match last_size {
                    Some(size) if size == data.len() => buf.put_slice(data),
                    Some(size) => {
                        return Err(self.invalid(
                            field.name,
                            &format!("size is {} but data has {} bytes", size, data.len()),
                        ))
                    }
                    None => return Err(self.invalid(field.name, "no size field precedes data")),
                },
                (FieldKind::Group(sub), Value::List(items)) => {
                    for item in items {
                        self.write_fields(sub, item, buf)?;
                    }
                }
                (kind, other) => {
                    return Err(self.invalid(
                        field.name,
                        &format!("{:?} field cannot hold a {} value", kind, other.kind()),
                    ))
                }
            }
        }

        Ok(())
    }

    fn narrow_u8(&self, field: &Field, v: u32) -> Result<u8> {
        u8::try_from(v).map_err(|_| self.invalid(field.name, &format!("{} does not fit u8", v)))
    }

    fn narrow_u16(&self, field: &Field, v: u32) -> Result<u16> {
        u16::try_from(v).map_err(|_| self.invalid(field.name, &format!("{} does not fit u16", v)))
    }

    fn invalid(&self, field: &str, reason: &str) -> SparkError {
        SparkError::InvalidField {
            command: self.label,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    // =========================================================================
    // Parse
    // =========================================================================

    fn read_fields(&self, fields: &[Field], reader: &mut Reader<'_>) -> Result<Values> {
        let mut values = Values::new();
        let mut last_size: Option<usize> = None;

        for field in fields {
            if field.optional && reader.remaining() == 0 {
                continue;
            }

            let value = match field.kind {
                FieldKind::Opcode(op) => {
                    let byte = reader.u8(field.name)?;
                    if byte != op {
                        return Err(self.invalid(
                            field.name,
                            &format!("expected opcode {}, frame has {}", op, byte),
                        ));
                    }
                    Value::Uint(byte as u32)
                }
                FieldKind::Errcode => Value::Errcode(ErrorCode::from(reader.u8(field.name)?)),
                FieldKind::Address => Value::Id(reader.object_id()?),
                FieldKind::U8 => Value::Uint(reader.u8(field.name)? as u32),
                FieldKind::U16 => Value::Uint(reader.u16_le(field.name)? as u32),
                FieldKind::Size => {
                    let size = reader.u16_le(field.name)?;
                    last_size = Some(size as usize);
                    Value::Uint(size as u32)
                }
                FieldKind::Data => {
                    let size = last_size
                        .ok_or_else(|| self.invalid(field.name, "no size field precedes data"))?;
                    Value::Data(reader.take(size, field.name)?.to_vec())
                }
                FieldKind::Group(sub) => {
                    let mut items = Vec::new();
                    while reader.remaining() > 0 {
                        items.push(self.read_fields(sub, reader)?);
                    }
                    Value::List(items)
                }
            };

            values.insert(field.name, value);
        }

        Ok(values)
    }

    // =========================================================================
    // JSON boundary
    // =========================================================================

    /// Convert a JSON object into typed values following this layout
    ///
    /// `object_id` takes an integer or an array of integers, `data` a hex
    /// string or an array of bytes, `errcode` a name or a number.
    pub fn values_from_json(&self, json: &Map<String, Json>) -> Result<Values> {
        self.json_fields(self.fields, json)
    }

    fn json_fields(&self, fields: &[Field], json: &Map<String, Json>) -> Result<Values> {
        let mut values = Values::new();

        for (name, item) in json {
            let field = fields
                .iter()
                .find(|f| f.name == name.as_str())
                .ok_or_else(|| self.invalid(name, "unknown field"))?;

            let value = match field.kind {
                FieldKind::Opcode(_)
                | FieldKind::U8
                | FieldKind::U16
                | FieldKind::Size => Value::Uint(
                    item.as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| self.invalid(name, "expected an unsigned integer"))?,
                ),
                FieldKind::Errcode => match item {
                    Json::String(s) => Value::Errcode(
                        ErrorCode::from_name(s)
                            .ok_or_else(|| self.invalid(name, &format!("unknown error code {}", s)))?,
                    ),
                    other => Value::Errcode(ErrorCode::from(
                        other
                            .as_u64()
                            .and_then(|v| u8::try_from(v).ok())
                            .ok_or_else(|| self.invalid(name, "expected an error code"))?,
                    )),
                },
                FieldKind::Address => Value::Id(match item {
                    Json::Array(segments) => ObjectId::new(
                        segments
                            .iter()
                            .map(|s| {
                                s.as_u64()
                                    .and_then(|v| u32::try_from(v).ok())
                                    .ok_or_else(|| self.invalid(name, "expected integer segments"))
                            })
                            .collect::<Result<Vec<u32>>>()?,
                    )?,
                    other => ObjectId::new([other
                        .as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| self.invalid(name, "expected an object id"))?])?,
                }),
                FieldKind::Data => Value::Data(match item {
                    Json::String(s) => {
                        hex::decode(s).map_err(|e| self.invalid(name, &e.to_string()))?
                    }
                    Json::Array(bytes) => bytes
                        .iter()
                        .map(|b| {
                            b.as_u64()
                                .and_then(|v| u8::try_from(v).ok())
                                .ok_or_else(|| self.invalid(name, "expected bytes"))
                        })
                        .collect::<Result<Vec<u8>>>()?,
                    _ => return Err(self.invalid(name, "expected a hex string or byte array")),
                }),
                FieldKind::Group(sub) => Value::List(
                    item.as_array()
                        .ok_or_else(|| self.invalid(name, "expected an array"))?
                        .iter()
                        .map(|entry| match entry {
                            Json::Object(map) => self.json_fields(sub, map),
                            _ => Err(self.invalid(name, "expected an array of objects")),
                        })
                        .collect::<Result<Vec<Values>>>()?,
                ),
            };

            values.insert(name.as_str(), value);
        }

        Ok(values)
    }
}

/// Convert typed values to JSON (inverse of [`Schema::values_from_json`])
pub fn values_to_json(values: &Values) -> Map<String, Json> {
    values
        .iter()
        .map(|(name, value)| {
            let json = match value {
                Value::Uint(v) => Json::from(*v),
                Value::Id(id) => Json::from(
                    id.segments()
                        .iter()
                        .map(|s| Json::from(*s))
                        .collect::<Vec<_>>(),
                ),
                Value::Data(data) => Json::String(hex::encode(data)),
                Value::Errcode(code) => match code.name() {
                    Some(n) => Json::String(n.to_string()),
                    None => Json::from(u8::from(*code)),
                },
                Value::List(items) => {
                    Json::Array(items.iter().map(|v| Json::Object(values_to_json(v))).collect())
                }
            };
            (name.to_string(), json)
        })
        .collect()
}

// =============================================================================
// Frame reader
// =============================================================================

/// Cursor over a frame that reports offsets on truncation
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(SparkError::Truncated {
                what,
                offset: self.pos,
                expected: n,
                actual: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u16_le(&mut self, what: &'static str) -> Result<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn object_id(&mut self) -> Result<ObjectId> {
        let (id, consumed) = ObjectId::decode(self.bytes, self.pos)?;
        self.pos += consumed;
        Ok(id)
    }
}
