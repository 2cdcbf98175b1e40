//! Object address codec
//!
//! Objects live in nested containers; an [`ObjectId`] is the path of slot
//! indices from the outermost container to the object itself.
//!
//! ## Wire Format
//! ```text
//! ┌───┬──────────────┐
//! │ C │ segment (7)  │  repeated, C = 1 on every byte but the last
//! └───┴──────────────┘
//!
//! [7]       -> 07
//! [127]     -> 7f
//! [127, 7]  -> ff 07
//! [1, 2, 3] -> 81 82 03
//! ```
//!
//! A byte with the high bit clear terminates the path, so a single
//! segment is always one byte below `0x80` and any longer path starts
//! with a byte at or above it.

use std::fmt;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SparkError};

/// Continuation flag carried by every segment byte except the last
pub const CONTINUATION_FLAG: u8 = 0x80;

/// Largest legal segment value
pub const MAX_SEGMENT: u8 = 0x7F;

/// Deepest supported container nesting
pub const MAX_DEPTH: usize = 8;

/// Hierarchical object identifier (outer containers first)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ObjectId(Vec<u8>);

impl ObjectId {
    /// Create an id from its segments, validating range and depth
    pub fn new<I>(segments: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<u32>,
    {
        let mut path = Vec::new();
        for segment in segments {
            let value = segment.into();
            if value > MAX_SEGMENT as u32 {
                return Err(SparkError::SegmentOutOfRange {
                    value,
                    max: MAX_SEGMENT,
                });
            }
            path.push(value as u8);
        }

        if path.is_empty() {
            return Err(SparkError::EmptyObjectId);
        }
        if path.len() > MAX_DEPTH {
            return Err(SparkError::MalformedAddress {
                offset: 0,
                reason: format!("{} segments exceed max depth {}", path.len(), MAX_DEPTH),
            });
        }

        Ok(Self(path))
    }

    /// Create a flat (single segment) id
    pub fn slot(slot: u8) -> Result<Self> {
        Self::new([slot])
    }

    /// Path segments, outer container first
    pub fn segments(&self) -> &[u8] {
        &self.0
    }

    /// Number of nesting levels
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True if the id addresses a slot in the root container
    pub fn is_flat(&self) -> bool {
        self.0.len() == 1
    }

    /// Number of bytes the encoded id occupies
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    /// Encode to a fresh buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Append the encoded id to `buf`
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        let last = self.0.len() - 1;
        for (i, segment) in self.0.iter().enumerate() {
            if i < last {
                buf.put_u8(segment | CONTINUATION_FLAG);
            } else {
                buf.put_u8(*segment);
            }
        }
    }

    /// Decode an id starting at `offset`
    ///
    /// Returns the id and the number of bytes consumed.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut path = Vec::new();
        let mut pos = offset;

        loop {
            let byte = match bytes.get(pos) {
                Some(b) => *b,
                None => {
                    return Err(SparkError::Truncated {
                        what: "object id",
                        offset: pos,
                        expected: 1,
                        actual: 0,
                    })
                }
            };

            path.push(byte & MAX_SEGMENT);
            pos += 1;

            if byte & CONTINUATION_FLAG == 0 {
                break;
            }
            if path.len() == MAX_DEPTH {
                return Err(SparkError::MalformedAddress {
                    offset: pos - 1,
                    reason: format!("continuation past max depth {}", MAX_DEPTH),
                });
            }
        }

        Ok((Self(path), pos - offset))
    }
}

impl TryFrom<Vec<u32>> for ObjectId {
    type Error = SparkError;

    fn try_from(segments: Vec<u32>) -> Result<Self> {
        Self::new(segments)
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = SparkError;

    fn try_from(segments: &[u8]) -> Result<Self> {
        Self::new(segments.iter().copied())
    }
}

impl From<ObjectId> for Vec<u32> {
    fn from(id: ObjectId) -> Self {
        id.0.into_iter().map(u32::from).collect()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", segment)?;
        }
        write!(f, "]")
    }
}

/// Encode a raw segment path
pub fn encode_address(path: &[u8]) -> Result<Vec<u8>> {
    Ok(ObjectId::try_from(path)?.encode())
}

/// Decode a raw segment path starting at `offset`
pub fn decode_address(bytes: &[u8], offset: usize) -> Result<(Vec<u8>, usize)> {
    let (id, consumed) = ObjectId::decode(bytes, offset)?;
    Ok((id.0, consumed))
}
