//! Varint length prefix
//!
//! Base-128 groups, least significant first, high bit set on every byte
//! except the last. Same encoding protobuf uses for its own lengths.

use bytes::BufMut;

use crate::error::{Result, SparkError};

/// Longest encoding of a u64
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `buf` using the fewest bytes
pub fn put_varint<B: BufMut>(buf: &mut B, value: u64) {
    prost::encoding::encode_varint(value, buf);
}

/// Number of bytes `value` occupies when encoded
pub fn varint_len(value: u64) -> usize {
    prost::encoding::encoded_len_varint(value)
}

/// Read a varint from the start of `bytes`
///
/// Returns the value and the number of bytes consumed.
pub fn read_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut cursor = bytes;
    let value = prost::encoding::decode_varint(&mut cursor).map_err(|e| {
        let shown = bytes.len().min(MAX_VARINT_LEN);
        SparkError::InvalidVarint(format!("{} in {}", e, hex::encode(&bytes[..shown])))
    })?;
    Ok((value, bytes.len() - cursor.len()))
}
