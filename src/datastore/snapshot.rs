//! Snapshot file
//!
//! The whole document table is written as one checksummed blob.
//!
//! ```text
//! [magic "SPDS" (4)][version u16 (2)][len u32 (4)][crc32 u32 (4)][JSON array (len)]
//! ```
//!
//! Writes go to a sibling temp file which is synced and renamed over the
//! target, so a reader sees either the old or the new snapshot.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value as Json;

use crate::error::{Result, SparkError};

/// Snapshot magic bytes
pub const MAGIC: &[u8; 4] = b"SPDS";

/// Snapshot format version
pub const VERSION: u16 = 1;

/// magic (4) + version (2) + len (4) + crc (4)
pub const HEADER_SIZE: usize = 14;

/// Load all documents from `path`
///
/// A missing or empty file is an empty store.
pub fn read_snapshot(path: &Path) -> Result<Vec<Json>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    if raw.len() < HEADER_SIZE {
        return Err(SparkError::Corruption(format!(
            "snapshot header truncated: {} of {} bytes",
            raw.len(),
            HEADER_SIZE
        )));
    }

    if &raw[0..4] != MAGIC {
        return Err(SparkError::Corruption(format!(
            "invalid snapshot magic: expected SPDS, got {:?}",
            &raw[0..4]
        )));
    }

    let version = u16::from_le_bytes([raw[4], raw[5]]);
    if version != VERSION {
        return Err(SparkError::Corruption(format!(
            "unsupported snapshot version: {}",
            version
        )));
    }

    let len = u32::from_le_bytes([raw[6], raw[7], raw[8], raw[9]]) as usize;
    let crc = u32::from_le_bytes([raw[10], raw[11], raw[12], raw[13]]);

    let body = &raw[HEADER_SIZE..];
    if body.len() != len {
        return Err(SparkError::Corruption(format!(
            "snapshot body is {} bytes, header says {}",
            body.len(),
            len
        )));
    }

    let actual = crc32fast::hash(body);
    if actual != crc {
        return Err(SparkError::Corruption(format!(
            "snapshot CRC mismatch: expected {:08x}, got {:08x}",
            crc, actual
        )));
    }

    match serde_json::from_slice(body)? {
        Json::Array(docs) => Ok(docs),
        other => Err(SparkError::Corruption(format!(
            "snapshot body is not a document list: {}",
            other
        ))),
    }
}

/// Atomically replace the snapshot at `path` with `docs`
pub fn write_snapshot(path: &Path, docs: &[Json]) -> Result<()> {
    let body = serde_json::to_vec(docs)?;
    let len = u32::try_from(body.len())
        .map_err(|_| SparkError::InvalidDocument(format!("snapshot too large: {} bytes", body.len())))?;

    let tmp = temp_path(path);
    {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;

        file.write_all(MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;
        file.write_all(&len.to_le_bytes())?;
        file.write_all(&crc32fast::hash(&body).to_le_bytes())?;
        file.write_all(&body)?;
        file.sync_all()?;
    }

    fs::rename(&tmp, path)?;
    tracing::trace!("wrote {} documents to {}", docs.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
