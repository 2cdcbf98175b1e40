//! Error types for sparkwire
//!
//! Provides a unified error type for all operations.
//!
//! Device-reported failures are not errors here: a non-OK `errcode` in a
//! parsed response is an ordinary value (see [`crate::protocol::ErrorCode`]).

use thiserror::Error;

/// Result type alias using SparkError
pub type Result<T> = std::result::Result<T, SparkError>;

/// Unified error type for sparkwire operations
#[derive(Debug, Error)]
pub enum SparkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Command not found: {0}")]
    UnknownCommand(String),

    #[error("No command registered for opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    #[error("No codec found for object type [{0}]")]
    UnknownObjectType(u16),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Truncated {what} at offset {offset}: expected {expected} bytes, got {actual}")]
    Truncated {
        what: &'static str,
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed object id at offset {offset}: {reason}")]
    MalformedAddress { offset: usize, reason: String },

    #[error("Unexpected {count} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("Invalid varint length prefix: {0}")]
    InvalidVarint(String),

    #[error("Element {index} of byte list is not a byte: {value}")]
    InvalidByte { index: usize, value: String },

    #[error("Payload decode failed for object type [{obj_type}]: {reason}")]
    PayloadDecode { obj_type: u16, reason: String },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("{command}: missing required field '{field}'")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: invalid field '{field}': {reason}")]
    InvalidField {
        command: &'static str,
        field: String,
        reason: String,
    },

    #[error("Object id segment {value} out of range (max {max})")]
    SegmentOutOfRange { value: u32, max: u8 },

    #[error("Object id must contain at least one segment")]
    EmptyObjectId,

    #[error("Invalid payload for object type [{obj_type}]: {reason}")]
    InvalidPayload { obj_type: u16, reason: String },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("A document already exists with {key}={value}")]
    DuplicateKey { key: String, value: String },

    #[error("Multiple documents with {key}={value} exist")]
    MultipleMatches { key: String, value: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document has no field '{0}'")]
    MissingKey(String),

    #[error("Store not available: {0}")]
    StoreClosed(String),

    #[error("Store action timed out after {0} ms")]
    Timeout(u64),

    #[error("Store corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SparkError {
    /// True for errors caused by bytes that do not match the wire grammar
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            SparkError::Truncated { .. }
                | SparkError::MalformedAddress { .. }
                | SparkError::TrailingBytes { .. }
                | SparkError::InvalidVarint(_)
                | SparkError::InvalidByte { .. }
                | SparkError::PayloadDecode { .. }
        )
    }

    /// True for failed lookups of commands, opcodes or object types
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            SparkError::UnknownCommand(_)
                | SparkError::UnknownOpcode(_)
                | SparkError::UnknownObjectType(_)
        )
    }
}
