//! Device error codes
//!
//! Every response frame starts with one of these. A non-OK code is data
//! reported by the controller, not a failure of the codec.

use std::fmt;

/// Response error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    UnknownError,
    StreamError,
    ProfileNotActive,
    InsufficientPersistentStorage,
    InsufficientHeap,
    ObjectNotWritable,
    ObjectNotReadable,
    ObjectNotCreatable,
    ObjectNotDeletable,
    ObjectNotContainer,
    ContainerFull,
    InvalidParameter,
    InvalidObjectId,
    InvalidType,
    InvalidSize,
    InvalidProfile,
    /// Code outside the known table, kept verbatim
    Unknown(u8),
}

/// Known codes in wire order (index == code)
const KNOWN: [(ErrorCode, &str); 17] = [
    (ErrorCode::Ok, "OK"),
    (ErrorCode::UnknownError, "UNKNOWN_ERROR"),
    (ErrorCode::StreamError, "STREAM_ERROR"),
    (ErrorCode::ProfileNotActive, "PROFILE_NOT_ACTIVE"),
    (ErrorCode::InsufficientPersistentStorage, "INSUFFICIENT_PERSISTENT_STORAGE"),
    (ErrorCode::InsufficientHeap, "INSUFFICIENT_HEAP"),
    (ErrorCode::ObjectNotWritable, "OBJECT_NOT_WRITABLE"),
    (ErrorCode::ObjectNotReadable, "OBJECT_NOT_READABLE"),
    (ErrorCode::ObjectNotCreatable, "OBJECT_NOT_CREATABLE"),
    (ErrorCode::ObjectNotDeletable, "OBJECT_NOT_DELETABLE"),
    (ErrorCode::ObjectNotContainer, "OBJECT_NOT_CONTAINER"),
    (ErrorCode::ContainerFull, "CONTAINER_FULL"),
    (ErrorCode::InvalidParameter, "INVALID_PARAMETER"),
    (ErrorCode::InvalidObjectId, "INVALID_OBJECT_ID"),
    (ErrorCode::InvalidType, "INVALID_TYPE"),
    (ErrorCode::InvalidSize, "INVALID_SIZE"),
    (ErrorCode::InvalidProfile, "INVALID_PROFILE"),
];

impl ErrorCode {
    /// True for the success sentinel
    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::Ok)
    }

    /// Symbolic name, `None` for unknown codes
    pub fn name(&self) -> Option<&'static str> {
        KNOWN.get(u8::from(*self) as usize).and_then(|(code, name)| {
            if code == self {
                Some(*name)
            } else {
                None
            }
        })
    }

    /// Parse a symbolic name (e.g. `"OK"`)
    pub fn from_name(name: &str) -> Option<Self> {
        KNOWN.iter().find(|(_, n)| *n == name).map(|(code, _)| *code)
    }
}

impl From<u8> for ErrorCode {
    fn from(code: u8) -> Self {
        match KNOWN.get(code as usize) {
            Some((known, _)) => *known,
            None => ErrorCode::Unknown(code),
        }
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Ok => 0,
            ErrorCode::UnknownError => 1,
            ErrorCode::StreamError => 2,
            ErrorCode::ProfileNotActive => 3,
            ErrorCode::InsufficientPersistentStorage => 4,
            ErrorCode::InsufficientHeap => 5,
            ErrorCode::ObjectNotWritable => 6,
            ErrorCode::ObjectNotReadable => 7,
            ErrorCode::ObjectNotCreatable => 8,
            ErrorCode::ObjectNotDeletable => 9,
            ErrorCode::ObjectNotContainer => 10,
            ErrorCode::ContainerFull => 11,
            ErrorCode::InvalidParameter => 12,
            ErrorCode::InvalidObjectId => 13,
            ErrorCode::InvalidType => 14,
            ErrorCode::InvalidSize => 15,
            ErrorCode::InvalidProfile => 16,
            ErrorCode::Unknown(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "UNKNOWN(0x{:02x})", u8::from(*self)),
        }
    }
}
