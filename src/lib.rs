//! # sparkwire
//!
//! Command protocol layer for talking to a block-based device controller:
//! - Hierarchical object addresses with a compact continuation encoding
//! - Per-type object payloads (length-prefixed protobuf bodies)
//! - A fixed table of 15 commands with request/response layouts
//! - Command exchanges that convert between bytes and typed values lazily
//! - A block metadata store for recovering objects after restarts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Caller / Transport                        │
//! │              (frames to and from the device)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Command (protocol)                          │
//! │        identify → build / parse → cached both forms          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Address   │          │   Payload   │
//!   │  (ObjectId) │          │ (type tag)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Datastore  │
//!                           │ (metadata)  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod address;
pub mod payload;
pub mod protocol;
pub mod datastore;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SparkError};
pub use config::Config;
pub use address::ObjectId;
pub use protocol::{identify, pretty_raw, Command, CommandIndex, ErrorCode, Opcode, Value, Values};
pub use datastore::{DataStore, FileDataStore, MemoryDataStore, ObjectRecord};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sparkwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
