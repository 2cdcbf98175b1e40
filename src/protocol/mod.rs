//! Protocol Module
//!
//! Defines the command protocol spoken with the controller.
//!
//! ## Protocol Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────────────────────────────────────┐
//! │ Op (1)   │ Fields (per opcode layout)               │
//! └──────────┴──────────────────────────────────────────┘
//! ```
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────────────────────────────────────┐
//! │ Err (1)  │ Fields (per opcode layout)               │
//! └──────────┴──────────────────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: READ_VALUE         - object_id, type, size
//! - 0x02: WRITE_VALUE        - object_id, type, size, data
//! - 0x03: CREATE_OBJECT      - type, size, data
//! - 0x04: DELETE_OBJECT      - object_id
//! - 0x05: LIST_OBJECTS       - profile_id
//! - 0x06: FREE_SLOT          - object_id
//! - 0x07: CREATE_PROFILE     - empty
//! - 0x08: DELETE_PROFILE     - profile_id
//! - 0x09: ACTIVATE_PROFILE   - profile_id
//! - 0x0A: LOG_VALUES         - flags, object_id?
//! - 0x0B: RESET              - flags
//! - 0x0C: FREE_SLOT_ROOT     - object_id
//! - 0x0E: LIST_PROFILES      - empty
//! - 0x0F: READ_SYSTEM_VALUE  - object_id, type, size
//! - 0x10: WRITE_SYSTEM_VALUE - object_id, type, size, data
//!
//! No checksum or link framing is defined at this layer.

mod codec;
mod command;
mod errcode;
mod index;
mod opcode;
mod table;
mod values;

pub use codec::{values_to_json, Field, FieldKind, Schema};
pub use command::{pretty_raw, Command};
pub use errcode::ErrorCode;
pub use index::{identify, CommandIndex, CommandSpec};
pub use opcode::Opcode;
pub use values::{Value, Values};
