//! Opcode definitions
//!
//! The first byte of every request frame.

use std::fmt;

use crate::error::{Result, SparkError};

use super::index::{CommandIndex, CommandSpec};

/// Command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    ReadValue = 0x01,
    WriteValue = 0x02,
    CreateObject = 0x03,
    DeleteObject = 0x04,
    ListObjects = 0x05,
    FreeSlot = 0x06,
    CreateProfile = 0x07,
    DeleteProfile = 0x08,
    ActivateProfile = 0x09,
    LogValues = 0x0A,
    Reset = 0x0B,
    FreeSlotRoot = 0x0C,
    // 0x0D is reserved
    ListProfiles = 0x0E,
    ReadSystemValue = 0x0F,
    WriteSystemValue = 0x10,
}

impl Opcode {
    /// All opcodes in wire order
    pub const ALL: [Opcode; 15] = [
        Opcode::ReadValue,
        Opcode::WriteValue,
        Opcode::CreateObject,
        Opcode::DeleteObject,
        Opcode::ListObjects,
        Opcode::FreeSlot,
        Opcode::CreateProfile,
        Opcode::DeleteProfile,
        Opcode::ActivateProfile,
        Opcode::LogValues,
        Opcode::Reset,
        Opcode::FreeSlotRoot,
        Opcode::ListProfiles,
        Opcode::ReadSystemValue,
        Opcode::WriteSystemValue,
    ];

    /// Symbolic command name
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::ReadValue => "READ_VALUE",
            Opcode::WriteValue => "WRITE_VALUE",
            Opcode::CreateObject => "CREATE_OBJECT",
            Opcode::DeleteObject => "DELETE_OBJECT",
            Opcode::ListObjects => "LIST_OBJECTS",
            Opcode::FreeSlot => "FREE_SLOT",
            Opcode::CreateProfile => "CREATE_PROFILE",
            Opcode::DeleteProfile => "DELETE_PROFILE",
            Opcode::ActivateProfile => "ACTIVATE_PROFILE",
            Opcode::LogValues => "LOG_VALUES",
            Opcode::Reset => "RESET",
            Opcode::FreeSlotRoot => "FREE_SLOT_ROOT",
            Opcode::ListProfiles => "LIST_PROFILES",
            Opcode::ReadSystemValue => "READ_SYSTEM_VALUE",
            Opcode::WriteSystemValue => "WRITE_SYSTEM_VALUE",
        }
    }

    /// The registered spec for this opcode
    pub fn spec(&self) -> Result<&'static CommandSpec> {
        CommandIndex::global()?.by_opcode(*self as u8)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = SparkError;

    fn try_from(byte: u8) -> Result<Self> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| *op as u8 == byte)
            .ok_or(SparkError::UnknownOpcode(byte))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
