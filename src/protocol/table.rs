//! Command schema table
//!
//! Request and response layouts for every opcode. Request layouts get the
//! leading opcode field from the `command!` macro.

use super::codec::{Field, FieldKind, Schema};
use super::index::CommandSpec;
use super::opcode::Opcode;

const OBJECT_ID: Field = Field::required("object_id", FieldKind::Address);
const TYPE: Field = Field::required("type", FieldKind::U16);
const SIZE: Field = Field::required("size", FieldKind::Size);
const DATA: Field = Field::required("data", FieldKind::Data);
const ERRCODE: Field = Field::required("errcode", FieldKind::Errcode);
const PROFILE_ID: Field = Field::required("profile_id", FieldKind::U8);
const FLAGS: Field = Field::required("flags", FieldKind::U8);

/// One stored object as listed by LIST_OBJECTS / LOG_VALUES
const OBJECT_ENTRY: &[Field] = &[OBJECT_ID, TYPE, SIZE, DATA];
const PROFILE_ENTRY: &[Field] = &[PROFILE_ID];

const OBJECTS: Field = Field::required("objects", FieldKind::Group(OBJECT_ENTRY));
const PROFILES: Field = Field::required("profiles", FieldKind::Group(PROFILE_ENTRY));

macro_rules! command {
    ($name:ident = $opcode:ident, request: [$($req:expr),*], response: [$($resp:expr),*]) => {
        CommandSpec {
            name: stringify!($name),
            opcode: Opcode::$opcode,
            request: Schema {
                label: concat!(stringify!($name), " request"),
                fields: &[Field::required("opcode", FieldKind::Opcode(Opcode::$opcode as u8)), $($req),*],
            },
            response: Schema {
                label: concat!(stringify!($name), " response"),
                fields: &[$($resp),*],
            },
        }
    };
}

/// Every command the controller understands, in opcode order
pub(crate) static COMMANDS: [CommandSpec; 15] = [
    command!(READ_VALUE = ReadValue,
        request: [OBJECT_ID, TYPE, SIZE],
        response: [ERRCODE, TYPE, SIZE, DATA]),
    command!(WRITE_VALUE = WriteValue,
        request: [OBJECT_ID, TYPE, SIZE, DATA],
        response: [ERRCODE, TYPE, SIZE, DATA]),
    command!(CREATE_OBJECT = CreateObject,
        request: [TYPE, SIZE, DATA],
        response: [ERRCODE, OBJECT_ID]),
    command!(DELETE_OBJECT = DeleteObject,
        request: [OBJECT_ID],
        response: [ERRCODE]),
    command!(LIST_OBJECTS = ListObjects,
        request: [PROFILE_ID],
        response: [ERRCODE, OBJECTS]),
    command!(FREE_SLOT = FreeSlot,
        request: [OBJECT_ID],
        response: [ERRCODE]),
    command!(CREATE_PROFILE = CreateProfile,
        request: [],
        response: [ERRCODE, PROFILE_ID]),
    command!(DELETE_PROFILE = DeleteProfile,
        request: [PROFILE_ID],
        response: [ERRCODE]),
    command!(ACTIVATE_PROFILE = ActivateProfile,
        request: [PROFILE_ID],
        response: [ERRCODE]),
    command!(LOG_VALUES = LogValues,
        request: [FLAGS, Field::optional("object_id", FieldKind::Address)],
        response: [ERRCODE, OBJECTS]),
    command!(RESET = Reset,
        request: [FLAGS],
        response: [ERRCODE]),
    command!(FREE_SLOT_ROOT = FreeSlotRoot,
        request: [OBJECT_ID],
        response: [ERRCODE]),
    command!(LIST_PROFILES = ListProfiles,
        request: [],
        response: [ERRCODE, PROFILE_ID, PROFILES]),
    command!(READ_SYSTEM_VALUE = ReadSystemValue,
        request: [OBJECT_ID, TYPE, SIZE],
        response: [ERRCODE, TYPE, SIZE, DATA]),
    command!(WRITE_SYSTEM_VALUE = WriteSystemValue,
        request: [OBJECT_ID, TYPE, SIZE, DATA],
        response: [ERRCODE, TYPE, SIZE, DATA]),
];
