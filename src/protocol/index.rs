//! Command index
//!
//! Read-only registry from command name and opcode to [`CommandSpec`],
//! built once on first use. The command set is closed: there is no
//! runtime registration.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

use crate::error::{Result, SparkError};

use super::codec::{Field, FieldKind, Schema};
use super::opcode::Opcode;
use super::table::COMMANDS;

/// Static definition of one command
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub opcode: Opcode,
    pub request: Schema,
    pub response: Schema,
}

impl CommandSpec {
    /// Opcode as it appears on the wire
    pub fn opcode_byte(&self) -> u8 {
        self.opcode as u8
    }
}

/// Lookup table over all command specs
#[derive(Debug)]
pub struct CommandIndex {
    by_name: HashMap<&'static str, &'static CommandSpec>,
    by_opcode: BTreeMap<u8, &'static CommandSpec>,
}

static INDEX: Lazy<std::result::Result<CommandIndex, String>> =
    Lazy::new(|| CommandIndex::new(&COMMANDS).map_err(|e| e.to_string()));

impl CommandIndex {
    /// Build an index, checking table invariants
    ///
    /// Every spec needs a non-zero opcode unique in the table, a unique
    /// name, a request layout that starts with its own opcode, a
    /// non-empty response layout, and optional fields or groups only at
    /// the end of a layout.
    pub fn new(specs: &'static [CommandSpec]) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(specs.len());
        let mut by_opcode = BTreeMap::new();

        for spec in specs {
            let op = spec.opcode_byte();
            if op == 0 {
                return Err(SparkError::Config(format!("{} has opcode 0", spec.name)));
            }
            if spec.request.fields.first().map(|f| f.kind) != Some(FieldKind::Opcode(op)) {
                return Err(SparkError::Config(format!(
                    "{} request layout must start with opcode {}",
                    spec.name, op
                )));
            }
            if spec.response.fields.is_empty() {
                return Err(SparkError::Config(format!("{} has an empty response layout", spec.name)));
            }
            check_fields(spec.request.label, spec.request.fields)?;
            check_fields(spec.response.label, spec.response.fields)?;
            if by_name.insert(spec.name, spec).is_some() {
                return Err(SparkError::Config(format!("duplicate command name {}", spec.name)));
            }
            if by_opcode.insert(op, spec).is_some() {
                return Err(SparkError::Config(format!("duplicate opcode {}", op)));
            }
        }

        tracing::debug!(commands = specs.len(), "command index built");
        Ok(Self { by_name, by_opcode })
    }

    /// The process-wide index over the built-in command table
    pub fn global() -> Result<&'static CommandIndex> {
        Lazy::force(&INDEX)
            .as_ref()
            .map_err(|e| SparkError::Config(format!("command table invalid: {}", e)))
    }

    /// Look up a command by its symbolic name (exact match)
    pub fn identify(&self, name: &str) -> Result<&'static CommandSpec> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SparkError::UnknownCommand(name.to_string()))
    }

    /// Look up a command by the first byte of its request frame
    pub fn by_opcode(&self, opcode: u8) -> Result<&'static CommandSpec> {
        self.by_opcode
            .get(&opcode)
            .copied()
            .ok_or(SparkError::UnknownOpcode(opcode))
    }

    /// All specs in opcode order
    pub fn iter(&self) -> impl Iterator<Item = &'static CommandSpec> + '_ {
        self.by_opcode.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_opcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_opcode.is_empty()
    }
}

/// Look up a built-in command by name
pub fn identify(name: &str) -> Result<&'static CommandSpec> {
    CommandIndex::global()?.identify(name)
}

fn check_fields(label: &str, fields: &[Field]) -> Result<()> {
    let mut seen_optional = false;
    for (i, field) in fields.iter().enumerate() {
        if field.optional {
            seen_optional = true;
        } else if seen_optional {
            return Err(SparkError::Config(format!(
                "{}: required field '{}' follows an optional field",
                label, field.name
            )));
        }
        if let FieldKind::Group(sub) = field.kind {
            if i + 1 != fields.len() {
                return Err(SparkError::Config(format!(
                    "{}: group '{}' must be the last field",
                    label, field.name
                )));
            }
            check_fields(label, sub)?;
        }
    }
    Ok(())
}
