//! Whole-metadata export for external tools

use serde::Serialize;

use crate::atom::{FIRST_ATOM_ID, atom_table};
use crate::opcode::{OpcodeEntry, opcode_table, operand_format_table};
use crate::options::compile_options;
use crate::tags::{BytecodeTag, FunctionKind, ModeFlag};
use crate::BYTECODE_VERSION;

/// (id, name) row shared by the small tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableEntry {
    /// Engine value
    pub id: u32,
    /// Exported name
    pub name: &'static str,
}

impl TableEntry {
    /// Create a new entry
    pub const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// Everything an external disassembler needs, in one serializable value
#[derive(Debug, Clone, Serialize)]
pub struct MetadataSnapshot {
    /// Serialization format version (byte 0 of every buffer)
    pub bytecode_version: u8,
    /// Raw compile option bits
    pub compile_options: u32,
    /// Names of the enabled compile options
    pub compile_option_names: Vec<&'static str>,
    /// First id not taken by a predefined atom
    pub first_atom_id: u32,
    /// Atom table
    pub atoms: Vec<TableEntry>,
    /// Opcode table
    pub opcodes: Vec<OpcodeEntry>,
    /// Operand formats
    pub operand_formats: Vec<TableEntry>,
    /// Serialized value tags
    pub bytecode_tags: Vec<TableEntry>,
    /// Function kinds
    pub function_kinds: Vec<TableEntry>,
    /// Evaluation mode flags
    pub mode_flags: Vec<TableEntry>,
}

impl MetadataSnapshot {
    /// Collect all tables of the current build
    pub fn collect() -> Self {
        let options = compile_options();
        Self {
            bytecode_version: BYTECODE_VERSION,
            compile_options: options.bits(),
            compile_option_names: options.iter_names().map(|(name, _)| name).collect(),
            first_atom_id: FIRST_ATOM_ID,
            atoms: atom_table().to_vec(),
            opcodes: opcode_table(),
            operand_formats: operand_format_table(),
            bytecode_tags: BytecodeTag::table(),
            function_kinds: FunctionKind::table(),
            mode_flags: ModeFlag::table(),
        }
    }

    /// Serialize as compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize as indented JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
