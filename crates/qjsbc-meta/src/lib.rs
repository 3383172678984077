//! # qjsbc metadata
//!
//! Numbering tables of the embedded engine's bytecode format, exported so
//! external tools can interpret a serialized buffer without the engine's
//! private headers.
//!
//! ## Tables
//!
//! - **Atoms**: predefined interned identifiers, ids taken from the engine
//!   bindings themselves
//! - **Opcodes**: every instruction in declaration order, short forms included
//! - **Operand formats, bytecode tags, function kinds, mode flags**
//!
//! The opcode and atom snapshots are checked at compile time (count, order
//! and checksum), so a snapshot that drifts from the engine build does not
//! compile.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod atom;
pub mod opcode;
pub mod options;
pub mod snapshot;
pub mod tags;

pub use atom::{
    AtomDef, FIRST_ATOM_ID, atom_defs, atom_name, atom_table, first_atom_id, is_predefined_atom,
};
pub use opcode::{
    OPCODE_COUNT, OpcodeDef, OpcodeEntry, OperandFormat, opcode_by_id, opcode_by_name, opcode_defs,
    opcode_table, operand_format_table,
};
pub use options::{CompileOptions, compile_options};
pub use snapshot::{MetadataSnapshot, TableEntry};
pub use tags::{BytecodeTag, FunctionKind, ModeFlag};

/// Bytecode serialization format version written as byte 0 of every buffer
pub const BYTECODE_VERSION: u8 = 21;
