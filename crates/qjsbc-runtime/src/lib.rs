// Allow unsafe operations inside unsafe functions without nested unsafe blocks.
// The loader callbacks are `unsafe extern "C"` functions made of engine calls.
#![allow(unsafe_op_in_unsafe_fn)]
// Allow raw pointer dereference in public functions - this is an FFI-heavy crate
// where the caller is responsible for providing valid pointers.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

//! qjsbc-runtime - bytecode pipeline over the QuickJS-ng engine.
//!
//! Every operation allocates its own engine, does its work and releases the
//! engine before returning, on success and failure alike. No engine state
//! survives between calls, so operations may run concurrently from any
//! number of threads.
//!
//! # Example
//!
//! ```
//! use qjsbc_runtime::{CompileConfig, compile_with, execute, is_compatible};
//!
//! let bytes = compile_with("6 * 7;", "answer.js", &[], &CompileConfig::script()).unwrap();
//! assert!(is_compatible(&bytes));
//! assert_eq!(execute(&bytes, &[]), "42");
//! ```
//!
//! # Architecture
//!
//! ```text
//!   source ──► compile ──► bytes ──► gate ──► execute ──► text | "ERROR: …"
//!                 │                    │
//!                 │                    └────► disassemble ──► text ("" without `dump`)
//!                 └── loader stub: every import resolves to an empty module
//! ```
//!
//! Numbering tables for interpreting buffers live in `qjsbc-meta` and are
//! re-exported here as [`meta`].

pub mod compile;
pub mod config;
pub mod disasm;
pub mod error;
pub mod exec;
pub mod gate;
pub mod loader;

pub use compile::{compile, compile_with};
pub use config::{CompileConfig, CompileMode};
pub use disasm::{disassemble, disassemble_source};
pub use error::{ERROR_PREFIX, ExecStage, RuntimeError, RuntimeResult};
pub use exec::{execute, execute_outcome};
pub use gate::{buffer_format_version, engine_version, ensure_compatible, format_version, is_compatible};

pub use qjsbc_meta as meta;
