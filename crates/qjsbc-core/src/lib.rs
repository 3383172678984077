// Allow raw pointer dereference in public functions - this is an FFI wrapper
// where the caller is responsible for providing valid engine pointers.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

//! Safe wrappers for the QuickJS-ng engine.
//!
//! This crate provides memory-safe, RAII-based wrappers around
//! the raw engine bindings in `rquickjs-sys`. It is the only place
//! in the workspace that owns engine pointers directly.
//!
//! # Example
//!
//! ```
//! use qjsbc_core::{CoreError, with_engine};
//!
//! let text = with_engine(|engine| {
//!     let value = engine.eval("6 * 7", "<example>", 0)?;
//!     value.to_js_string()
//! })
//! .unwrap();
//! assert_eq!(text, "42");
//! # Ok::<(), CoreError>(())
//! ```
//!
//! # Resource discipline
//!
//! An [`Engine`] owns exactly one engine runtime and one context and frees
//! both exactly once when dropped. [`OwnedValue`] borrows the engine it came
//! from, so the borrow checker rejects any value that would outlive its
//! engine. [`with_engine`] is the scoped form: acquire, run, release on every
//! exit path.
//!
//! # Thread Safety
//!
//! All types in this crate are `!Send` and `!Sync` because engine runtimes
//! and values are bound to the thread that created them. Independent
//! engines on independent threads are fine; each call of [`with_engine`]
//! builds its own.
//!
//! ## Example: Wrong (won't compile)
//!
//! ```compile_fail
//! use qjsbc_core::Engine;
//! use std::thread;
//!
//! let engine = Engine::new().unwrap();
//! thread::spawn(move || {
//!     let _ = engine.eval("1 + 1", "t.js", 0); // Error: Engine is !Send
//! });
//! ```
//!
//! ## Example: Correct
//!
//! ```
//! use qjsbc_core::with_engine;
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         std::thread::spawn(move || {
//!             with_engine(|engine| engine.eval(&format!("{i} + 1"), "t.js", 0)?.to_js_string())
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     assert!(handle.join().unwrap().is_ok());
//! }
//! ```

mod engine;
mod error;
pub mod string;
mod value;

pub use engine::{Engine, with_engine};
pub use error::{CoreError, CoreResult};
pub use string::{c_string, nul_terminated};
pub use value::{OwnedValue, PromiseState};

// Re-export the raw bindings for direct FFI access when needed
pub use rquickjs_sys as sys;
