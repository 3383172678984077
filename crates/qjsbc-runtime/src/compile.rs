//! Source text to serialized bytecode.

use qjsbc_core::with_engine;
use tracing::debug;

use crate::config::CompileConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::loader;

/// Compile module source to a bytecode buffer.
///
/// `label` only shows up in diagnostics and stack traces. Each name in
/// `modules` is pre-registered as an empty placeholder module.
pub fn compile(source: &str, label: &str, modules: &[String]) -> RuntimeResult<Vec<u8>> {
    compile_with(source, label, modules, &CompileConfig::default())
}

/// Compile with explicit settings.
///
/// The engine used for compilation is released before this returns,
/// whether compilation succeeded or not.
pub fn compile_with(
    source: &str,
    label: &str,
    modules: &[String],
    config: &CompileConfig,
) -> RuntimeResult<Vec<u8>> {
    with_engine(|engine| {
        loader::install(engine, modules)?;

        let compiled = engine
            .eval(source, label, config.eval_flags())
            .map_err(RuntimeError::compile)?;

        let bytes = engine
            .write_object(&compiled, config.write_flags())
            .map_err(RuntimeError::serialization)?;

        debug!(label, mode = ?config.mode, len = bytes.len(), "compiled");
        Ok(bytes)
    })
}
