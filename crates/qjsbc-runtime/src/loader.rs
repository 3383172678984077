//! Placeholder module loader.
//!
//! Every specifier resolves to a native module with no exports. This lets
//! compile-only evaluation accept `import`/`export` syntax, and lets a
//! module record with imports link at execution time, without any real
//! resolution or I/O. Named imports from a placeholder fail to link, which
//! is reported as an execution failure.

use qjsbc_core::string::c_str_to_rust;
use qjsbc_core::Engine;
use rquickjs_sys::{JSContext, JSModuleDef, JS_NewCModule};
use std::ffi::{c_char, c_int, c_void};
use tracing::trace;

use crate::error::{RuntimeError, RuntimeResult};

/// Module init hook: nothing to export, never fails.
unsafe extern "C" fn init_placeholder(_ctx: *mut JSContext, _module: *mut JSModuleDef) -> c_int {
    0
}

/// Loader callback installed on every runtime the pipeline creates.
unsafe extern "C" fn load_placeholder(
    ctx: *mut JSContext,
    module_name: *const c_char,
    _opaque: *mut c_void,
) -> *mut JSModuleDef {
    trace!(module = %c_str_to_rust(module_name), "loading placeholder module");
    JS_NewCModule(ctx, module_name, Some(init_placeholder))
}

/// Install the placeholder loader and pre-register `modules`.
pub fn install(engine: &Engine, modules: &[String]) -> RuntimeResult<()> {
    engine.set_module_loader(Some(load_placeholder));
    for name in modules {
        register(engine, name)?;
    }
    Ok(())
}

/// Create one placeholder module by name.
pub fn register(engine: &Engine, name: &str) -> RuntimeResult<()> {
    engine
        .new_c_module(name, Some(init_placeholder))
        .map_err(|_| RuntimeError::ModuleRegistration(name.to_string()))?;
    trace!(module = name, "placeholder module registered");
    Ok(())
}
