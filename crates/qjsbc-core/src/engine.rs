//! Engine instance: one runtime plus one context, released exactly once

use rquickjs_sys::*;
use std::ffi::{c_char, c_int};
use std::marker::PhantomData;
use std::ptr;
use std::slice;
use tracing::{debug, trace};

use crate::error::{CoreError, CoreResult};
use crate::string::{c_str_to_rust, c_string, nul_terminated};
use crate::value::OwnedValue;

/// A freshly allocated engine runtime with a single context
///
/// Nothing is shared between engines. Dropping the engine frees the
/// context and then the runtime; values borrowed from it must be gone
/// by then, which the [`OwnedValue`] lifetime guarantees.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync`.
pub struct Engine {
    rt: *mut JSRuntime,
    ctx: *mut JSContext,
    /// Marker to make this type !Send + !Sync
    _not_send: PhantomData<*mut ()>,
}

impl Engine {
    /// Allocate a new runtime and context
    pub fn new() -> CoreResult<Self> {
        // SAFETY: no preconditions
        let rt = unsafe { JS_NewRuntime() };
        if rt.is_null() {
            return Err(CoreError::RuntimeCreation);
        }

        // SAFETY: rt is a valid runtime
        let ctx = unsafe { JS_NewContext(rt) };
        if ctx.is_null() {
            // SAFETY: rt was created above and has no contexts
            unsafe { JS_FreeRuntime(rt) };
            return Err(CoreError::ContextCreation);
        }

        debug!("engine allocated");
        Ok(Self {
            rt,
            ctx,
            _not_send: PhantomData,
        })
    }

    /// Get the raw context pointer
    pub fn raw_context(&self) -> *mut JSContext {
        self.ctx
    }

    /// Get the raw runtime pointer
    pub fn raw_runtime(&self) -> *mut JSRuntime {
        self.rt
    }

    /// Evaluate (or, with `JS_EVAL_FLAG_COMPILE_ONLY`, just compile) source
    /// text. `label` is the file name reported in stack traces.
    pub fn eval(&self, source: &str, label: &str, flags: c_int) -> CoreResult<OwnedValue<'_>> {
        let input = nul_terminated(source);
        let filename = c_string(label)?;

        // SAFETY: input is NUL-terminated past source.len(), filename is a
        // valid C string, ctx is alive
        let raw = unsafe {
            JS_Eval(
                self.ctx,
                input.as_ptr() as *const c_char,
                source.len() as size_t,
                filename.as_ptr(),
                flags,
            )
        };
        self.check(raw)
    }

    /// Serialize a value with the engine writer and copy the result out.
    ///
    /// The engine-allocated buffer is released before returning on both
    /// paths.
    pub fn write_object(&self, value: &OwnedValue<'_>, flags: c_int) -> CoreResult<Vec<u8>> {
        let mut len: size_t = 0;
        // SAFETY: ctx and value are valid, len is a valid out-pointer
        let buf = unsafe { JS_WriteObject(self.ctx, &mut len, value.raw(), flags) };
        if buf.is_null() {
            return Err(self.pending_exception_or("JS_WriteObject"));
        }

        // SAFETY: the writer returned len initialized bytes at buf
        let bytes = unsafe { slice::from_raw_parts(buf, len as usize) }.to_vec();
        // SAFETY: buf was allocated by the engine allocator for this context
        unsafe { js_free(self.ctx, buf.cast()) };

        trace!(len = bytes.len(), "object written");
        Ok(bytes)
    }

    /// Deserialize a buffer produced by [`Engine::write_object`]
    pub fn read_object(&self, bytes: &[u8], flags: c_int) -> CoreResult<OwnedValue<'_>> {
        // SAFETY: the reader is bounded by bytes.len() and does not retain
        // the pointer
        let raw = unsafe { JS_ReadObject(self.ctx, bytes.as_ptr(), bytes.len() as size_t, flags) };
        self.check(raw)
    }

    /// Resolve the imports of a module record read from bytecode.
    /// Non-module values pass through unchanged.
    ///
    /// Takes the record by value: on failure the engine frees every
    /// unresolved module definition itself, so the handle is given up
    /// instead of released a second time.
    pub fn resolve_module<'e>(&'e self, module: OwnedValue<'e>) -> CoreResult<OwnedValue<'e>> {
        // SAFETY: ctx and module are valid
        if unsafe { JS_ResolveModule(self.ctx, module.raw()) } < 0 {
            let _ = module.into_raw();
            return Err(self.take_exception());
        }
        Ok(module)
    }

    /// Instantiate and run a compiled record.
    ///
    /// Function bytecode is closed over and called with no arguments,
    /// module records are linked and evaluated (yielding a promise), and
    /// anything else is rejected by the engine with a TypeError.
    pub fn eval_function<'e>(&'e self, record: OwnedValue<'e>) -> CoreResult<OwnedValue<'e>> {
        // SAFETY: JS_EvalFunction consumes the reference handed over here
        let raw = unsafe { JS_EvalFunction(self.ctx, record.into_raw()) };
        self.check(raw)
    }

    /// Run queued promise jobs until none are left
    pub fn run_pending_jobs(&self) -> CoreResult<()> {
        let mut jobs = 0usize;
        // SAFETY: rt is alive
        while unsafe { JS_IsJobPending(self.rt) } {
            let mut job_ctx: *mut JSContext = ptr::null_mut();
            // SAFETY: rt is alive, job_ctx is a valid out-pointer
            let rc = unsafe { JS_ExecutePendingJob(self.rt, &mut job_ctx) };
            if rc < 0 {
                return Err(self.take_exception());
            }
            if rc == 0 {
                break;
            }
            jobs += 1;
        }
        trace!(jobs, "pending jobs drained");
        Ok(())
    }

    /// Install a module loader callback. The engine's default specifier
    /// normalization is kept.
    pub fn set_module_loader(&self, loader: JSModuleLoaderFunc) {
        // SAFETY: rt is alive; the callback ignores its opaque pointer
        unsafe { JS_SetModuleLoaderFunc(self.rt, None, loader, ptr::null_mut()) };
    }

    /// Create a native module named `name` whose exports are set up by
    /// `init`.
    pub fn new_c_module(&self, name: &str, init: JSModuleInitFunc) -> CoreResult<*mut JSModuleDef> {
        let name_c = c_string(name)?;
        // SAFETY: ctx is alive and name_c is a valid C string
        let module = unsafe { JS_NewCModule(self.ctx, name_c.as_ptr(), init) };
        if module.is_null() {
            return Err(self.pending_exception_or("JS_NewCModule"));
        }
        Ok(module)
    }

    /// Set the runtime's debug trace flags (`JS_DUMP_*`)
    pub fn set_dump_flags(&self, flags: u64) {
        // SAFETY: rt is alive
        unsafe { JS_SetDumpFlags(self.rt, flags) };
    }

    /// Take the pending exception out of the context as error text
    pub fn take_exception(&self) -> CoreError {
        // SAFETY: ctx is alive
        if !unsafe { JS_HasException(self.ctx) } {
            return CoreError::exception("unknown engine exception", "");
        }
        // SAFETY: JS_GetException transfers the exception reference to us
        let exception = unsafe { OwnedValue::from_raw(self, JS_GetException(self.ctx)) };
        exception.to_core_error()
    }

    /// Engine version string, e.g. `0.11.0`
    pub fn version() -> String {
        // SAFETY: returns a pointer to a static string
        unsafe { c_str_to_rust(JS_GetVersion()) }
    }

    fn check(&self, raw: JSValue) -> CoreResult<OwnedValue<'_>> {
        // SAFETY: raw is a fresh reference returned by an engine call
        let value = unsafe { OwnedValue::from_raw(self, raw) };
        if value.is_exception() {
            return Err(self.take_exception());
        }
        Ok(value)
    }

    fn pending_exception_or(&self, operation: &str) -> CoreError {
        // SAFETY: ctx is alive
        if unsafe { JS_HasException(self.ctx) } {
            self.take_exception()
        } else {
            CoreError::null_pointer(operation)
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // SAFETY: ctx and rt were created in new() and are freed only here,
        // context before runtime
        unsafe {
            JS_FreeContext(self.ctx);
            JS_FreeRuntime(self.rt);
        }
        debug!("engine released");
    }
}

/// Run `f` against a fresh engine and release it afterwards.
///
/// The engine is dropped on every exit of `f`: normal return, `?` error
/// propagation, or unwinding.
pub fn with_engine<T, E>(f: impl FnOnce(&Engine) -> Result<T, E>) -> Result<T, E>
where
    E: From<CoreError>,
{
    let engine = Engine::new()?;
    f(&engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_create_and_drop() {
        let engine = Engine::new().unwrap();
        assert!(!engine.raw_context().is_null());
        assert!(!engine.raw_runtime().is_null());
    }

    #[test]
    fn test_eval_returns_completion_value() {
        let engine = Engine::new().unwrap();
        let value = engine.eval("40 + 2", "t.js", 0).unwrap();
        assert_eq!(value.to_js_string().unwrap(), "42");
    }

    #[test]
    fn test_eval_syntax_error() {
        let engine = Engine::new().unwrap();
        let err = engine.eval("function (", "t.js", 0).unwrap_err();
        let message = err.message().unwrap();
        assert!(!message.is_empty());
    }

    #[test]
    fn test_write_then_read_script() {
        let engine = Engine::new().unwrap();
        let flags = (JS_EVAL_TYPE_GLOBAL | JS_EVAL_FLAG_COMPILE_ONLY) as c_int;
        let compiled = engine.eval("'ok'", "t.js", flags).unwrap();
        assert!(compiled.is_function_bytecode());

        let bytes = engine
            .write_object(&compiled, JS_WRITE_OBJ_BYTECODE as c_int)
            .unwrap();
        assert!(!bytes.is_empty());

        let record = engine
            .read_object(&bytes, JS_READ_OBJ_BYTECODE as c_int)
            .unwrap();
        let result = engine.eval_function(record).unwrap();
        assert_eq!(result.to_js_string().unwrap(), "ok");
    }

    #[test]
    fn test_read_garbage_is_an_error() {
        let engine = Engine::new().unwrap();
        let err = engine
            .read_object(&[0xff, 0x00, 0x13], JS_READ_OBJ_BYTECODE as c_int)
            .unwrap_err();
        assert!(matches!(err, CoreError::Exception { .. }));
    }

    #[test]
    fn test_with_engine_propagates_closure_error() {
        let result: CoreResult<()> =
            with_engine(|engine| engine.eval("throw new TypeError('nope')", "t.js", 0).map(|_| ()));
        let err = result.unwrap_err();
        assert_eq!(err.message(), Some("nope"));
    }

    #[test]
    fn test_unresolvable_import_gives_up_record() {
        // no loader installed, so the import cannot be resolved
        let engine = Engine::new().unwrap();
        let flags = (JS_EVAL_TYPE_MODULE | JS_EVAL_FLAG_COMPILE_ONLY) as c_int;
        let module = engine
            .eval("import { x } from 'nowhere'; x;", "m.js", flags)
            .unwrap();
        assert!(module.is_module());

        let err = engine.resolve_module(module).unwrap_err();
        assert!(err.message().unwrap().contains("nowhere"), "{err}");

        // the context is still usable and tears down cleanly afterwards
        let value = engine.eval("1 + 1", "t.js", 0).unwrap();
        assert_eq!(value.to_js_string().unwrap(), "2");
    }

    #[test]
    fn test_resolve_passes_non_modules_through() {
        let engine = Engine::new().unwrap();
        let value = engine.eval("'plain'", "t.js", 0).unwrap();
        let value = engine.resolve_module(value).unwrap();
        assert_eq!(value.to_js_string().unwrap(), "plain");
    }

    #[test]
    fn test_version_is_reported() {
        assert!(!Engine::version().is_empty());
    }
}
