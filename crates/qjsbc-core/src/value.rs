//! Reference-counted engine values with automatic release

use rquickjs_sys::*;
use std::fmt;
use std::mem;

use crate::engine::Engine;
use crate::error::{CoreError, CoreResult};
use crate::string::{c_str_to_rust, c_string};

/// Settlement state of a promise value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The value is not a promise
    NotAPromise,
    /// Still waiting on queued jobs
    Pending,
    /// Resolved with a value
    Fulfilled,
    /// Rejected with a reason
    Rejected,
}

/// An engine value holding one reference count
///
/// The value borrows the [`Engine`] it belongs to, so it can never be
/// released after its runtime. When dropped, the reference is released
/// with `JS_FreeValue`.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync` because it borrows an `!Sync` engine.
pub struct OwnedValue<'e> {
    value: JSValue,
    engine: &'e Engine,
}

impl fmt::Debug for OwnedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedValue(tag={})", self.tag())
    }
}

impl<'e> OwnedValue<'e> {
    /// Take ownership of a raw value
    ///
    /// # Safety
    /// `value` must belong to `engine` and the caller must own one reference
    /// to it (for example a fresh return value of an engine call).
    pub unsafe fn from_raw(engine: &'e Engine, value: JSValue) -> Self {
        Self { value, engine }
    }

    /// Get the raw value without giving up ownership
    pub fn raw(&self) -> JSValue {
        self.value
    }

    /// Give up ownership, for engine calls that consume their argument
    /// (`JS_EvalFunction`).
    pub fn into_raw(self) -> JSValue {
        let value = self.value;
        mem::forget(self);
        value
    }

    /// The engine this value belongs to
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// Raw value tag
    pub fn tag(&self) -> i32 {
        // SAFETY: reading the tag of a valid value has no side effects
        unsafe { JS_VALUE_GET_TAG(self.value) }
    }

    pub fn is_exception(&self) -> bool {
        // SAFETY: tag check only
        unsafe { JS_IsException(self.value) }
    }

    pub fn is_undefined(&self) -> bool {
        // SAFETY: tag check only
        unsafe { JS_IsUndefined(self.value) }
    }

    /// A compiled module record (`JS_TAG_MODULE`)
    pub fn is_module(&self) -> bool {
        self.tag() == JS_TAG_MODULE as i32
    }

    /// A compiled script or function record (`JS_TAG_FUNCTION_BYTECODE`)
    pub fn is_function_bytecode(&self) -> bool {
        self.tag() == JS_TAG_FUNCTION_BYTECODE as i32
    }

    /// Check if the value is an Error instance
    pub fn is_error(&self) -> bool {
        // SAFETY: self.value is valid
        unsafe { JS_IsError(self.value) }
    }

    pub fn is_promise(&self) -> bool {
        // SAFETY: self.value is valid
        unsafe { JS_IsPromise(self.value) }
    }

    /// Read a named property
    pub fn get_property(&self, name: &str) -> CoreResult<OwnedValue<'e>> {
        let key = c_string(name)?;
        let ctx = self.engine.raw_context();
        // SAFETY: ctx and self.value are valid, key is NUL-terminated
        let raw = unsafe { JS_GetPropertyStr(ctx, self.value, key.as_ptr()) };
        // SAFETY: the getter returns a new reference
        let prop = unsafe { OwnedValue::from_raw(self.engine, raw) };
        if prop.is_exception() {
            return Err(self.engine.take_exception());
        }
        Ok(prop)
    }

    /// Stringify the value with the engine's `ToString`
    pub fn to_js_string(&self) -> CoreResult<String> {
        let ctx = self.engine.raw_context();
        // SAFETY: ctx and self.value are valid
        let ptr = unsafe { JS_ToCString(ctx, self.value) };
        if ptr.is_null() {
            return Err(self.engine.take_exception());
        }
        // SAFETY: ptr is a valid engine-owned C string until freed below
        let text = unsafe { c_str_to_rust(ptr) };
        // SAFETY: ptr came from JS_ToCString on this context
        unsafe { JS_FreeCString(ctx, ptr) };
        Ok(text)
    }

    /// Convert a thrown or rejected value to error text.
    ///
    /// Error objects yield their `message` and `stack`; anything else is
    /// stringified as a whole with an empty stack.
    pub fn to_core_error(&self) -> CoreError {
        if self.is_error() {
            let message = self
                .get_property("message")
                .and_then(|v| v.to_js_string())
                .unwrap_or_default();
            let stack = self
                .get_property("stack")
                .ok()
                .filter(|v| !v.is_undefined())
                .and_then(|v| v.to_js_string().ok())
                .unwrap_or_default();
            CoreError::exception(message, stack)
        } else {
            let message = self
                .to_js_string()
                .unwrap_or_else(|_| "<unprintable exception>".to_string());
            CoreError::exception(message, "")
        }
    }

    /// Settlement state if this value is a promise
    pub fn promise_state(&self) -> PromiseState {
        if !self.is_promise() {
            return PromiseState::NotAPromise;
        }
        // SAFETY: ctx and self.value are valid
        let state = unsafe { JS_PromiseState(self.engine.raw_context(), self.value) };
        match state {
            JSPromiseStateEnum_JS_PROMISE_PENDING => PromiseState::Pending,
            JSPromiseStateEnum_JS_PROMISE_FULFILLED => PromiseState::Fulfilled,
            JSPromiseStateEnum_JS_PROMISE_REJECTED => PromiseState::Rejected,
            _ => PromiseState::NotAPromise,
        }
    }

    /// Fulfillment value or rejection reason of a settled promise
    pub fn promise_result(&self) -> OwnedValue<'e> {
        // SAFETY: ctx and self.value are valid; the result is a new reference
        unsafe {
            let raw = JS_PromiseResult(self.engine.raw_context(), self.value);
            OwnedValue::from_raw(self.engine, raw)
        }
    }
}

impl Drop for OwnedValue<'_> {
    fn drop(&mut self) {
        // SAFETY: we own exactly one reference and the engine is still alive
        // (enforced by the borrow)
        unsafe { JS_FreeValue(self.engine.raw_context(), self.value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::with_engine;

    #[test]
    fn test_to_js_string() {
        let text = with_engine(|engine| engine.eval("'a' + 1", "t.js", 0)?.to_js_string()).unwrap();
        assert_eq!(text, "a1");
    }

    #[test]
    fn test_thrown_error_has_message_and_stack() {
        let err = with_engine(|engine| {
            let value = engine.eval("new Error('bad thing')", "t.js", 0)?;
            assert!(value.is_error());
            Ok::<_, CoreError>(value.to_core_error())
        })
        .unwrap();
        assert_eq!(err.message(), Some("bad thing"));
        assert!(err.stack().is_some());
    }

    #[test]
    fn test_non_error_value_is_stringified() {
        let err = with_engine(|engine| {
            let value = engine.eval("({ toString() { return 'custom' } })", "t.js", 0)?;
            Ok::<_, CoreError>(value.to_core_error())
        })
        .unwrap();
        assert_eq!(err.to_string(), "custom");
    }

    #[test]
    fn test_promise_state_after_jobs() {
        let state = with_engine(|engine| {
            let value = engine.eval("Promise.resolve(1).then(x => x + 1)", "t.js", 0)?;
            assert!(value.is_promise());
            engine.run_pending_jobs()?;
            assert_eq!(value.promise_result().to_js_string()?, "2");
            Ok::<_, CoreError>(value.promise_state())
        })
        .unwrap();
        assert_eq!(state, PromiseState::Fulfilled);
    }

    #[test]
    fn test_plain_value_is_not_a_promise() {
        let state = with_engine(|engine| Ok::<_, CoreError>(engine.eval("1", "t.js", 0)?.promise_state()))
            .unwrap();
        assert_eq!(state, PromiseState::NotAPromise);
    }
}
