//! Running serialized bytecode.
//!
//! A buffer is read back into a record and dispatched on its kind:
//!
//! - module record: imports resolved through the placeholder loader, then
//!   linked and evaluated; the result is the settled evaluation promise
//! - function-bytecode record: closed over and called with no arguments
//! - anything else: handed to the engine as-is, which rejects it
//!
//! Failures never escape as panics. [`execute`] renders them in-band with
//! the `ERROR: ` prefix; [`execute_outcome`] returns them typed.

use qjsbc_core::{CoreError, Engine, OwnedValue, PromiseState, with_engine};
use rquickjs_sys as sys;
use std::ffi::c_int;
use tracing::debug;

use crate::error::{ExecStage, RuntimeError, RuntimeResult};
use crate::loader;

/// Execute a buffer and return the result text, or a failure string
/// starting with `ERROR: `.
pub fn execute(bytes: &[u8], modules: &[String]) -> String {
    match execute_outcome(bytes, modules) {
        Ok(text) => text,
        Err(err) => {
            debug!(%err, "execution failed");
            err.to_failure_text()
        }
    }
}

/// Execute a buffer, keeping success and failure apart.
pub fn execute_outcome(bytes: &[u8], modules: &[String]) -> RuntimeResult<String> {
    with_engine(|engine| {
        loader::install(engine, modules)?;

        let record = engine
            .read_object(bytes, sys::JS_READ_OBJ_BYTECODE as c_int)
            .map_err(RuntimeError::deserialization)?;

        if record.is_module() {
            run_module(engine, record)
        } else if record.is_function_bytecode() {
            run_function(engine, record)
        } else {
            run_other(engine, record)
        }
    })
}

fn run_module<'e>(engine: &'e Engine, record: OwnedValue<'e>) -> RuntimeResult<String> {
    let stage = ExecStage::EvalModule;
    let fail = |err: CoreError| RuntimeError::execution(stage, err);

    let record = engine.resolve_module(record).map_err(fail)?;
    let evaluation = engine.eval_function(record).map_err(fail)?;
    engine.run_pending_jobs().map_err(fail)?;

    match evaluation.promise_state() {
        PromiseState::NotAPromise => stringify(&evaluation, stage),
        PromiseState::Fulfilled => stringify(&evaluation.promise_result(), stage),
        PromiseState::Rejected => Err(fail(evaluation.promise_result().to_core_error())),
        PromiseState::Pending => Err(RuntimeError::Execution {
            stage,
            detail: "module evaluation never settled".to_string(),
        }),
    }
}

/// The engine instantiates the closure and calls it in one step, so a throw
/// from either is reported as a runtime exception. Instantiation itself only
/// fails on allocation or a missing global binding, both of which surface as
/// a thrown value like any call-time error.
fn run_function<'e>(engine: &'e Engine, record: OwnedValue<'e>) -> RuntimeResult<String> {
    let stage = ExecStage::RuntimeException;
    let result = engine
        .eval_function(record)
        .map_err(|err| RuntimeError::execution(stage, err))?;
    engine
        .run_pending_jobs()
        .map_err(|err| RuntimeError::execution(stage, err))?;
    stringify(&result, stage)
}

fn run_other<'e>(engine: &'e Engine, record: OwnedValue<'e>) -> RuntimeResult<String> {
    let stage = ExecStage::EvalObject;
    let result = engine
        .eval_function(record)
        .map_err(|err| RuntimeError::execution(stage, err))?;
    stringify(&result, stage)
}

fn stringify(value: &OwnedValue<'_>, stage: ExecStage) -> RuntimeResult<String> {
    value
        .to_js_string()
        .map_err(|err| RuntimeError::execution(stage, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompileConfig, compile, compile_with};

    fn script(source: &str) -> Vec<u8> {
        compile_with(source, "t.js", &[], &CompileConfig::script()).unwrap()
    }

    #[test]
    fn test_module_completion_is_undefined() {
        let bytes = compile("export default 1 + 1;", "t.js", &[]).unwrap();
        assert_eq!(execute(&bytes, &[]), "undefined");
    }

    #[test]
    fn test_script_completion_value() {
        assert_eq!(execute(&script("42;"), &[]), "42");
        assert_eq!(execute(&script("[1, 2].map(x => x * 3).join()"), &[]), "3,6");
    }

    #[test]
    fn test_script_throw() {
        let text = execute(&script("throw new RangeError('out of range')"), &[]);
        assert!(text.starts_with("ERROR: Runtime exception: out of range"), "{text}");
    }

    #[test]
    fn test_module_throw() {
        let bytes = compile("throw new Error('module failed');", "m.js", &[]).unwrap();
        let text = execute(&bytes, &[]);
        assert!(text.starts_with("ERROR: Failed to eval module: module failed"), "{text}");
    }

    #[test]
    fn test_module_top_level_await() {
        let bytes = compile("await Promise.resolve(1);", "m.js", &[]).unwrap();
        assert_eq!(execute_outcome(&bytes, &[]).unwrap(), "undefined");
    }

    #[test]
    fn test_module_never_settles() {
        let bytes = compile("await new Promise(() => {});", "m.js", &[]).unwrap();
        let err = execute_outcome(&bytes, &[]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Execution {
                stage: ExecStage::EvalModule,
                ..
            }
        ));
    }

    #[test]
    fn test_module_with_placeholder_import() {
        let bytes = compile("import * as lib from 'lib'; export const n = 1;", "m.js", &[]).unwrap();
        assert_eq!(execute(&bytes, &["lib".to_string()]), "undefined");
        // unregistered specifiers are served by the loader callback
        assert_eq!(execute(&bytes, &[]), "undefined");
    }

    #[test]
    fn test_named_import_from_placeholder_fails_to_link() {
        let bytes = compile("import { missing } from 'lib'; missing();", "m.js", &[]).unwrap();
        let text = execute(&bytes, &[]);
        assert!(text.starts_with("ERROR: Failed to eval module: "), "{text}");
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = script("'hello';");
        let text = execute(&bytes[..bytes.len() / 2], &[]);
        assert!(text.starts_with("ERROR: Failed to read bytecode: "), "{text}");
    }

    #[test]
    fn test_empty_buffer() {
        let err = execute_outcome(&[], &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::Deserialization(_)));
    }
}
