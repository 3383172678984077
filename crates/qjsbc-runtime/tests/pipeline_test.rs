//! Integration tests for the compile / gate / execute pipeline

use pretty_assertions::assert_eq;
use qjsbc_runtime::{
    CompileConfig, ERROR_PREFIX, ExecStage, RuntimeError, buffer_format_version, compile,
    compile_with, ensure_compatible, execute, execute_outcome, format_version, is_compatible,
};
use qjsbc_core::{CoreError, sys, with_engine};
use std::ffi::c_int;
use std::thread;

fn modules(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_compiled_buffer_is_compatible() {
    let bytes = compile("export default 1 + 1;", "t.js", &[]).unwrap();
    assert!(is_compatible(&bytes));
    assert_eq!(buffer_format_version(&bytes), format_version());
    ensure_compatible(&bytes).unwrap();
}

#[test]
fn test_empty_buffer_version() {
    assert_eq!(buffer_format_version(&[]), -1);
    assert!(!is_compatible(&[]));
}

#[test]
fn test_module_round_trip() {
    let bytes = compile("export default 1 + 1;", "t.js", &[]).unwrap();
    assert_eq!(execute(&bytes, &[]), "undefined");
}

#[test]
fn test_script_round_trip() {
    let bytes = compile_with("42;", "t.js", &[], &CompileConfig::script()).unwrap();
    assert_eq!(execute(&bytes, &[]), "42");
}

#[test]
fn test_strict_script_rejects_with() {
    let config = CompileConfig::script().strict(true);
    let err = compile_with("with ({}) {}", "t.js", &[], &config).unwrap_err();
    assert!(matches!(err, RuntimeError::Compile { .. }));
    assert!(compile_with("with ({}) {}", "t.js", &[], &CompileConfig::script()).is_ok());
}

#[test]
fn test_stripped_buffer_still_runs() {
    let config = CompileConfig::script().strip_debug(true).strip_source(true);
    let bytes = compile_with("'a' + 'b';", "t.js", &[], &config).unwrap();
    assert_eq!(execute(&bytes, &[]), "ab");
}

#[test]
fn test_compile_error_has_message() {
    match compile("function (", "t.js", &[]).unwrap_err() {
        RuntimeError::Compile { message, .. } => assert!(!message.is_empty()),
        other => panic!("expected compile error, got {other:?}"),
    }
}

#[test]
fn test_compile_with_preregistered_modules() {
    let names = modules(&["react", "@tarojs/components"]);
    let source = "import * as React from 'react'; import * as C from '@tarojs/components';";
    let bytes = compile(source, "page.js", &names).unwrap();
    assert_eq!(execute(&bytes, &names), "undefined");
}

#[test]
fn test_corrupted_buffers_fail_in_band() {
    let bytes = compile_with("'payload';", "t.js", &[], &CompileConfig::script()).unwrap();

    for len in [1, 2, bytes.len() / 2, bytes.len() - 1] {
        let text = execute(&bytes[..len], &[]);
        assert!(
            text.starts_with("ERROR: Failed to read bytecode"),
            "len {len}: {text}"
        );
    }

    let mut wrong_version = bytes.clone();
    wrong_version[0] = wrong_version[0].wrapping_add(1);
    assert!(!is_compatible(&wrong_version));
    assert!(execute(&wrong_version, &[]).starts_with(ERROR_PREFIX));
}

#[test]
fn test_failure_stages() {
    let script = compile_with("null.x;", "t.js", &[], &CompileConfig::script()).unwrap();
    match execute_outcome(&script, &[]).unwrap_err() {
        RuntimeError::Execution { stage, detail } => {
            assert_eq!(stage, ExecStage::RuntimeException);
            assert!(detail.contains("TypeError") || detail.contains("null"), "{detail}");
        }
        other => panic!("unexpected {other:?}"),
    }

    let module = compile("throw 'plain string';", "m.js", &[]).unwrap();
    assert_eq!(
        execute(&module, &[]),
        "ERROR: Failed to eval module: plain string"
    );
}

/// Serialize the value of an ordinary expression, not compiled code
fn plain_value_buffer(expression: &str) -> Vec<u8> {
    with_engine(|engine| {
        let value = engine.eval(expression, "value.js", 0)?;
        engine.write_object(&value, 0)
    })
    .map_err(|err: CoreError| err.to_string())
    .unwrap()
}

#[test]
fn test_plain_value_records_are_rejected() {
    for expression in ["({ a: 1 })", "'plain'", "[1, 2]"] {
        let bytes = plain_value_buffer(expression);
        assert!(is_compatible(&bytes));

        let text = execute(&bytes, &[]);
        assert!(
            text.starts_with("ERROR: Failed to eval object: "),
            "{expression}: {text}"
        );
        assert!(text.contains("bytecode function expected"), "{expression}: {text}");

        match execute_outcome(&bytes, &[]).unwrap_err() {
            RuntimeError::Execution { stage, .. } => assert_eq!(stage, ExecStage::EvalObject),
            other => panic!("{expression}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_plain_value_written_as_bytecode_is_rejected() {
    let bytes = with_engine(|engine| {
        let value = engine.eval("({ nested: [true, null] })", "value.js", 0)?;
        engine.write_object(&value, sys::JS_WRITE_OBJ_BYTECODE as c_int)
    })
    .map_err(|err: CoreError| err.to_string())
    .unwrap();
    assert!(execute(&bytes, &[]).starts_with("ERROR: Failed to eval object: "));
}

#[test]
fn test_module_registration_failure_is_hard() {
    let bytes = compile("export default 1;", "t.js", &[]).unwrap();
    let err = execute_outcome(&bytes, &modules(&["bad\0name"])).unwrap_err();
    assert!(err.is_hard_failure());
    assert!(execute(&bytes, &modules(&["bad\0name"])).starts_with("ERROR: Failed to create module"));
}

#[test]
fn test_concurrent_pipelines() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let source = format!("{i} * 10;");
                let bytes =
                    compile_with(&source, "t.js", &[], &CompileConfig::script()).unwrap();
                execute(&bytes, &[])
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (i * 10).to_string());
    }
}
