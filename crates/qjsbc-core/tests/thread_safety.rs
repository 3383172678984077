//! Compile-fail tests for thread safety
//!
//! These tests verify that Engine and OwnedValue cannot be sent across threads.
//! The `compile_fail` doc tests ensure that attempting to send these types
//! to another thread results in a compilation error.

/// ```compile_fail
/// use qjsbc_core::Engine;
/// use std::thread;
///
/// let engine = Engine::new().unwrap();
/// thread::spawn(move || {
///     // This should fail to compile: Engine is !Send
///     let _ = engine.eval("1 + 1", "t.js", 0);
/// });
/// ```
fn _engine_not_send() {}

/// ```compile_fail
/// use qjsbc_core::Engine;
/// use std::sync::Arc;
///
/// let engine = Arc::new(Engine::new().unwrap());
/// let engine2 = engine.clone();
/// std::thread::spawn(move || {
///     // This should fail to compile: Engine is !Sync
///     let _ = engine2;
/// });
/// ```
fn _engine_not_sync() {}

/// ```compile_fail
/// use qjsbc_core::Engine;
///
/// let value = {
///     let engine = Engine::new().unwrap();
///     // This should fail to compile: the value outlives its engine
///     engine.eval("42", "t.js", 0).unwrap()
/// };
/// let _ = value.to_js_string();
/// ```
fn _value_cannot_outlive_engine() {}

#[test]
fn engines_on_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                qjsbc_core::with_engine(|engine| {
                    engine.eval(&format!("{i} * 10"), "t.js", 0)?.to_js_string()
                })
            })
        })
        .collect();

    let mut results: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    results.sort();
    assert_eq!(results, vec!["0", "10", "20", "30"]);
}
