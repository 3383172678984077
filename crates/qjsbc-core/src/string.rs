//! String conversions at the engine boundary

use std::ffi::{CStr, CString, c_char};

use crate::error::{CoreError, CoreResult};

/// Convert a Rust string into a C string for engine APIs taking names
/// (module specifiers, file labels, property keys).
pub fn c_string(s: &str) -> CoreResult<CString> {
    CString::new(s).map_err(|_| CoreError::InteriorNul(s.to_string()))
}

/// Copy source text into a NUL-terminated buffer.
///
/// `JS_Eval` takes an explicit length but still reads one byte past it, so
/// the input must be terminated. Interior NUL bytes are allowed here because
/// the length is passed separately.
pub fn nul_terminated(source: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(source.len() + 1);
    buf.extend_from_slice(source.as_bytes());
    buf.push(0);
    buf
}

/// Convert an engine-owned C string to a Rust String
///
/// # Safety
/// `ptr` must be null or point to a valid NUL-terminated string
pub unsafe fn c_str_to_rust(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: ptr is valid per caller contract
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}
