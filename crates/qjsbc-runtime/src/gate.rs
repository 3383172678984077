//! Format version checks before a buffer is handed to the engine reader.
//!
//! The engine reader trusts its input. A buffer written by a different
//! engine build must be rejected here; only byte 0 is inspected.

use qjsbc_core::Engine;
use qjsbc_meta::BYTECODE_VERSION;
use tracing::warn;

use crate::error::{RuntimeError, RuntimeResult};

/// Format version of this build
pub fn format_version() -> i32 {
    BYTECODE_VERSION as i32
}

/// Version byte of a buffer, or -1 if the buffer is empty
pub fn buffer_format_version(bytes: &[u8]) -> i32 {
    bytes.first().map_or(-1, |&version| version as i32)
}

/// Whether a buffer was written by a compatible engine build
pub fn is_compatible(bytes: &[u8]) -> bool {
    buffer_format_version(bytes) == format_version()
}

/// Like [`is_compatible`], but explains a mismatch
pub fn ensure_compatible(bytes: &[u8]) -> RuntimeResult<()> {
    match buffer_format_version(bytes) {
        -1 => Err(RuntimeError::Deserialization("empty buffer".to_string())),
        found if found != format_version() => {
            warn!(found, expected = format_version(), "bytecode version mismatch");
            Err(RuntimeError::Deserialization(format!(
                "incompatible bytecode version {} (expected {})",
                found,
                format_version()
            )))
        }
        _ => Ok(()),
    }
}

/// Version string of the embedded engine
pub fn engine_version() -> String {
    Engine::version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        assert_eq!(buffer_format_version(&[]), -1);
        assert!(!is_compatible(&[]));
        assert!(ensure_compatible(&[]).is_err());
    }

    #[test]
    fn test_version_byte() {
        assert_eq!(buffer_format_version(&[0x45, 1, 2]), 0x45);
        assert!(is_compatible(&[BYTECODE_VERSION, 0xff]));
        assert!(!is_compatible(&[BYTECODE_VERSION.wrapping_add(1)]));
    }

    #[test]
    fn test_ensure_compatible_message() {
        let err = ensure_compatible(&[5]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to read bytecode: incompatible bytecode version 5 (expected 21)"
        );
        assert!(ensure_compatible(&[BYTECODE_VERSION]).is_ok());
    }
}
