//! Core error types for engine operations
//!
//! Engine exceptions are captured as text (message and stack) at the point
//! they are taken out of the context, so an error value never holds a
//! reference into a runtime that may already be gone.

use thiserror::Error;

/// Result type alias for core engine operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Structured error types for engine operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// `JS_NewRuntime` returned null
    #[error("Runtime creation failed")]
    RuntimeCreation,

    /// `JS_NewContext` returned null
    #[error("Context creation failed")]
    ContextCreation,

    /// A string passed to the engine contained a NUL byte
    #[error("String contains an interior NUL byte: {0:?}")]
    InteriorNul(String),

    /// An exception was thrown inside the engine
    #[error("{}", format_exception(message, stack))]
    Exception { message: String, stack: String },

    /// Engine call returned null without leaving an exception behind
    #[error("Internal engine error: {operation} returned null")]
    NullPointer { operation: String },
}

/// Joins message and stack the way the engine's own reporters do.
pub(crate) fn format_exception(message: &str, stack: &str) -> String {
    if stack.is_empty() {
        message.to_string()
    } else {
        format!("{}\n{}", message, stack)
    }
}

impl CoreError {
    /// Create an exception error from message and stack text
    pub fn exception(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self::Exception {
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Create a null-pointer error for the named engine call
    pub fn null_pointer(operation: impl Into<String>) -> Self {
        Self::NullPointer {
            operation: operation.into(),
        }
    }

    /// Exception message, if this error came from a thrown value
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Exception { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Exception stack trace, if one was captured
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Exception { stack, .. } if !stack.is_empty() => Some(stack),
            _ => None,
        }
    }
}
