//! Error types for qjsbc-runtime
//!
//! Wraps core engine errors and adds the pipeline taxonomy. Execution
//! failures also have an in-band text form (`"ERROR: ..."`) for callers
//! that only deal in strings.

use std::fmt;
use thiserror::Error;

// Re-export core error types
pub use qjsbc_core::{CoreError, CoreResult};

/// Prefix of every failure string returned by [`crate::execute`]
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Where execution of a deserialized record failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStage {
    /// Resolving, linking or evaluating a module record
    EvalModule,
    /// Instantiating or calling a function-bytecode record
    RuntimeException,
    /// Evaluating any other record kind
    EvalObject,
}

impl fmt::Display for ExecStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EvalModule => "Failed to eval module",
            Self::RuntimeException => "Runtime exception",
            Self::EvalObject => "Failed to eval object",
        })
    }
}

/// Errors that can occur during pipeline operations
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Syntax or static error while compiling
    #[error("Failed to compile module detail: {message}\n{stack}")]
    Compile { message: String, stack: String },

    /// The engine could not write a compiled unit
    #[error("Failed to write bytecode: {0}")]
    Serialization(String),

    /// Malformed, truncated or incompatible buffer
    #[error("Failed to read bytecode: {0}")]
    Deserialization(String),

    /// Uncaught exception while running a record
    #[error("{stage}: {detail}")]
    Execution { stage: ExecStage, detail: String },

    /// Placeholder module creation failed
    #[error("Failed to create module: {0}")]
    ModuleRegistration(String),

    /// Core engine error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RuntimeError {
    /// Compile failure from an engine error. Exceptions keep their message
    /// and stack; anything else is a core failure.
    pub fn compile(err: CoreError) -> Self {
        match err {
            CoreError::Exception { message, stack } => Self::Compile { message, stack },
            other => Self::Core(other),
        }
    }

    /// Serialization failure
    pub fn serialization(err: CoreError) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Deserialization failure
    pub fn deserialization(err: CoreError) -> Self {
        Self::Deserialization(err.to_string())
    }

    /// Execution failure at the given stage
    pub fn execution(stage: ExecStage, err: CoreError) -> Self {
        Self::Execution {
            stage,
            detail: err.to_string(),
        }
    }

    /// Failures that abort an operation outright rather than being reported
    /// in-band
    pub fn is_hard_failure(&self) -> bool {
        matches!(self, Self::Compile { .. } | Self::ModuleRegistration(_) | Self::Core(_))
    }

    /// In-band text form, e.g. `ERROR: Runtime exception: boom`
    pub fn to_failure_text(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self)
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_text_prefixes() {
        let cases = [
            (
                RuntimeError::Deserialization("invalid version".into()),
                "ERROR: Failed to read bytecode: invalid version",
            ),
            (
                RuntimeError::Execution {
                    stage: ExecStage::EvalModule,
                    detail: "x".into(),
                },
                "ERROR: Failed to eval module: x",
            ),
            (
                RuntimeError::Execution {
                    stage: ExecStage::RuntimeException,
                    detail: "x".into(),
                },
                "ERROR: Runtime exception: x",
            ),
            (
                RuntimeError::Execution {
                    stage: ExecStage::EvalObject,
                    detail: "x".into(),
                },
                "ERROR: Failed to eval object: x",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_failure_text(), expected);
        }
    }

    #[test]
    fn test_compile_keeps_message_and_stack() {
        let err = RuntimeError::compile(CoreError::exception("unexpected token", "    at t.js:1"));
        match &err {
            RuntimeError::Compile { message, stack } => {
                assert_eq!(message, "unexpected token");
                assert_eq!(stack, "    at t.js:1");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.is_hard_failure());
    }

    #[test]
    fn test_compile_of_non_exception_is_core() {
        let err = RuntimeError::compile(CoreError::InteriorNul("a\0b".into()));
        assert!(matches!(err, RuntimeError::Core(CoreError::InteriorNul(_))));
    }

    #[test]
    fn test_execution_is_soft() {
        let err = RuntimeError::execution(ExecStage::EvalObject, CoreError::exception("e", ""));
        assert!(!err.is_hard_failure());
    }
}
