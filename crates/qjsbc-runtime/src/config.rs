//! Compilation settings.

use rquickjs_sys as sys;
use serde::{Deserialize, Serialize};
use std::ffi::c_int;

/// Syntax goal of the compiled source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// ES module: `import`/`export` allowed, serialized as a module record.
    /// Executing it yields the settled module promise, typically `undefined`.
    #[default]
    Module,
    /// Classic script: serialized as a function-bytecode record whose call
    /// returns the completion value of the last statement.
    Script,
}

/// How source text is compiled and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Module or script syntax.
    /// Default: module
    pub mode: CompileMode,

    /// Compile scripts in strict mode (modules always are).
    /// Default: false
    pub strict: bool,

    /// Leave line/column tables out of the buffer.
    /// Default: false
    pub strip_debug: bool,

    /// Leave embedded function source text out of the buffer.
    /// Default: false
    pub strip_source: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            mode: CompileMode::Module,
            strict: false,
            strip_debug: false,
            strip_source: false,
        }
    }
}

impl CompileConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Module-syntax config.
    pub fn module() -> Self {
        Self::default()
    }

    /// Script-syntax config.
    pub fn script() -> Self {
        Self {
            mode: CompileMode::Script,
            ..Default::default()
        }
    }

    /// Set the syntax goal.
    pub fn mode(mut self, mode: CompileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable strict mode.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Enable or disable stripping of debug info.
    pub fn strip_debug(mut self, enabled: bool) -> Self {
        self.strip_debug = enabled;
        self
    }

    /// Enable or disable stripping of embedded source.
    pub fn strip_source(mut self, enabled: bool) -> Self {
        self.strip_source = enabled;
        self
    }

    /// Flags for the compile-only `JS_Eval` call.
    pub fn eval_flags(&self) -> c_int {
        let mut flags = sys::JS_EVAL_FLAG_COMPILE_ONLY;
        flags |= match self.mode {
            CompileMode::Module => sys::JS_EVAL_TYPE_MODULE,
            CompileMode::Script => sys::JS_EVAL_TYPE_GLOBAL,
        };
        if self.strict {
            flags |= sys::JS_EVAL_FLAG_STRICT;
        }
        flags as c_int
    }

    /// Flags for `JS_WriteObject`.
    pub fn write_flags(&self) -> c_int {
        let mut flags = sys::JS_WRITE_OBJ_BYTECODE;
        if self.strip_debug {
            flags |= sys::JS_WRITE_OBJ_STRIP_DEBUG;
        }
        if self.strip_source {
            flags |= sys::JS_WRITE_OBJ_STRIP_SOURCE;
        }
        flags as c_int
    }
}
