//! Small enumerations: serialized value tags, function kinds, mode flags

use serde::Serialize;

use crate::snapshot::TableEntry;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $ty:ident: $repr:ty {
            $($(#[doc = $doc:literal])* $variant:ident = $value:expr => $name:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        $vis enum $ty {
            $($(#[doc = $doc])* $variant,)*
        }

        impl $ty {
            /// All values in engine order
            pub const ALL: &'static [$ty] = &[$(Self::$variant),*];

            /// Engine value
            pub const fn id(self) -> $repr {
                match self {
                    $(Self::$variant => $value,)*
                }
            }

            /// Exported name
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Look up by engine value
            pub fn from_id(id: $repr) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.id() == id)
            }

            /// (id, name) table
            pub fn table() -> Vec<TableEntry> {
                Self::ALL
                    .iter()
                    .map(|v| TableEntry::new(v.id() as u32, v.name()))
                    .collect()
            }
        }
    };
}

named_enum! {
    /// Discriminant byte of a serialized value
    pub enum BytecodeTag: u8 {
        /// `null`
        Null = 1 => "TC_TAG_NULL",
        /// `undefined`
        Undefined = 2 => "TC_TAG_UNDEFINED",
        /// `false`
        BoolFalse = 3 => "TC_TAG_BOOL_FALSE",
        /// `true`
        BoolTrue = 4 => "TC_TAG_BOOL_TRUE",
        /// 32-bit integer
        Int32 = 5 => "TC_TAG_INT32",
        /// IEEE double
        Float64 = 6 => "TC_TAG_FLOAT64",
        /// String
        String = 7 => "TC_TAG_STRING",
        /// Plain object
        Object = 8 => "TC_TAG_OBJECT",
        /// Array
        Array = 9 => "TC_TAG_ARRAY",
        /// BigInt
        BigInt = 10 => "TC_TAG_BIG_INT",
        /// Template object
        TemplateObject = 11 => "TC_TAG_TEMPLATE_OBJECT",
        /// Compiled function or script
        FunctionBytecode = 12 => "TC_TAG_FUNCTION_BYTECODE",
        /// Compiled module
        Module = 13 => "TC_TAG_MODULE",
        /// Typed array view
        TypedArray = 14 => "TC_TAG_TYPED_ARRAY",
        /// ArrayBuffer
        ArrayBuffer = 15 => "TC_TAG_ARRAY_BUFFER",
        /// SharedArrayBuffer
        SharedArrayBuffer = 16 => "TC_TAG_SHARED_ARRAY_BUFFER",
        /// RegExp
        RegExp = 17 => "TC_TAG_REGEXP",
        /// Date
        Date = 18 => "TC_TAG_DATE",
        /// Boxed primitive
        ObjectValue = 19 => "TC_TAG_OBJECT_VALUE",
        /// Back-reference to an already serialized object
        ObjectReference = 20 => "TC_TAG_OBJECT_REFERENCE",
        /// Map
        Map = 21 => "TC_TAG_MAP",
        /// Set
        Set = 22 => "TC_TAG_SET",
        /// Symbol
        Symbol = 23 => "TC_TAG_SYMBOL",
    }
}

named_enum! {
    /// Declared flavor of a function
    pub enum FunctionKind: u8 {
        /// Plain function
        Normal = 0 => "JS_FUNC_NORMAL",
        /// `function*`
        Generator = 1 => "JS_FUNC_GENERATOR",
        /// `async function`
        Async = 2 => "JS_FUNC_ASYNC",
        /// `async function*`
        AsyncGenerator = 3 => "JS_FUNC_ASYNC_GENERATOR",
    }
}

named_enum! {
    /// Function mode bits in the classic engine's bytecode header.
    ///
    /// QuickJS-ng serializes strictness as a plain byte and keeps no mode
    /// word, so these are the values older tooling keys on, not eval flags.
    pub enum ModeFlag: u32 {
        /// Strict mode code
        Strict = 1 << 0 => "JS_MODE_STRICT",
        /// Async function body
        Async = 1 << 2 => "JS_MODE_ASYNC",
        /// Stack traces stop at this frame
        BacktraceBarrier = 1 << 3 => "JS_MODE_BACKTRACE_BARRIER",
    }
}
