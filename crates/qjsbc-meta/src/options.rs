//! Compile-time feature flags of the engine build

bitflags::bitflags! {
    /// Features compiled into this build.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileOptions: u32 {
        /// Bytecode disassembly is available
        const DUMP = 1 << 0;
        /// BigInt and extended numeric support
        const BIGNUM = 1 << 1;
        /// Compact short-form opcodes are emitted
        const SHORT_OPCODES = 1 << 2;
    }
}

/// Flags of the current build.
///
/// BigInt and short opcodes are unconditional in the embedded engine;
/// disassembly follows the `dump` cargo feature.
pub const fn compile_options() -> CompileOptions {
    let base = CompileOptions::BIGNUM.union(CompileOptions::SHORT_OPCODES);
    if cfg!(feature = "dump") {
        base.union(CompileOptions::DUMP)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_always_has_bignum_and_short_opcodes() {
        let opts = compile_options();
        assert!(opts.contains(CompileOptions::BIGNUM | CompileOptions::SHORT_OPCODES));
        assert_eq!(opts.contains(CompileOptions::DUMP), cfg!(feature = "dump"));
    }

    #[test]
    fn test_flag_bits() {
        assert_eq!(CompileOptions::DUMP.bits(), 1);
        assert_eq!(CompileOptions::BIGNUM.bits(), 2);
        assert_eq!(CompileOptions::SHORT_OPCODES.bits(), 4);
    }

    #[test]
    fn test_flag_names() {
        let names: Vec<_> = (CompileOptions::BIGNUM | CompileOptions::SHORT_OPCODES)
            .iter_names()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["BIGNUM", "SHORT_OPCODES"]);
    }
}
