//! Info command - engine build details, optionally for one bytecode file.

use anyhow::{Context, Result};
use clap::Args;
use qjsbc_runtime::meta::compile_options;
use qjsbc_runtime::{buffer_format_version, engine_version, format_version, is_compatible};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoCommand {
    /// Bytecode file to inspect
    pub bytecode: Option<PathBuf>,
}

impl InfoCommand {
    pub fn run(&self) -> Result<()> {
        println!("engine:          QuickJS-ng {}", engine_version());
        println!("format version:  {}", format_version());
        println!("compile options: {}", option_names().join(", "));

        if let Some(path) = &self.bytecode {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            println!();
            println!("file:            {}", path.display());
            println!("size:            {} bytes", bytes.len());
            println!("version byte:    {}", buffer_format_version(&bytes));
            println!(
                "compatible:      {}",
                if is_compatible(&bytes) { "yes" } else { "no" }
            );
        }
        Ok(())
    }
}

fn option_names() -> Vec<&'static str> {
    compile_options().iter_names().map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_names() {
        let names = option_names();
        assert!(names.contains(&"BIGNUM"));
        assert_eq!(names.contains(&"DUMP"), cfg!(feature = "dump"));
    }
}
