//! Dump command - disassemble a bytecode file or a source file.

use anyhow::{Context, Result};
use clap::Args;
use qjsbc_runtime::{disassemble, disassemble_source, ensure_compatible};
use std::path::PathBuf;
use tracing::warn;

use crate::config::Config;

#[derive(Args)]
pub struct DumpCommand {
    /// Bytecode file, or source file with --source
    pub input: PathBuf,

    /// Treat the input as module source and compile it first
    #[arg(long)]
    pub source: bool,
}

impl DumpCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let text = if self.source {
            let source = std::fs::read_to_string(&self.input)
                .with_context(|| format!("reading {}", self.input.display()))?;
            let label = self.input.display().to_string();
            disassemble_source(&source, &label, &config.modules_with(&[]))?
        } else {
            let bytes = std::fs::read(&self.input)
                .with_context(|| format!("reading {}", self.input.display()))?;
            ensure_compatible(&bytes)?;
            disassemble(&bytes)
        };

        if text.is_empty() {
            warn!("disassembly is not available in this build");
        }
        print!("{text}");
        Ok(())
    }
}
