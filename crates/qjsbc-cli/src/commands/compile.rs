//! Compile command - source file to bytecode file.

use anyhow::{Context, Result};
use clap::Args;
use qjsbc_runtime::{CompileMode, compile_with};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;

/// Extension of bytecode files written when no `--output` is given
pub const BYTECODE_EXTENSION: &str = "qjsbc";

#[derive(Args)]
pub struct CompileCommand {
    /// Source file to compile
    pub input: PathBuf,

    /// Output file (default: input with a .qjsbc extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name shown in diagnostics and stack traces (default: input path)
    #[arg(long)]
    pub label: Option<String>,

    /// Pre-register a placeholder module (repeatable)
    #[arg(long = "module", value_name = "NAME")]
    pub modules: Vec<String>,

    /// Compile as a classic script instead of a module
    #[arg(long)]
    pub script: bool,

    /// Compile in strict mode
    #[arg(long)]
    pub strict: bool,
}

impl CompileCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))?;

        let mut compile_config = config.compile.clone();
        if self.script {
            compile_config = compile_config.mode(CompileMode::Script);
        }
        if self.strict {
            compile_config = compile_config.strict(true);
        }

        let label = self
            .label
            .clone()
            .unwrap_or_else(|| self.input.display().to_string());
        let modules = config.modules_with(&self.modules);

        let bytes = compile_with(&source, &label, &modules, &compile_config)?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.input));
        std::fs::write(&output, &bytes)
            .with_context(|| format!("writing {}", output.display()))?;

        info!(output = %output.display(), len = bytes.len(), "bytecode written");
        Ok(())
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension(BYTECODE_EXTENSION)
}
