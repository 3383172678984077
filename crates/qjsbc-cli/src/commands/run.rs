//! Run command - execute a bytecode file.

use anyhow::{Context, Result};
use clap::Args;
use qjsbc_runtime::{ensure_compatible, execute_outcome};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;

#[derive(Args)]
pub struct RunCommand {
    /// Bytecode file to execute
    pub bytecode: PathBuf,

    /// Pre-register a placeholder module (repeatable)
    #[arg(long = "module", value_name = "NAME")]
    pub modules: Vec<String>,
}

impl RunCommand {
    /// Prints the result text; failures go to stderr with the `ERROR: `
    /// prefix and a non-zero exit code.
    pub fn run(&self, config: &Config) -> Result<ExitCode> {
        let bytes = std::fs::read(&self.bytecode)
            .with_context(|| format!("reading {}", self.bytecode.display()))?;

        let outcome = ensure_compatible(&bytes)
            .and_then(|()| execute_outcome(&bytes, &config.modules_with(&self.modules)));

        match outcome {
            Ok(text) => {
                println!("{text}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("{}", err.to_failure_text());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
