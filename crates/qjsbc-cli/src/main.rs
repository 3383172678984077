use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::EnvFilter;

mod commands;
mod config;

use commands::{
    compile::CompileCommand, dump::DumpCommand, info::InfoCommand, run::RunCommand,
    tables::TablesCommand,
};

#[derive(Parser)]
#[command(name = "qjsbc", version, about = "QuickJS-ng bytecode toolkit")]
struct Cli {
    /// Config file (default: qjsbc.toml or .qjsbcrc.toml, searched upward)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a source file to bytecode
    Compile(CompileCommand),
    /// Execute a bytecode file
    Run(RunCommand),
    /// Disassemble a bytecode or source file
    Dump(DumpCommand),
    /// Show engine and bytecode format details
    Info(InfoCommand),
    /// Print the metadata tables as JSON
    Tables(TablesCommand),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.log.level.as_deref())
        .unwrap_or("warn");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile(cmd) => cmd.run(&config)?,
        Commands::Run(cmd) => return cmd.run(&config),
        Commands::Dump(cmd) => cmd.run(&config)?,
        Commands::Info(cmd) => cmd.run()?,
        Commands::Tables(cmd) => cmd.run()?,
    }

    Ok(ExitCode::SUCCESS)
}
