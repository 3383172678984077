//! Tables command - print the metadata snapshot as JSON.

use anyhow::Result;
use clap::Args;
use qjsbc_runtime::meta::MetadataSnapshot;

#[derive(Args)]
pub struct TablesCommand {
    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl TablesCommand {
    pub fn run(&self) -> Result<()> {
        let snapshot = MetadataSnapshot::collect();
        let json = if self.pretty {
            snapshot.to_json_pretty()?
        } else {
            snapshot.to_json()?
        };
        println!("{json}");
        Ok(())
    }
}
