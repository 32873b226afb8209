use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use mcap2json::McapReader;

const SEPARATOR_WIDTH: usize = 80;

#[derive(Args)]
pub struct IdlArgs {
    /// Path to the mcap file
    input: PathBuf,

    /// Only show schemas used by these topics
    topics: Vec<String>,
}

impl IdlArgs {
    pub fn run(self) -> Result<()> {
        let reader = McapReader::new();
        let definitions = reader.idl_definitions(&self.input, &self.topics)?;

        if definitions.is_empty() {
            eprintln!("# No ros2idl schemas found");
            return Ok(());
        }

        let rule = "=".repeat(SEPARATOR_WIDTH);
        for def in &definitions {
            println!("{rule}");
            println!("Schema ID: {}", def.schema_id);
            println!("Type: {}", def.name);
            println!("Topics: {}", def.topics.join(", "));
            println!("{}", "-".repeat(SEPARATOR_WIDTH));
            println!("{}", def.text.trim_end());
        }
        println!("{rule}");
        eprintln!("# Listed {} IDL definitions", definitions.len());
        Ok(())
    }
}
