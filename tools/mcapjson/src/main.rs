mod commands;
mod writer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{convert::ConvertArgs, idl::IdlArgs, topics::TopicsArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcapjson", about = "Convert ROS 2 mcap files to JSON, one object per line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an mcap file, or every mcap file under a directory, to JSON lines
    Convert(ConvertArgs),
    /// List topics with their message types and counts
    Topics(TopicsArgs),
    /// Print the ROS 2 IDL definitions stored in an mcap file
    Idl(IdlArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => args.run(),
        Commands::Topics(args) => args.run(),
        Commands::Idl(args) => args.run(),
    }
}
