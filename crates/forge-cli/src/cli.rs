//! CLI argument and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge", version, about = "AI project generator")]
pub struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project from a prompt.
    Generate {
        /// What to build.
        prompt: String,

        /// Stream the response and parse it incrementally.
        #[arg(long)]
        stream: bool,

        /// Write generated files under this directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the configured model priority list.
    Models,
}
