//! forge — AI project generator
//!
//! Sends a prompt to a prioritized list of LLM backends and materializes
//! the structured project description they reply with.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_store = forge_engine::ConfigStore::new();
    config_store.hydrate_env();
    let config = config_store.load();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("forge=debug")
            .init();
    }

    match cli.command {
        Commands::Generate {
            ref prompt,
            stream,
            ref out,
        } => {
            commands::generate::run(&config, prompt, stream, out.as_deref()).await?;
        }
        Commands::Models => {
            commands::models::run(&config);
        }
    }

    Ok(())
}
