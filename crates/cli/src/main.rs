//! Trove CLI - Database migrations and demo data tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! trove migrate
//!
//! # Load demo accounts and listings
//! trove seed crates/cli/seeds/demo.yaml
//!
//! # Wipe marketplace tables before loading
//! trove seed crates/cli/seeds/demo.yaml --reset
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Load demo users and listings from a YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "trove")]
#[command(author, version, about = "Trove CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load demo users and listings from a YAML file
    Seed {
        /// Path to the YAML seed file
        #[arg(default_value = "crates/cli/seeds/demo.yaml")]
        file: String,

        /// Delete all marketplace rows before loading
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, reset } => commands::seed::run(&file, reset).await?,
    }
    Ok(())
}
