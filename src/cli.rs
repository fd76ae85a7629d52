//! # Command Line Interface
//!
//! This module provides CLI commands for checking and listing secrets files
//! during deployment, without writing secret values to the terminal unless
//! explicitly asked to.

use clap::{Parser, Subcommand};

use crate::resolver::SecretsResolver;

#[derive(Parser)]
#[command(name = "secretsource")]
#[command(about = "URI-addressed INI secrets loading with environment variable interpolation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a secrets file and report whether every entry loads
    Check {
        /// Secrets URI (relative path, file:// or resource://)
        uri: String,

        /// Record missing environment variables as unset instead of failing
        #[arg(long)]
        non_strict: bool,
    },

    /// List the composite keys of a secrets file
    List {
        /// Secrets URI (relative path, file:// or resource://)
        uri: String,

        /// Record missing environment variables as unset instead of failing
        #[arg(long)]
        non_strict: bool,

        /// Print raw secret values instead of redacting them
        #[arg(long)]
        reveal: bool,
    },
}

/// Run CLI commands
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { uri, non_strict } => {
            let secrets = SecretsResolver::new().read_secrets(&uri, !non_strict)?;
            let unset = secrets.values().filter(|v| v.is_none()).count();
            if unset > 0 {
                println!("{}: {} entries ({} unset)", uri, secrets.len(), unset);
            } else {
                println!("{}: {} entries", uri, secrets.len());
            }
        }
        Commands::List { uri, non_strict, reveal } => {
            let secrets = SecretsResolver::new().read_secrets(&uri, !non_strict)?;
            for (key, value) in &secrets {
                match value {
                    Some(value) if reveal => println!("{} = {}", key, value.expose_secret()),
                    Some(value) => println!("{} = {}", key, value),
                    None => println!("{} = <unset>", key),
                }
            }
        }
    }

    Ok(())
}
