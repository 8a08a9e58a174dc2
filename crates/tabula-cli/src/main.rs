//! Tabula CLI
//!
//! A small vocabulary notebook built on the Tabula data-access layer

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabula_core::errors::{ExError, TabulaError};
use tabula_core::logging_facility::{init, Profile};

mod commands;
mod settings;
mod vocab;

#[derive(Debug, Parser)]
#[command(name = "tabula")]
#[command(about = "Tabula - vocabulary notebook on a schema-driven store", long_about = None)]
struct Cli {
    /// TOML store configuration (defaults to ./tabula.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding configuration and environment
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log operations to stderr as JSON
    #[arg(long, global = true, conflicts_with = "verbose")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create any missing tables and indexes
    Init,
    /// Word operations
    Word(commands::word::WordArgs),
    /// Schema inspection
    Schema(commands::schema::SchemaArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.json_logs {
        init(Profile::Production);
    } else if cli.verbose {
        init(Profile::Development);
    }

    let result = settings::resolve(cli.config.as_deref(), cli.db).and_then(|config| {
        match cli.command {
            Commands::Init => commands::init::execute(&config),
            Commands::Word(args) => commands::word::execute(&config, args),
            Commands::Schema(args) => commands::schema::execute(args),
        }
    });

    if let Err(e) = result {
        match e.downcast_ref::<TabulaError>() {
            Some(err) => {
                eprintln!("Error: {}", ExError::from(err.clone()));
                std::process::exit(if err.is_client_error() { 2 } else { 1 });
            }
            None => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
