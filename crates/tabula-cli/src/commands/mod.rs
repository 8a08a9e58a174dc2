//! Subcommand implementations

pub mod init;
pub mod schema;
pub mod word;

/// Result type shared by all commands
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
