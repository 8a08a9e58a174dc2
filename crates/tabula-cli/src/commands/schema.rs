//! Schema inspection command
//!
//! Usage: tabula schema show [--dialect <sqlite|postgres|mysql>]

use clap::{Args, Subcommand, ValueEnum};
use tabula_store::{plan, Dialect};

use super::CliResult;
use crate::vocab;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Print the DDL for every table, in creation order
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long, value_enum, default_value_t = DialectArg::Sqlite)]
    pub dialect: DialectArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Sqlite,
    Postgres,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

pub fn execute(args: SchemaArgs) -> CliResult<()> {
    match args.command {
        SchemaCommand::Show(show) => {
            let registry = vocab::registry()?;
            let plan = plan(&registry, show.dialect.into())?;
            print!("{}", plan.to_sql());
            Ok(())
        }
    }
}
