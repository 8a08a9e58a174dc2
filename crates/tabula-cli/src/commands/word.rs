//! Word commands
//!
//! Usage:
//!   tabula word add <WORD> [--familiarity <LEVEL>] [--definition <TEXT>]...
//!   tabula word list [--filter <JSON>] [--order <COLUMN[ asc|desc]>]... [--limit N] [--offset N]
//!   tabula word count [--filter <JSON>]
//!   tabula word update (--filter <JSON> | --all) [--word <WORD>] [--familiarity <LEVEL>]
//!   tabula word delete (--filter <JSON> | --all)

use clap::{Args, Subcommand};
use rusqlite::Connection;
use tabula_core::filter::SearchFilter;
use tabula_store::{db, OrderBy, Peer, Select, StoreConfig};

use super::CliResult;
use crate::vocab::{self, Question, Word, WordDefinition, FAMILIARITY_LEVELS};

#[derive(Debug, Args)]
pub struct WordArgs {
    #[command(subcommand)]
    pub command: WordCommand,
}

#[derive(Debug, Subcommand)]
pub enum WordCommand {
    /// Add a word, optionally with definitions
    Add(AddArgs),
    /// List words as JSON lines
    List(ListArgs),
    /// Count words
    Count(FilterArgs),
    /// Change words matching a filter
    Update(UpdateArgs),
    /// Delete words matching a filter
    Delete(TargetArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub word: String,

    #[arg(long, value_parser = parse_familiarity)]
    pub familiarity: Option<String>,

    /// Definition to record; may be repeated
    #[arg(long = "definition")]
    pub definitions: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Filter as JSON: {"conditions":[{"key","operator","value"}],"logic":"AND"}
    #[arg(long, value_parser = parse_filter)]
    pub filter: Option<SearchFilter>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sort column, optionally followed by asc/desc or prefixed with '-'; may be repeated
    #[arg(long = "order", value_parser = parse_order)]
    pub order: Vec<OrderBy>,

    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub offset: Option<u64>,

    /// Comma-separated columns to fetch
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Filter as JSON; required unless --all is given
    #[arg(long, value_parser = parse_filter, required_unless_present = "all")]
    pub filter: Option<SearchFilter>,

    /// Apply to every word
    #[arg(long, conflicts_with = "filter")]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub word: Option<String>,

    #[arg(long, value_parser = parse_familiarity)]
    pub familiarity: Option<String>,
}

fn parse_filter(raw: &str) -> Result<SearchFilter, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid filter JSON: {}", e))
}

fn parse_order(raw: &str) -> Result<OrderBy, String> {
    OrderBy::parse(raw).ok_or_else(|| format!("invalid order '{}'", raw))
}

fn parse_familiarity(raw: &str) -> Result<String, String> {
    let level = raw.to_ascii_lowercase();
    if FAMILIARITY_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(format!("expected one of: {}", FAMILIARITY_LEVELS.join(", ")))
    }
}

pub fn execute(config: &StoreConfig, args: WordArgs) -> CliResult<()> {
    let conn = db::open_with(config)?;
    match args.command {
        WordCommand::Add(add) => execute_add(&conn, add),
        WordCommand::List(list) => execute_list(&conn, list),
        WordCommand::Count(count) => execute_count(&conn, count),
        WordCommand::Update(update) => execute_update(&conn, update),
        WordCommand::Delete(target) => execute_delete(&conn, target),
    }
}

fn words() -> CliResult<Peer<Word>> {
    Ok(Peer::new(&*vocab::registry()?, vocab::WORDS)?)
}

/// `--all` maps to the empty filter, which matches every row
fn target_filter(target: TargetArgs) -> SearchFilter {
    target.filter.unwrap_or_default()
}

fn execute_add(conn: &Connection, args: AddArgs) -> CliResult<()> {
    let registry = vocab::registry()?;
    let words: Peer<Word> = Peer::new(&registry, vocab::WORDS)?;
    let definitions: Peer<WordDefinition> = Peer::new(&registry, vocab::WORD_DEFINITIONS)?;

    let id = words.insert(
        conn,
        &Word {
            word: Some(args.word.clone()),
            familiarity: args.familiarity,
            ..Default::default()
        },
    )?;
    for definition in args.definitions {
        definitions.insert(
            conn,
            &WordDefinition {
                word_id: Some(id),
                definition: Some(definition),
                ..Default::default()
            },
        )?;
    }

    println!("✓ Added '{}' (id: {})", args.word, id);
    Ok(())
}

fn execute_list(conn: &Connection, args: ListArgs) -> CliResult<()> {
    let mut query = Select::new().filter(args.filter.filter.unwrap_or_default());
    if !args.columns.is_empty() {
        query = query.columns(args.columns);
    }
    for order in args.order {
        query = query.order_by(order);
    }
    query.limit = args.limit;
    query.offset = args.offset;

    for word in words()?.select(conn, &query)? {
        println!("{}", serde_json::to_string(&word)?);
    }
    Ok(())
}

fn execute_count(conn: &Connection, args: FilterArgs) -> CliResult<()> {
    let count = words()?.count(conn, args.filter.as_ref())?;
    println!("{}", count);
    Ok(())
}

fn execute_update(conn: &Connection, args: UpdateArgs) -> CliResult<()> {
    let patch = Word {
        word: args.word,
        familiarity: args.familiarity,
        ..Default::default()
    };
    let affected = words()?.update(conn, &patch, &target_filter(args.target))?;
    println!("✓ Updated {} word(s)", affected);
    Ok(())
}

/// Delete matching words together with their definitions and questions
fn execute_delete(conn: &Connection, args: TargetArgs) -> CliResult<()> {
    let registry = vocab::registry()?;
    let words: Peer<Word> = Peer::new(&registry, vocab::WORDS)?;
    let definitions: Peer<WordDefinition> = Peer::new(&registry, vocab::WORD_DEFINITIONS)?;
    let questions: Peer<Question> = Peer::new(&registry, vocab::QUESTIONS)?;

    let filter = target_filter(args);
    let tx = conn.unchecked_transaction()?;

    let ids: Vec<i64> = words
        .select(&tx, &Select::new().columns(["id"]).filter(filter.clone()))?
        .into_iter()
        .filter_map(|w| w.id)
        .collect();
    if !ids.is_empty() {
        let dependents = SearchFilter::and().condition("word_id", "in", serde_json::to_string(&ids)?);
        definitions.delete(&tx, &dependents)?;
        questions.delete(&tx, &dependents)?;
    }
    let affected = words.delete(&tx, &filter)?;
    tx.commit()?;

    println!("✓ Deleted {} word(s)", affected);
    Ok(())
}
