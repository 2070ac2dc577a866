//! Command-line front end for the book store.
//!
//! # Responsibility
//! - Resolve database and logging settings from flags or environment.
//! - Map each subcommand to one store operation and print the result.
//!
//! # Invariants
//! - Buffered log lines are flushed before the process exits, on every path.
//! - Log events carry the subcommand name only, never book fields.

use anyhow::{Context, Result};
use bookstore_core::db::{open_db, DEFAULT_DB_FILE};
use bookstore_core::{
    core_version, default_log_level, flush_logging, init_logging, Book, BookId, BookPatch,
    BookService, SqliteBookRepository,
};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about = "Manage a local SQLite book library")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "BOOKSTORE_DB", default_value = DEFAULT_DB_FILE, global = true)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "BOOKSTORE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off when unset.
    #[arg(long, env = "BOOKSTORE_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every book.
    List,
    /// Show one book by id.
    Get { id: BookId },
    /// Show the first book with an exactly matching title.
    Find { title: String },
    /// Add a book and print its id.
    Add {
        title: String,
        author: String,
        year: i64,
    },
    /// Change one or more fields of a book.
    Update {
        id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<i64>,
    },
    /// Delete a book by id.
    Delete { id: BookId },
    /// Replace all rows with the baseline library.
    Seed,
    /// Print the core library version.
    Version,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get { .. } => "get",
            Self::Find { .. } => "find",
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Seed => "seed",
            Self::Version => "version",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.name();
    let stdout = std::io::stdout();
    let result = run(cli, &mut stdout.lock());

    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command}"),
        Err(_) => error!("event=cli_command module=cli status=error command={command}"),
    }
    flush_logging();

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    if let Command::Version = cli.command {
        writeln!(out, "bookstore_core version={}", core_version())?;
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = BookService::new(SqliteBookRepository::try_new(&conn)?);

    match cli.command {
        Command::List => {
            let books = service.list_books()?;
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&books)?)?;
            } else {
                for book in &books {
                    write_book(out, book)?;
                }
            }
        }
        Command::Get { id } => {
            write_lookup(out, service.get_book(id)?, cli.json, &format!("id {id}"))?
        }
        Command::Find { title } => write_lookup(
            out,
            service.find_by_title(&title)?,
            cli.json,
            &format!("title `{title}`"),
        )?,
        Command::Add {
            title,
            author,
            year,
        } => {
            let id = service.add_book(title, author, year)?;
            writeln!(out, "{id}")?;
        }
        Command::Update {
            id,
            title,
            author,
            year,
        } => {
            let changed = service.update_book(
                id,
                &BookPatch {
                    title,
                    author,
                    year,
                },
            )?;
            writeln!(out, "updated {changed}")?;
        }
        Command::Delete { id } => {
            let changed = service.remove_book(id)?;
            writeln!(out, "deleted {changed}")?;
        }
        Command::Seed => {
            let seeded = service.reset_to_seed()?;
            writeln!(out, "seeded {seeded}")?;
        }
        Command::Version => {}
    }

    Ok(())
}

fn write_lookup(out: &mut impl Write, book: Option<Book>, json: bool, key: &str) -> Result<()> {
    match book {
        Some(book) if json => writeln!(out, "{}", serde_json::to_string_pretty(&book)?)?,
        Some(book) => write_book(out, &book)?,
        None if json => writeln!(out, "null")?,
        None => writeln!(out, "no book with {key}")?,
    }
    Ok(())
}

fn write_book(out: &mut impl Write, book: &Book) -> Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}",
        book.id, book.title, book.author, book.year
    )?;
    Ok(())
}
