//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `books` table, one statement per operation.
//! - Commit every mutation explicitly before returning.
//!
//! # Invariants
//! - All values are bound positionally; SQL text never embeds user data.
//! - `purge` resets the id sequence so the next insert gets id 1.
//! - Read paths reject blank persisted text instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::book::{Book, BookId, BookPatch, BookValidationError, NewBook};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT id, title, author, year FROM books";
const REQUIRED_COLUMNS: [&str; 4] = ["id", "title", "author", "year"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching SQL.
    Validation(BookValidationError),
    /// SQLite rejected the row (NOT NULL and similar).
    ConstraintViolation(String),
    /// Any other SQLite/bootstrap failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "book repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "book repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "book repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ConstraintViolation(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::ConstraintViolation(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// All rows ordered by id.
    fn fetch_all(&self) -> RepoResult<Vec<Book>>;
    fn fetch_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lowest-id row with an exactly matching title.
    fn fetch_by_title(&self, title: &str) -> RepoResult<Option<Book>>;
    fn count(&self) -> RepoResult<u64>;
    fn insert(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Returns affected rows; `0` when `id` does not exist.
    fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<usize>;
    /// Returns affected rows; `0` when `id` does not exist.
    ///
    /// Ids stay monotonic after a delete only for tables created by this
    /// store (`AUTOINCREMENT`). A pre-existing table without it may hand the
    /// deleted maximum id to the next insert.
    fn delete(&self, id: BookId) -> RepoResult<usize>;
    /// Removes every row and resets the id sequence.
    fn purge(&self) -> RepoResult<usize>;
    fn seed(&self, books: &[NewBook]) -> RepoResult<usize>;
    /// Purge followed by seed, committed as one unit.
    fn reset(&self, books: &[NewBook]) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// A compatible `books` table that predates the store is accepted as-is,
    /// including one declared without `AUTOINCREMENT`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_books_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn fetch_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn fetch_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL} WHERE title = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn insert(&self, book: &NewBook) -> RepoResult<BookId> {
        book.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3);",
            params![book.title.as_str(), book.author.as_str(), book.year],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("event=book_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<usize> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(0);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(author) = patch.author.as_ref() {
            assignments.push("author = ?");
            bind_values.push(Value::Text(author.clone()));
        }
        if let Some(year) = patch.year {
            assignments.push("year = ?");
            bind_values.push(Value::Integer(year));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!("UPDATE books SET {} WHERE id = ?;", assignments.join(", "));
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        tx.commit()?;

        debug!("event=book_update module=repo status=ok id={id} changed={changed}");
        Ok(changed)
    }

    fn delete(&self, id: BookId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        tx.commit()?;

        debug!("event=book_delete module=repo status=ok id={id} changed={changed}");
        Ok(changed)
    }

    fn purge(&self) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = purge_rows(&tx)?;
        tx.commit()?;
        Ok(removed)
    }

    fn seed(&self, books: &[NewBook]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let inserted = insert_rows(&tx, books)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn reset(&self, books: &[NewBook]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = purge_rows(&tx)?;
        let inserted = insert_rows(&tx, books)?;
        tx.commit()?;

        debug!("event=book_reset module=repo status=ok removed={removed} inserted={inserted}");
        Ok(())
    }
}

fn purge_rows(conn: &Connection) -> RepoResult<usize> {
    let removed = conn.execute("DELETE FROM books;", [])?;
    // Tables created without AUTOINCREMENT have no sequence row to reset.
    if table_exists(conn, "sqlite_sequence")? {
        conn.execute("DELETE FROM sqlite_sequence WHERE name = 'books';", [])?;
    }
    Ok(removed)
}

fn insert_rows(conn: &Connection, books: &[NewBook]) -> RepoResult<usize> {
    let mut stmt = conn.prepare("INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3);")?;
    for book in books {
        book.validate()?;
        stmt.execute(params![book.title.as_str(), book.author.as_str(), book.year])?;
    }
    Ok(books.len())
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        year: row.get("year")?,
    };
    if book.title.trim().is_empty() || book.author.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank title or author in books row {}",
            book.id
        )));
    }
    Ok(book)
}

fn ensure_books_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "books")? {
        return Err(RepoError::MissingRequiredTable("books"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "books", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::RepoError;
    use rusqlite::Connection;

    #[test]
    fn not_null_failure_maps_to_constraint_violation() {
        let conn = Connection::open_in_memory().expect("in-memory connection should open");
        conn.execute_batch("CREATE TABLE t (v TEXT NOT NULL);")
            .expect("table should be created");
        let err = conn
            .execute("INSERT INTO t (v) VALUES (NULL);", [])
            .expect_err("NULL must violate NOT NULL");
        assert!(matches!(
            RepoError::from(err),
            RepoError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn other_sqlite_failures_map_to_db() {
        let conn = Connection::open_in_memory().expect("in-memory connection should open");
        let err = conn
            .execute("SELECT * FROM missing;", [])
            .expect_err("missing table should fail");
        assert!(matches!(RepoError::from(err), RepoError::Db(_)));
    }
}
