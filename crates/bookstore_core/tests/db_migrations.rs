use bookstore_core::db::migrations::latest_version;
use bookstore_core::db::{open_db, open_db_in_memory, DbError};
use bookstore_core::{seed_books, BookRepository, NewBook, RepoError, SqliteBookRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_books_table() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "books");
    assert!(SqliteBookRepository::try_new(&conn).is_ok());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("library.db");

    let first = open_db(&path).expect("first open should succeed");
    first
        .execute(
            "INSERT INTO books (title, author, year) VALUES ('Идиот', 'Фёдор Достоевский', 1869);",
            [],
        )
        .expect("raw insert should succeed");
    drop(first);

    let second = open_db(&path).expect("second open should succeed");
    assert_eq!(schema_version(&second), latest_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
        .expect("rows should be countable");
    assert_eq!(count, 1);
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("nested").join("library.db");

    open_db(&path).expect("open should create parent directories");
    assert!(path.exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("raw connection should open");
    conn.execute_batch("PRAGMA user_version = 999;")
        .expect("user_version should be writable");
    drop(conn);

    match open_db(&path).expect_err("newer schema must be rejected") {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_unwritable_location_is_store_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("blocker file should be written");

    let err = open_db(blocker.join("library.db")).expect_err("file parent must fail to open");
    assert!(matches!(err, DbError::Io(_) | DbError::Sqlite(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().expect("in-memory connection should open");

    match SqliteBookRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().expect("in-memory connection should open");
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .expect("user_version should be writable");

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("books"))
    ));
}

#[test]
fn repository_rejects_books_table_missing_year() {
    let conn = Connection::open_in_memory().expect("in-memory connection should open");
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL
        );",
    )
    .expect("legacy table should be created");
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .expect("user_version should be writable");

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "year"
        })
    ));
}

#[test]
fn legacy_table_without_autoincrement_is_usable() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).expect("raw connection should open");
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year INTEGER NOT NULL
        );",
    )
    .expect("legacy table should be created");
    drop(conn);

    let conn = open_db(&path).expect("legacy file should open");
    let repo = SqliteBookRepository::try_new(&conn).expect("legacy table should be accepted");
    repo.reset(&seed_books())
        .expect("reset should succeed without sqlite_sequence");

    let last = repo
        .insert(&NewBook::new("Чайка", "Антон Чехов", 1896))
        .expect("insert should succeed");
    repo.delete(last).expect("delete should succeed");
    let next = repo
        .insert(&NewBook::new("Чайка", "Антон Чехов", 1896))
        .expect("insert should succeed");
    // Plain rowid tables hand out max(id) + 1, so the deleted id comes back.
    assert_eq!(next, last);

    repo.reset(&seed_books()).expect("second reset should succeed");
    assert_eq!(repo.count().expect("count should succeed"), 6);
    assert!(repo
        .fetch_by_id(1)
        .expect("fetch_by_id should succeed")
        .is_some());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version should be readable")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("sqlite_master should be queryable");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
