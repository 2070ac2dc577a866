#![allow(dead_code)]

use bookstore_core::db::open_db;
use bookstore_core::{BookRepository, SqliteBookRepository, SEED_BOOKS};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DB_FILE_NAME: &str = "test_library.db";

/// Scenario fixture: a file-backed library reset to the seed set.
///
/// Dropping the fixture closes the connection and removes the directory,
/// including when the test body panics.
pub struct LibraryFixture {
    // Field order matters: the connection must close before the directory goes away.
    pub conn: Connection,
    dir: TempDir,
}

impl LibraryFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let conn = open_seeded(&dir.path().join(DB_FILE_NAME));
        Self { conn, dir }
    }

    pub fn repo(&self) -> SqliteBookRepository<'_> {
        SqliteBookRepository::try_new(&self.conn).expect("fixture connection should be migrated")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join(DB_FILE_NAME)
    }
}

/// Opens `path`, purges the table and inserts the seed books.
pub fn open_seeded(path: &Path) -> Connection {
    let conn = open_db(path).expect("library db should open");
    SqliteBookRepository::try_new(&conn)
        .expect("opened connection should be migrated")
        .reset(&bookstore_core::seed_books())
        .expect("reset to seed should succeed");
    conn
}

pub fn seed_len() -> usize {
    SEED_BOOKS.len()
}
