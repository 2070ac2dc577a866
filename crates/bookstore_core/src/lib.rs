//! Core storage logic for the book store.
//! This crate owns the `books` schema and every SQL statement issued against it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, BookPatch, BookValidationError, NewBook};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use seed::{seed_books, SEED_BOOKS};
pub use service::book_service::BookService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
