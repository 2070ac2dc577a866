//! Book use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::repo::book_repo::{BookRepository, RepoResult};
use crate::seed::seed_books;
use log::info;

/// Use-case service wrapper for book CRUD operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.repo.fetch_all()
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.fetch_by_id(id)
    }

    pub fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        self.repo.fetch_by_title(title)
    }

    /// Creates a book and returns its store-assigned id.
    pub fn add_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i64,
    ) -> RepoResult<BookId> {
        self.repo.insert(&NewBook::new(title, author, year))
    }

    /// Replaces only the author; `0` means no row matched `id`.
    pub fn update_author(&self, id: BookId, author: impl Into<String>) -> RepoResult<usize> {
        self.repo.update(id, &BookPatch::author(author))
    }

    pub fn update_book(&self, id: BookId, patch: &BookPatch) -> RepoResult<usize> {
        self.repo.update(id, patch)
    }

    pub fn remove_book(&self, id: BookId) -> RepoResult<usize> {
        self.repo.delete(id)
    }

    /// Restores the six-book baseline, discarding every existing row.
    pub fn reset_to_seed(&self) -> RepoResult<usize> {
        let seed = seed_books();
        self.repo.reset(&seed)?;
        info!(
            "event=library_reset module=service status=ok books={}",
            seed.len()
        );
        Ok(seed.len())
    }
}
