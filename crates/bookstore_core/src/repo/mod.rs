//! Repository layer contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the data-access contract for book records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Absent rows are `Ok(None)` / zero affected rows, never `Err`.

pub mod book_repo;
