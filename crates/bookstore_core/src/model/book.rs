//! Book domain model.
//!
//! # Responsibility
//! - Define the single persisted entity and its write-side inputs.
//! - Validate required text fields before they reach SQL.
//!
//! # Invariants
//! - `id` is assigned by the store and never chosen by callers.
//! - `title` and `author` are non-blank; `year` is not range-checked.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type BookId = i64;

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Publication year.
    pub year: i64,
}

/// Insert input; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
}

/// Validation failure for book text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title must not be empty"),
            Self::EmptyAuthor => write!(f, "book author must not be empty"),
        }
    }
}

impl Error for BookValidationError {}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Checks required text fields.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        validate_title(&self.title)?;
        validate_author(&self.author)
    }
}

impl BookPatch {
    /// Patch that only replaces the author.
    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none()
    }

    /// Checks text fields that are present in the patch.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(author) = self.author.as_deref() {
            validate_author(author)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), BookValidationError> {
    if title.trim().is_empty() {
        return Err(BookValidationError::EmptyTitle);
    }
    Ok(())
}

fn validate_author(author: &str) -> Result<(), BookValidationError> {
    if author.trim().is_empty() {
        return Err(BookValidationError::EmptyAuthor);
    }
    Ok(())
}
