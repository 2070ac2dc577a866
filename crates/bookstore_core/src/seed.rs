//! Baseline library contents.
//!
//! Rows are inserted in declaration order, so after a purge the first entry
//! receives id 1.

use crate::model::book::NewBook;

/// `(title, author, year)` triples of the baseline library.
pub const SEED_BOOKS: [(&str, &str, i64); 6] = [
    ("Преступление и наказание", "Фёдор Достоевский", 1866),
    ("Война и мир", "Лев Толстой", 1869),
    ("Мастер и Маргарита", "Михаил Булгаков", 1967),
    ("Евгений Онегин", "Александр Пушкин", 1833),
    ("Анна Каренина", "Лев Толстой", 1877),
    ("Братья Карамазовы", "Фёдор Достоевский", 1880),
];

pub fn seed_books() -> Vec<NewBook> {
    SEED_BOOKS
        .iter()
        .map(|&(title, author, year)| NewBook::new(title, author, year))
        .collect()
}
