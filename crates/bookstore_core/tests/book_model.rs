use bookstore_core::{Book, NewBook};
use serde_json::json;

#[test]
fn book_serializes_with_flat_field_names() {
    let book = Book {
        id: 3,
        title: "Мастер и Маргарита".to_string(),
        author: "Михаил Булгаков".to_string(),
        year: 1967,
    };

    let value = serde_json::to_value(&book).expect("book should serialize");
    assert_eq!(
        value,
        json!({
            "id": 3,
            "title": "Мастер и Маргарита",
            "author": "Михаил Булгаков",
            "year": 1967
        })
    );
}

#[test]
fn new_book_deserializes_from_json() {
    let book: NewBook = serde_json::from_value(json!({
        "title": "Евгений Онегин",
        "author": "Александр Пушкин",
        "year": 1833
    }))
    .expect("complete json should deserialize");

    assert_eq!(book, NewBook::new("Евгений Онегин", "Александр Пушкин", 1833));
}

#[test]
fn new_book_without_author_fails_to_deserialize() {
    let result = serde_json::from_value::<NewBook>(json!({
        "title": "Евгений Онегин",
        "year": 1833
    }));
    assert!(result.is_err());
}
