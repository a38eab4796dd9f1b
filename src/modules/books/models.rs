use serde::{Deserialize, Serialize};

/// A book record held by the registry.
///
/// Missing fields decode to their defaults and unknown fields are ignored,
/// so any JSON object is a valid (possibly empty) book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Caller-opaque identifier assigned by the service
    pub id: String,
    /// ISBN as supplied by the caller, not validated
    pub isbn: String,
    /// Title of the book
    pub title: String,
    /// Author of the book; serialized as `null` when absent
    pub author: Option<Author>,
}

/// Author owned by exactly one [`Book`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub firstname: String,
    pub lastname: String,
}

impl Book {
    pub fn new(
        id: impl Into<String>,
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: Author,
    ) -> Self {
        Self {
            id: id.into(),
            isbn: isbn.into(),
            title: title.into(),
            author: Some(author),
        }
    }
}

impl Author {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}

/// Records present before any request is served.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new("1", "448743", "Book One", Author::new("John", "Doe")),
        Book::new("2", "847564", "Book Two", Author::new("Steve", "Smith")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_book_serializes_with_null_author() {
        let value = serde_json::to_value(Book::default()).unwrap();
        assert_eq!(
            value,
            json!({"id": "", "isbn": "", "title": "", "author": null})
        );
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let book: Book =
            serde_json::from_str(r#"{"title":"Dune","author":{"lastname":"Herbert"},"pages":412}"#)
                .unwrap();
        assert_eq!(book.id, "");
        assert_eq!(book.isbn, "");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, Some(Author::new("", "Herbert")));
    }

    #[test]
    fn seed_records_match_wire_shape() {
        let value = serde_json::to_value(seed_books()).unwrap();
        assert_eq!(
            value[0],
            json!({
                "id": "1",
                "isbn": "448743",
                "title": "Book One",
                "author": {"firstname": "John", "lastname": "Doe"}
            })
        );
        assert_eq!(value[1]["author"]["lastname"], "Smith");
    }
}
