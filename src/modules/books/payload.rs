//! Best-effort decoding of book request bodies.
//!
//! Only the first JSON value in the body is read; trailing bytes are ignored.
//! Keys match field names case-insensitively, and a later key overwrites an
//! earlier one. A field holding the wrong JSON type keeps its default while
//! every other field is still filled in; the first such problem is reported
//! alongside the partially decoded book.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{json, Value};
use thiserror::Error;

use super::models::{Author, Book};

/// First problem found while decoding a book body.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid book payload: empty body")]
    Empty,

    #[error("invalid book payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid book payload: field '{field}' must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },
}

impl PayloadError {
    /// Structured details for an error response body.
    pub fn details(&self) -> Vec<Value> {
        match self {
            PayloadError::Empty => Vec::new(),
            PayloadError::Json(err) => vec![json!({"line": err.line(), "column": err.column()})],
            PayloadError::FieldType { field, expected } => {
                vec![json!({"field": field, "expected": expected})]
            }
        }
    }
}

/// Every readable field of a body, plus the first problem encountered.
#[derive(Debug)]
pub struct DecodedBook {
    pub book: Book,
    pub error: Option<PayloadError>,
}

/// Decode the first JSON value of `body` into a book, field by field.
///
/// Malformed JSON and non-object values yield an empty book.
pub fn decode(body: &[u8]) -> DecodedBook {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<LenientBook>()
        .next();

    match first {
        Some(Ok(LenientBook { book, error })) => DecodedBook { book, error },
        Some(Err(err)) => DecodedBook {
            book: Book::default(),
            error: Some(err.into()),
        },
        None => DecodedBook {
            book: Book::default(),
            error: Some(PayloadError::Empty),
        },
    }
}

struct LenientBook {
    book: Book,
    error: Option<PayloadError>,
}

impl<'de> Deserialize<'de> for LenientBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BookVisitor)
    }
}

struct BookVisitor;

impl<'de> Visitor<'de> for BookVisitor {
    type Value = LenientBook;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a book object")
    }

    // A bare `null` leaves the book untouched.
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LenientBook {
            book: Book::default(),
            error: None,
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut book = Book::default();
        let mut error = None;

        while let Some(key) = map.next_key::<String>()? {
            let value: Value = map.next_value()?;
            if key.eq_ignore_ascii_case("id") {
                assign_string(&mut book.id, value, "id", &mut error);
            } else if key.eq_ignore_ascii_case("isbn") {
                assign_string(&mut book.isbn, value, "isbn", &mut error);
            } else if key.eq_ignore_ascii_case("title") {
                assign_string(&mut book.title, value, "title", &mut error);
            } else if key.eq_ignore_ascii_case("author") {
                assign_author(&mut book.author, value, &mut error);
            }
        }

        Ok(LenientBook { book, error })
    }
}

fn record(error: &mut Option<PayloadError>, field: &'static str, expected: &'static str) {
    error.get_or_insert(PayloadError::FieldType { field, expected });
}

fn assign_string(
    target: &mut String,
    value: Value,
    field: &'static str,
    error: &mut Option<PayloadError>,
) {
    match value {
        Value::String(text) => *target = text,
        Value::Null => {}
        _ => record(error, field, "a string"),
    }
}

// An existing author is updated in place, so repeated `author` keys merge.
fn assign_author(target: &mut Option<Author>, value: Value, error: &mut Option<PayloadError>) {
    match value {
        Value::Null => *target = None,
        Value::Object(fields) => {
            let author = target.get_or_insert_with(Author::default);
            for (key, value) in fields {
                if key.eq_ignore_ascii_case("firstname") {
                    assign_string(&mut author.firstname, value, "author.firstname", error);
                } else if key.eq_ignore_ascii_case("lastname") {
                    assign_string(&mut author.lastname, value, "author.lastname", error);
                }
            }
        }
        _ => record(error, "author", "an object"),
    }
}
