//! In-memory, insertion-ordered book registry.
//!
//! Every operation takes the registry lock for its whole scan-and-mutate
//! pass, so concurrent requests observe each operation atomically. Identifiers
//! are still drawn at random and may repeat unless [`IdStrategy::UniqueRandom`]
//! is configured.

use std::sync::Arc;

use bookshelf_kernel::settings::IdStrategy;
use rand::Rng;
use tokio::sync::RwLock;

use super::models::Book;

/// Exclusive upper bound for generated identifiers.
pub const ID_UPPER_BOUND: u32 = 10_000_000;

/// Result of [`BookRegistry::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The matching record was replaced and moved to the end.
    Updated(Book),
    /// Nothing matched; carries the unchanged registry contents.
    Missing(Vec<Book>),
}

/// Result of [`BookRegistry::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: Option<Book>,
    pub remaining: Vec<Book>,
}

/// Shared handle to the registry. Clones refer to the same records.
#[derive(Debug, Clone)]
pub struct BookRegistry {
    books: Arc<RwLock<Vec<Book>>>,
    id_strategy: IdStrategy,
}

impl BookRegistry {
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self::with_books(Vec::new(), id_strategy)
    }

    pub fn with_books(books: Vec<Book>, id_strategy: IdStrategy) -> Self {
        Self {
            books: Arc::new(RwLock::new(books)),
            id_strategy,
        }
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    /// First record whose id equals `id`.
    pub async fn get(&self, id: &str) -> Option<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
    }

    /// Assign a fresh id to `book`, append it, and return the stored record.
    pub async fn create(&self, mut book: Book) -> Book {
        let mut books = self.books.write().await;
        book.id = next_id(self.id_strategy, &books);
        books.push(book.clone());
        tracing::debug!(id = %book.id, total = books.len(), "book created");
        book
    }

    /// Replace the first record matching `id` with `book`.
    ///
    /// The replacement keeps the path id, ignoring whatever `book.id` held, and
    /// is appended to the end rather than taking the old position.
    pub async fn update(&self, id: &str, mut book: Book) -> UpdateOutcome {
        let mut books = self.books.write().await;
        let Some(index) = books.iter().position(|existing| existing.id == id) else {
            tracing::debug!(id, "update skipped, no matching book");
            return UpdateOutcome::Missing(books.clone());
        };

        books.remove(index);
        book.id = id.to_string();
        books.push(book.clone());
        tracing::debug!(id, from_position = index, "book updated");
        UpdateOutcome::Updated(book)
    }

    /// Remove the first record matching `id`, if any.
    pub async fn delete(&self, id: &str) -> DeleteOutcome {
        let mut books = self.books.write().await;
        let removed = books
            .iter()
            .position(|book| book.id == id)
            .map(|index| books.remove(index));

        if removed.is_some() {
            tracing::debug!(id, total = books.len(), "book deleted");
        } else {
            tracing::debug!(id, "delete skipped, no matching book");
        }

        DeleteOutcome {
            removed,
            remaining: books.clone(),
        }
    }
}

fn next_id(strategy: IdStrategy, books: &[Book]) -> String {
    let mut rng = rand::thread_rng();
    next_id_with(strategy, books, || rng.gen_range(0..ID_UPPER_BOUND))
}

fn next_id_with(strategy: IdStrategy, books: &[Book], mut draw: impl FnMut() -> u32) -> String {
    loop {
        let id = draw().to_string();
        match strategy {
            IdStrategy::Random => return id,
            IdStrategy::UniqueRandom if !books.iter().any(|book| book.id == id) => return id,
            IdStrategy::UniqueRandom => {
                tracing::debug!(%id, "generated id already taken, redrawing");
            }
        }
    }
}
