//! Sample catalogue for demo and local environments.

use uuid::Uuid;

use super::models::Book;
use super::store::BookStore;

const SAMPLES: &[(&str, &str, &str, u8, &str, &str)] = &[
    (
        "The Hitchhiker's Guide to the Galaxy",
        "Douglas Adams",
        "978-0345391803",
        5,
        "A classic of science fiction comedy.",
        "https://example.com/hitchhikers.jpg",
    ),
    (
        "Pride and Prejudice",
        "Jane Austen",
        "978-0141439518",
        4,
        "A timeless romance.",
        "https://example.com/pride.jpg",
    ),
    (
        "To Kill a Mockingbird",
        "Harper Lee",
        "978-0061120084",
        5,
        "A powerful and moving story.",
        "https://example.com/mockingbird.jpg",
    ),
    (
        "1984",
        "George Orwell",
        "978-0451524935",
        5,
        "A chilling dystopian novel.",
        "https://example.com/1984.jpg",
    ),
    (
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "978-0743273565",
        4,
        "A portrait of the Jazz Age.",
        "https://example.com/gatsby.jpg",
    ),
    (
        "Moby Dick",
        "Herman Melville",
        "978-1503280786",
        4,
        "A grand tale of obsession.",
        "https://example.com/mobydick.jpg",
    ),
    (
        "War and Peace",
        "Leo Tolstoy",
        "978-0140447934",
        5,
        "An epic in every sense.",
        "https://example.com/warandpeace.jpg",
    ),
    (
        "The Catcher in the Rye",
        "J.D. Salinger",
        "978-0316769488",
        3,
        "A classic of teenage angst.",
        "https://example.com/catcher.jpg",
    ),
    (
        "The Lord of the Rings",
        "J.R.R. Tolkien",
        "978-0618640157",
        5,
        "The definitive fantasy epic.",
        "https://example.com/lotr.jpg",
    ),
    (
        "Brave New World",
        "Aldous Huxley",
        "978-0060850524",
        4,
        "A thought-provoking look at a future society.",
        "https://example.com/bravenewworld.jpg",
    ),
];

/// The sample books, each with a fresh id
pub fn sample_books() -> Vec<Book> {
    SAMPLES
        .iter()
        .map(|&(title, author, isbn, rating, comment, cover)| Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            rating: Some(rating),
            comments: vec![comment.to_string()],
            cover_image_url: Some(cover.to_string()),
        })
        .collect()
}

/// Load the sample books, stopping at the first rejected insert.
///
/// Returns how many were stored.
pub async fn seed(store: &dyn BookStore) -> usize {
    let mut seeded = 0;
    for book in sample_books() {
        let title = book.title.clone();
        if let Err(err) = store.add(book).await {
            tracing::warn!(%title, error = %err, "stopped seeding sample books");
            break;
        }
        seeded += 1;
    }

    tracing::info!(seeded, "sample books loaded");
    seeded
}
