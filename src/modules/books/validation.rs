//! Field rules gating every mutation.
//!
//! Each field stops at its first failing rule, but every field is checked, so
//! a request can come back with several errors at once.

use serde::Serialize;

use super::models::{CreateBookRequest, UpdateBookRequest};

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 60;
pub const ISBN_MIN_CHARS: usize = 10;
pub const ISBN_MAX_CHARS: usize = 13;
pub const COMMENT_MAX_CHARS: usize = 300;
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

const BANNED_WORD: &str = "horrible";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Implemented by request types that can be checked before touching the store
pub trait Validate {
    /// Every field error in field order; empty means valid
    fn validate(&self) -> Vec<FieldError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_title(title: &str) -> Option<FieldError> {
    if is_blank(title) {
        Some(FieldError::new("title", "Title is required."))
    } else if char_len(title) > TITLE_MAX_CHARS {
        Some(FieldError::new(
            "title",
            "Title must be at most 100 characters.",
        ))
    } else {
        None
    }
}

fn check_author(author: &str) -> Option<FieldError> {
    if is_blank(author) {
        Some(FieldError::new("author", "Author is required."))
    } else if char_len(author) > AUTHOR_MAX_CHARS {
        Some(FieldError::new(
            "author",
            "Author must be at most 60 characters.",
        ))
    } else {
        None
    }
}

fn check_isbn(isbn: &str) -> Option<FieldError> {
    let len = char_len(isbn);
    if is_blank(isbn) {
        Some(FieldError::new("isbn", "ISBN is required."))
    } else if len < ISBN_MIN_CHARS {
        Some(FieldError::new("isbn", "ISBN must be at least 10 characters."))
    } else if len > ISBN_MAX_CHARS {
        Some(FieldError::new("isbn", "ISBN must be at most 13 characters."))
    } else {
        None
    }
}

fn check_rating(rating: Option<i32>) -> Option<FieldError> {
    match rating {
        Some(value) if !RATING_RANGE.contains(&value) => Some(FieldError::new(
            "rating",
            "Rating must be between 1 and 5.",
        )),
        _ => None,
    }
}

/// A rating must travel with a non-empty comment; a comment on its own is
/// always allowed.
fn check_comment(comment: Option<&str>, rating: Option<i32>) -> Option<FieldError> {
    match comment {
        None if rating.is_some() => Some(FieldError::new(
            "comment",
            "Comment is required if rating is supplied.",
        )),
        None => None,
        Some(text) if rating.is_some() && is_blank(text) => Some(FieldError::new(
            "comment",
            "Comment is required if rating is supplied.",
        )),
        Some(text) if char_len(text) > COMMENT_MAX_CHARS => Some(FieldError::new(
            "comment",
            "Comment must be at most 300 characters.",
        )),
        Some(text) if text.to_lowercase().contains(BANNED_WORD) => Some(FieldError::new(
            "comment",
            "Comment must not contain the word 'horrible'.",
        )),
        Some(_) => None,
    }
}

impl Validate for CreateBookRequest {
    fn validate(&self) -> Vec<FieldError> {
        [
            check_title(&self.title),
            check_author(&self.author),
            check_isbn(&self.isbn),
            check_rating(self.rating),
            check_comment(self.comment.as_deref(), self.rating),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Validate for UpdateBookRequest {
    fn validate(&self) -> Vec<FieldError> {
        let book_id = match self.book_id {
            Some(id) if !id.is_nil() => None,
            _ => Some(FieldError::new("bookId", "BookId is required.")),
        };

        [
            book_id,
            check_rating(self.rating),
            check_comment(self.comment.as_deref(), self.rating),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
