use bookshelf_http::AppError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use super::store::MAX_BOOKS;
use super::validation::FieldError;

/// Caller-facing failures of the book service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("request failed validation ({} field errors)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("You already have {} books. Delete one before adding another.", MAX_BOOKS)]
    BookLimitExceeded,

    #[error("Book with id {0} was not found.")]
    NotFound(Uuid),

    #[error("Book with id {0} already exists.")]
    Duplicate(Uuid),
}

pub type BookResult<T> = Result<T, BookError>;

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        let message = err.to_string();
        match err {
            BookError::ValidationFailed(errors) => AppError::validation(
                errors
                    .iter()
                    .map(|e| json!({"field": e.field, "message": e.message}))
                    .collect(),
                "One or more validation errors occurred.",
            ),
            BookError::BookLimitExceeded => {
                AppError::conflict(vec![json!({"limit": MAX_BOOKS})], message)
            }
            BookError::Duplicate(id) => AppError::conflict(vec![json!({"id": id})], message),
            BookError::NotFound(_) => AppError::not_found(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn limit_message_is_human_readable() {
        assert_eq!(
            BookError::BookLimitExceeded.to_string(),
            "You already have 25 books. Delete one before adding another."
        );
    }

    #[test]
    fn maps_onto_http_statuses() {
        let validation = AppError::from(BookError::ValidationFailed(vec![FieldError {
            field: "title",
            message: "Title is required.",
        }]));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        match validation {
            AppError::Validation { details, .. } => {
                assert_eq!(details[0]["field"], "title");
                assert_eq!(details[0]["message"], "Title is required.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        assert_eq!(
            AppError::from(BookError::BookLimitExceeded).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(BookError::NotFound(Uuid::new_v4())).status(),
            StatusCode::NOT_FOUND
        );
    }
}
