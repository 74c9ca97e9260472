use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// A tracked book.
///
/// `id`, `title`, `author`, `isbn` and `cover_image_url` never change after
/// creation; only the store mutates `rating` and `comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// 1 to 5 inclusive when present
    pub rating: Option<u8>,
    /// Comment history, oldest first
    pub comments: Vec<String>,
    pub cover_image_url: Option<String>,
}

impl Book {
    /// True once the book carries at least one comment
    pub fn has_notes(&self) -> bool {
        !self.comments.is_empty()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookRepr<'a> {
    id: &'a Uuid,
    title: &'a str,
    author: &'a str,
    isbn: &'a str,
    rating: Option<u8>,
    comments: &'a [String],
    cover_image_url: Option<&'a str>,
    has_notes: bool,
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookRepr {
            id: &self.id,
            title: &self.title,
            author: &self.author,
            isbn: &self.isbn,
            rating: self.rating,
            comments: &self.comments,
            cover_image_url: self.cover_image_url.as_deref(),
            has_notes: self.has_notes(),
        }
        .serialize(serializer)
    }
}

/// Request body for adding a book to the shelf.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Request body for rating a book and appending to its comment history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[serde(default, alias = "id")]
    pub book_id: Option<Uuid>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Direction of the title ordering applied to listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `"desc"` in any case selects descending; anything else ascending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Listing parameters understood by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: None,
            sort: SortOrder::Ascending,
        }
    }
}

/// One page of a listing plus the size of the whole filtered set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub items: Vec<Book>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl BookPage {
    /// Number of pages needed to show every matching book
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_book() -> Book {
        Book {
            id: Uuid::nil(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            isbn: "0441013597".to_string(),
            rating: Some(5),
            comments: vec!["great".to_string()],
            cover_image_url: None,
        }
    }

    #[test]
    fn book_serializes_with_wire_field_names() {
        let value = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "title": "Dune",
                "author": "Herbert",
                "isbn": "0441013597",
                "rating": 5,
                "comments": ["great"],
                "coverImageUrl": null,
                "hasNotes": true
            })
        );
    }

    #[test]
    fn book_without_comments_has_an_empty_history() {
        let mut book = sample_book();
        book.comments.clear();
        book.rating = None;
        let value = serde_json::to_value(book).unwrap();
        assert_eq!(value["comments"], json!([]));
        assert_eq!(value["hasNotes"], false);
        assert_eq!(value["rating"], serde_json::Value::Null);
    }

    #[test]
    fn update_request_accepts_id_alias() {
        let id = Uuid::new_v4();
        let request: UpdateBookRequest =
            serde_json::from_value(json!({"id": id, "rating": 3, "comment": "ok"})).unwrap();
        assert_eq!(request.book_id, Some(id));

        let request: UpdateBookRequest =
            serde_json::from_value(json!({"bookId": id})).unwrap();
        assert_eq!(request.book_id, Some(id));
        assert!(request.rating.is_none());
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let request: CreateBookRequest =
            serde_json::from_value(json!({"rating": 10, "coverImageUrl": "x"})).unwrap();
        assert!(request.title.is_empty());
        assert_eq!(request.rating, Some(10));
        assert_eq!(request.cover_image_url.as_deref(), Some("x"));
    }

    #[test]
    fn sort_order_parsing() {
        assert_eq!(SortOrder::from_param(Some("DESC")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(Some("title")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(None), SortOrder::Ascending);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = BookPage {
            items: Vec::new(),
            total_count: 26,
            page: 1,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
