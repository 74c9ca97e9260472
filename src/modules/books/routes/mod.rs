//! HTTP handlers for the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use bookshelf_http::AppError;

use super::models::{Book, CreateBookRequest, UpdateBookRequest};
use super::service::BookService;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
const PAGE_HEADER: &str = "x-page";
const PAGE_SIZE_HEADER: &str = "x-page-size";

/// Query string accepted by the listing endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default = "ListBooksParams::default_page")]
    pub page: usize,
    #[serde(default = "ListBooksParams::default_page_size")]
    pub page_size: usize,
}

impl ListBooksParams {
    fn default_page() -> usize {
        1
    }

    fn default_page_size() -> usize {
        10
    }
}

/// Router for the books module, mounted under `{api_prefix}/books`
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/create", post(create_book))
        .route("/update", put(update_book))
        .route("/{id}", get(get_book).delete(delete_book))
        .route("/health", get(health_check))
        .with_state(service)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(service): State<BookService>,
    params: Result<Query<ListBooksParams>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<Book>>), AppError> {
    let Query(params) = params?;
    let page = service
        .list(
            params.search.as_deref(),
            params.sort_by.as_deref(),
            params.page,
            params.page_size,
        )
        .await;

    let mut headers = HeaderMap::new();
    for (name, value) in [
        (TOTAL_COUNT_HEADER, page.total_count),
        (PAGE_HEADER, page.page),
        (PAGE_SIZE_HEADER, page.page_size),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }

    Ok((headers, Json(page.items)))
}

async fn create_book(
    State(service): State<BookService>,
    request: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(request) = request?;
    let book = service.create(request).await?;
    Ok(Json(book))
}

async fn update_book(
    State(service): State<BookService>,
    request: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(request) = request?;
    let book = service.update(request).await?;
    Ok(Json(book))
}

async fn get_book(
    State(service): State<BookService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    service
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Book with id {id} was not found.")))
}

async fn delete_book(
    State(service): State<BookService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
