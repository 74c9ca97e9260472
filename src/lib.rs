//! Bookshelf application library
//!
//! Project modules plus the bootstrap shared by the server binary and the CLI.

pub mod bootstrap;
pub mod modules;

pub use modules::books::{
    error::BookError,
    models::{Book, BookPage, CreateBookRequest, UpdateBookRequest},
    service::BookService,
    store::{BookStore, InMemoryBookStore, MAX_BOOKS},
};
