pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::{json, Value};

use service::BookService;
use store::BookStore;

/// Personal book shelf: ratings and comment history for up to 25 books
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            service: BookService::new(store),
        }
    }

    pub fn service(&self) -> &BookService {
        &self.service
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.books.seed_sample_data {
            seed::seed(self.service.store().as_ref()).await;
        }

        let books = self.service.store().count().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string", "format": "uuid" }
    })
}

fn query_parameter(name: &str, schema: Value) -> Value {
    json!({ "name": name, "in": "query", "required": false, "schema": schema })
}

fn openapi_fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        query_parameter("search", json!({ "type": "string" })),
                        query_parameter("sortBy", json!({ "type": "string", "enum": ["asc", "desc"], "default": "asc" })),
                        query_parameter("page", json!({ "type": "integer", "minimum": 1, "default": 1 })),
                        query_parameter("pageSize", json!({ "type": "integer", "minimum": 0, "default": 10 }))
                    ],
                    "responses": {
                        "200": {
                            "description": "One page of books; X-Total-Count carries the filtered total",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/create": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": json_body("CreateBookRequest"),
                    "responses": {
                        "200": book_response("The stored book"),
                        "400": error_response("Validation failed"),
                        "409": error_response("The shelf already holds 25 books")
                    }
                }
            },
            "/update": {
                "put": {
                    "summary": "Rate a book and append a comment",
                    "tags": ["Books"],
                    "requestBody": json_body("UpdateBookRequest"),
                    "responses": {
                        "200": book_response("The updated book"),
                        "400": error_response("Validation failed"),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Fetch a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("Book not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "isbn": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5, "nullable": true },
                        "comments": { "type": "array", "items": { "type": "string" } },
                        "coverImageUrl": { "type": "string", "nullable": true },
                        "hasNotes": { "type": "boolean" }
                    },
                    "required": ["id", "title", "author", "isbn", "hasNotes"]
                },
                "CreateBookRequest": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "maxLength": 100 },
                        "author": { "type": "string", "maxLength": 60 },
                        "isbn": { "type": "string", "minLength": 10, "maxLength": 13 },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": "string", "maxLength": 300 },
                        "coverImageUrl": { "type": "string" }
                    },
                    "required": ["title", "author", "isbn"]
                },
                "UpdateBookRequest": {
                    "type": "object",
                    "properties": {
                        "bookId": { "type": "string", "format": "uuid" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": "string", "maxLength": 300 }
                    },
                    "required": ["bookId"]
                }
            }
        }
    })
}

/// Create the books module over an explicitly owned store
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::Settings;
    use super::store::InMemoryBookStore;

    #[tokio::test]
    async fn init_seeds_only_when_enabled() {
        let module = BooksModule::new(Arc::new(InMemoryBookStore::new()));
        let mut settings = Settings::default();

        module.init(&InitCtx { settings: &settings }).await.unwrap();
        assert_eq!(module.service().store().count().await, 0);

        settings.books.seed_sample_data = true;
        module.init(&InitCtx { settings: &settings }).await.unwrap();
        assert_eq!(module.service().store().count().await, 10);
    }

    #[tokio::test]
    async fn lifecycle_runs_on_a_spawned_task() {
        let module = create_module(Arc::new(InMemoryBookStore::new()));
        let mut settings = Settings::default();
        settings.books.seed_sample_data = true;

        let handle = tokio::spawn(async move {
            let ctx = InitCtx { settings: &settings };
            module.init(&ctx).await?;
            module.start(&ctx).await?;
            module.stop().await
        });
        handle.await.unwrap().unwrap();
    }

    #[test]
    fn openapi_describes_every_route() {
        let spec = openapi_fragment();
        for path in ["/", "/create", "/update", "/{id}", "/health"] {
            assert!(spec["paths"][path].is_object(), "missing {path}");
        }
        assert!(spec["paths"]["/{id}"]["delete"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
