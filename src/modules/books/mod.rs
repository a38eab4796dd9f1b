pub mod models;
pub mod payload;
pub mod registry;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::BooksSettings, InitCtx, Module};

use registry::BookRegistry;
use routes::BooksState;

/// Books module: an in-memory registry of book records served over JSON
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(settings: &BooksSettings) -> Self {
        let books = if settings.seed {
            models::seed_books()
        } else {
            Vec::new()
        };

        Self {
            state: BooksState {
                registry: BookRegistry::with_books(books, settings.id_strategy),
                strict_errors: settings.strict_errors,
            },
        }
    }

    /// Handle to the registry backing this module's routes
    pub fn registry(&self) -> &BookRegistry {
        &self.state.registry
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let seeded = self.state.registry.len().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            seeded,
            strict_errors = self.state.strict_errors,
            id_strategy = ?ctx.settings.books.id_strategy,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.state.registry.len().await;
        tracing::info!(
            module = self.name(),
            discarded,
            "books module stopped"
        );
        Ok(())
    }
}

fn id_parameter() -> serde_json::Value {
    serde_json::json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "application/json": { "schema": schema } })
}

fn openapi_fragment() -> serde_json::Value {
    let book = serde_json::json!({ "$ref": "#/components/schemas/Book" });
    let books = serde_json::json!({ "type": "array", "items": book });
    let error = serde_json::json!({ "$ref": "#/components/schemas/ErrorResponse" });

    serde_json::json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": { "description": "All books in insertion order", "content": json_content(books.clone()) }
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "description": "The id in the body is ignored; a random numeric id is assigned.",
                    "tags": ["Books"],
                    "requestBody": { "content": json_content(book.clone()) },
                    "responses": {
                        "200": { "description": "Created book", "content": json_content(book.clone()) },
                        "400": { "description": "Malformed body (strict mode)", "content": json_content(error.clone()) }
                    }
                }
            },
            "/book/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": { "description": "Matching book, or an empty book when none matches", "content": json_content(book.clone()) },
                        "404": { "description": "No matching book (strict mode)", "content": json_content(error.clone()) }
                    }
                }
            },
            "/books/{id}": {
                "put": {
                    "summary": "Replace a book",
                    "description": "The replacement keeps the path id and moves to the end of the listing.",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": { "content": json_content(book.clone()) },
                    "responses": {
                        "200": {
                            "description": "Updated book, or every book when none matches",
                            "content": json_content(serde_json::json!({ "oneOf": [book.clone(), books.clone()] }))
                        },
                        "400": { "description": "Malformed body (strict mode)", "content": json_content(error.clone()) },
                        "404": { "description": "No matching book (strict mode)", "content": json_content(error.clone()) }
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": { "description": "Remaining books", "content": json_content(books) },
                        "404": { "description": "No matching book (strict mode)", "content": json_content(error) }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Author": {
                    "type": "object",
                    "properties": {
                        "firstname": { "type": "string" },
                        "lastname": { "type": "string" }
                    }
                },
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Identifier assigned by the service" },
                        "isbn": { "type": "string" },
                        "title": { "type": "string" },
                        "author": {
                            "oneOf": [
                                { "$ref": "#/components/schemas/Author" },
                                { "type": "null" }
                            ]
                        }
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(settings: &BooksSettings) -> Arc<BooksModule> {
    Arc::new(BooksModule::new(settings))
}
