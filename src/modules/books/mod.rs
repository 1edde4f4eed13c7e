pub mod collection;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_kernel::{InitCtx, Module};
use utoipa::openapi::OpenApi;

pub use collection::BookCollection;
pub use error::{BookAction, BookError};
pub use models::{BookFilter, BookPayload, BookRecord, BookSummary};
pub use store::{BookStore, InMemoryBookStore};

/// Book collection module, mounted under `/api/books`.
///
/// The module owns its collection; every router built from it shares the
/// same store.
pub struct BooksModule {
    collection: BookCollection,
}

impl BooksModule {
    pub fn new() -> Self {
        Self::with_collection(BookCollection::in_memory())
    }

    pub fn with_collection(collection: BookCollection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &BookCollection {
        &self.collection
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.collection.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let (router, _) = handlers::router(self.collection.clone()).split_for_parts();
        router
    }

    fn openapi(&self) -> Option<OpenApi> {
        let (_, openapi) = handlers::router(self.collection.clone()).split_for_parts();
        Some(openapi)
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            discarded = self.collection.len(),
            "books module stopped"
        );
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
