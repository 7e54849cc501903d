//! Inventory management service

use crate::{
    error::AppResult,
    models::book::{Book, BookSort, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to inventory with every copy available
    pub async fn add_book(&self, book: NewBook) -> AppResult<Book> {
        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            "Catalog: added book id={} isbn={} copies={}",
            created.id,
            created.isbn,
            created.total_copies
        );
        Ok(created)
    }

    /// List books in the requested order, optionally filtered by title/author
    pub async fn list_books(&self, sort: BookSort, search: Option<&str>) -> AppResult<Vec<Book>> {
        self.repository.books.list(sort, search).await
    }

    /// Books that can currently be borrowed
    pub async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }
}
