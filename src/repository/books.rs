//! Books repository for database operations

use sqlx::{Pool, Sqlite};

#[cfg(test)]
use crate::error::NotFound;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookSort, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, total_copies, available_copies";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    #[cfg(test)]
    pub(crate) async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(NotFound::Book))
    }

    /// Insert a book with every copy available
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("A book with that ISBN already exists.".to_string())
            } else {
                e.into()
            }
        })
    }

    /// List books, optionally filtered by a title/author substring
    pub async fn list(&self, sort: BookSort, search: Option<&str>) -> AppResult<Vec<Book>> {
        let mut sql = format!("SELECT {BOOK_COLUMNS} FROM books");
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));

        if pattern.is_some() {
            sql.push_str(
                r" WHERE LOWER(title) LIKE LOWER(?) ESCAPE '\' OR LOWER(author) LIKE LOWER(?) ESCAPE '\'",
            );
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(sort.order_by());

        let mut query = sqlx::query_as::<_, Book>(&sql);
        if let Some(ref pattern) = pattern {
            query = query.bind(pattern).bind(pattern);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Books with at least one copy on the shelf, by title
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE available_copies > 0
            ORDER BY title COLLATE NOCASE ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}

/// Escape LIKE wildcards so search text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
