//! Inventory endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FormFailure, FormResult},
    models::book::{AddBookForm, Book, BookQuery, BookSort},
    AppState,
};

/// Book created response
#[derive(Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub message: String,
    pub book: Book,
}

/// Book list with the effective sort key and search text
#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub sort: BookSort,
    pub search: String,
}

/// Blank add-book form
#[utoipa::path(
    get,
    path = "/add_book",
    tag = "books",
    responses(
        (status = 200, description = "Empty form", body = AddBookForm)
    )
)]
pub async fn add_book_form() -> Json<AddBookForm> {
    Json(AddBookForm::default())
}

/// Add a book to inventory
#[utoipa::path(
    post,
    path = "/add_book",
    tag = "books",
    request_body(content = AddBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Book added", body = BookCreatedResponse),
        (status = 400, description = "Missing or malformed field", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    Form(form): Form<AddBookForm>,
) -> FormResult<(StatusCode, Json<BookCreatedResponse>)> {
    let form = form.trimmed();
    let new_book = form.clone().parse().map_err(|e| FormFailure::new(e, &form))?;

    let book = state
        .services
        .catalog
        .add_book(new_book)
        .await
        .map_err(|e| FormFailure::new(e, &form))?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            message: "Book added successfully.".to_string(),
            book,
        }),
    ))
}

/// List books with sorting and search
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookListResponse>> {
    let sort = query.sort();
    let search = query.search();

    let books = state.services.catalog.list_books(sort, search).await?;

    Ok(Json(BookListResponse {
        books,
        sort,
        search: search.unwrap_or_default().to_string(),
    }))
}
