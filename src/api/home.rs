//! Homepage

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::FINE_RATE, AppState};

#[derive(Serialize, ToSchema)]
pub struct Link {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    pub name: String,
    pub version: String,
    pub fine_rate: i64,
    pub active_loans: i64,
    pub links: Vec<Link>,
}

const LINKS: [(&str, &str, &str); 11] = [
    ("GET", "/add_book", "Blank book form"),
    ("POST", "/add_book", "Add a book to inventory"),
    ("GET", "/books", "List books (sort=title|available_copies, search=text)"),
    ("GET", "/add_user", "Blank registration form"),
    ("POST", "/add_user", "Register a user"),
    ("GET", "/users", "List users"),
    ("GET", "/borrow", "Users and books available to borrow"),
    ("POST", "/borrow", "Borrow a book"),
    ("GET", "/return", "Active loans that can be returned"),
    ("POST", "/return", "Return a book and assess its fine"),
    ("GET", "/loans", "Active loans with live fines"),
];

/// Homepage
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 200, description = "Service overview", body = IndexResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<IndexResponse>> {
    let active_loans = state.services.loans.count_active().await?;

    Ok(Json(IndexResponse {
        name: "Library Catalog".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        fine_rate: FINE_RATE,
        active_loans,
        links: LINKS
            .iter()
            .map(|&(method, path, description)| Link {
                method: method.to_string(),
                path: path.to_string(),
                description: description.to_string(),
            })
            .collect(),
    }))
}
