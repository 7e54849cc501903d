//! HTTP handlers for the library catalog

pub mod books;
pub mod health;
pub mod home;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home::index))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Inventory
        .route("/add_book", get(books::add_book_form).post(books::add_book))
        .route("/books", get(books::list_books))
        // Patrons
        .route("/add_user", get(users::add_user_form).post(users::add_user))
        .route("/users", get(users::list_users))
        // Loans
        .route("/borrow", get(loans::borrow_form).post(loans::borrow))
        .route("/return", get(loans::return_form).post(loans::return_book))
        .route("/loans", get(loans::list_loans))
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
