//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, home, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Books, patrons, loans and overdue fines"
    ),
    paths(
        home::index,
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::add_book_form,
        books::add_book,
        books::list_books,
        // Users
        users::add_user_form,
        users::add_user,
        users::list_users,
        // Loans
        loans::borrow_form,
        loans::borrow,
        loans::return_form,
        loans::return_book,
        loans::list_loans,
    ),
    components(
        schemas(
            home::IndexResponse,
            home::Link,
            // Books
            crate::models::book::Book,
            crate::models::book::AddBookForm,
            crate::models::book::BookSort,
            crate::models::book::BookQuery,
            books::BookCreatedResponse,
            books::BookListResponse,
            // Users
            crate::models::user::User,
            crate::models::user::AddUserForm,
            users::UserCreatedResponse,
            // Loans
            crate::models::loan::ActiveLoan,
            crate::models::loan::BorrowForm,
            crate::models::loan::ReturnForm,
            loans::BorrowOptions,
            loans::BorrowResponse,
            loans::ActiveLoansResponse,
            loans::ReturnResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "home", description = "Service overview"),
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Inventory management"),
        (name = "users", description = "Patron registry"),
        (name = "loans", description = "Borrowing, returns and fines")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
