//! API integration tests, driving the router in-process against an in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use library_catalog::{
    api,
    clock::Clock,
    config::{AppConfig, DatabaseConfig},
    repository::Repository,
    services::Services,
    AppState,
};

/// Clock pinned to one calendar day
struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

fn opening_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

async fn app() -> Router {
    app_with_repository().await.0
}

async fn app_with_repository() -> (Router, Repository) {
    let config = AppConfig {
        database: DatabaseConfig::in_memory(),
        ..AppConfig::default()
    };

    let repository = Repository::connect(&config.database)
        .await
        .expect("Failed to open in-memory database");
    repository
        .migrate()
        .await
        .expect("Failed to run database migrations");

    let clock = Arc::new(FixedClock(opening_day()));
    let state = AppState {
        services: Arc::new(Services::new(repository.clone(), clock)),
    };

    (api::router(state), repository)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_homepage() {
    let app = app().await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fine_rate"], 5);
    assert_eq!(body["active_loans"], 0);
    assert!(body["links"].is_array());
}

#[tokio::test]
async fn test_add_and_list_books() {
    let app = app().await;

    let (status, body) = get(&app, "/add_book").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "");

    let (status, body) = post_form(
        &app,
        "/add_book",
        "title=Dune&author=Frank+Herbert&isbn=111&total_copies=2",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book added successfully.");
    assert_eq!(body["book"]["available_copies"], 2);

    post_form(&app, "/add_book", "title=emma&author=Jane+Austen&isbn=222&total_copies=5").await;

    let (status, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sort"], "title");
    assert_eq!(body["books"][0]["title"], "Dune");
    assert_eq!(body["books"][1]["title"], "emma");

    let (_, body) = get(&app, "/books?sort=available_copies").await;
    assert_eq!(body["sort"], "available_copies");
    assert_eq!(body["books"][0]["title"], "emma");

    let (_, body) = get(&app, "/books?sort=bogus&search=HERB").await;
    assert_eq!(body["sort"], "title");
    assert_eq!(body["search"], "HERB");
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"][0]["isbn"], "111");
}

#[tokio::test]
async fn test_add_book_validation_preserves_input() {
    let app = app().await;

    let (status, body) = post_form(
        &app,
        "/add_book",
        "title=+Dune+&author=Herbert&isbn=111&total_copies=many",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Total copies must be a number.");
    assert_eq!(body["form"]["title"], "Dune");
    assert_eq!(body["form"]["total_copies"], "many");

    let (status, body) = post_form(&app, "/add_book", "title=Dune&author=Herbert").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required.");

    let (status, body) =
        post_form(&app, "/add_book", "title=Dune&author=Herbert&isbn=111&total_copies=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Total copies must be greater than zero.");
}

#[tokio::test]
async fn test_duplicate_isbn_and_email_conflict() {
    let app = app().await;

    let form = "title=Dune&author=Herbert&isbn=111&total_copies=1";
    post_form(&app, "/add_book", form).await;
    let (status, body) = post_form(&app, "/add_book", form).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A book with that ISBN already exists.");
    assert_eq!(body["form"]["isbn"], "111");

    let (status, _) = post_form(&app, "/add_user", "name=Ada&email=ada%40example.org").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = post_form(&app, "/add_user", "name=Ada+Two&email=ada%40example.org").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A user with that email already exists.");
    assert_eq!(body["form"]["name"], "Ada Two");
}

#[tokio::test]
async fn test_users_are_listed_by_name() {
    let app = app().await;

    let (status, body) = post_form(&app, "/add_user", "name=&email=x%40example.org").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name and email are required.");

    post_form(&app, "/add_user", "name=zoe&email=z%40example.org").await;
    post_form(&app, "/add_user", "name=Adam&email=a%40example.org").await;

    let (status, body) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Adam");
    assert_eq!(body[1]["name"], "zoe");
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = app().await;

    post_form(&app, "/add_book", "title=Dune&author=Herbert&isbn=111&total_copies=1").await;
    post_form(&app, "/add_user", "name=One&email=one%40example.org").await;
    post_form(&app, "/add_user", "name=Two&email=two%40example.org").await;

    let (status, body) = get(&app, "/borrow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
    assert_eq!(body["available_books"].as_array().unwrap().len(), 1);

    let (status, body) = post_form(&app, "/borrow", "user_id=1&book_id=1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["borrow_date"], "2024-05-01");
    assert_eq!(body["due_date"], "2024-05-15");
    assert_eq!(body["message"], "Book borrowed successfully. Due date: 2024-05-15");
    let loan_id = body["loan_id"].as_i64().expect("No loan ID");

    // Last copy is out
    let (_, body) = get(&app, "/borrow").await;
    assert_eq!(body["available_books"].as_array().unwrap().len(), 0);

    let (status, body) = post_form(&app, "/borrow", "user_id=2&book_id=1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This book is no longer available.");

    let (status, body) = get(&app, "/loans").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fine_rate"], 5);
    assert_eq!(body["loans"][0]["user_name"], "One");
    assert_eq!(body["loans"][0]["book_title"], "Dune");
    assert_eq!(body["loans"][0]["fine"], 0);

    let (status, body) = get(&app, "/return").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loans"].as_array().unwrap().len(), 1);

    let (status, body) = post_form(&app, "/return", &format!("loan_id={}", loan_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fine"], 0);
    assert_eq!(body["days_late"], 0);
    assert_eq!(body["message"], "Book returned. No fine due.");
    assert_eq!(body["active_loans"].as_array().unwrap().len(), 0);

    let (status, body) = post_form(&app, "/return", &format!("loan_id={}", loan_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "That loan is not active or does not exist.");

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["books"][0]["available_copies"], 1);
}

#[tokio::test]
async fn test_return_succeeds_when_loan_listing_fails() {
    let (app, repository) = app_with_repository().await;

    post_form(&app, "/add_book", "title=Dune&author=Herbert&isbn=111&total_copies=1").await;
    post_form(&app, "/add_user", "name=One&email=one%40example.org").await;
    let (_, body) = post_form(&app, "/borrow", "user_id=1&book_id=1").await;
    let loan_id = body["loan_id"].as_i64().expect("No loan ID");

    // Break the active-loans join without touching the return path
    sqlx::query("ALTER TABLE users RENAME TO former_users")
        .execute(&repository.pool)
        .await
        .unwrap();

    let (status, body) = post_form(&app, "/return", &format!("loan_id={}", loan_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan_id"], loan_id);
    assert_eq!(body["message"], "Book returned. No fine due.");
    assert!(body["active_loans"].is_null());

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["books"][0]["available_copies"], 1);
}

#[tokio::test]
async fn test_duplicate_borrow_is_rejected() {
    let app = app().await;

    post_form(&app, "/add_book", "title=Dune&author=Herbert&isbn=111&total_copies=3").await;
    post_form(&app, "/add_user", "name=One&email=one%40example.org").await;

    let (status, _) = post_form(&app, "/borrow", "user_id=1&book_id=1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_form(&app, "/borrow", "user_id=1&book_id=1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "This user has already borrowed this book and not returned it yet."
    );

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["books"][0]["available_copies"], 2);
}

#[tokio::test]
async fn test_borrow_and_return_input_validation() {
    let app = app().await;

    let (status, body) = post_form(&app, "/borrow", "user_id=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select both a user and a book.");

    let (status, body) = post_form(&app, "/borrow", "user_id=one&book_id=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user or book selection.");
    assert_eq!(body["form"]["user_id"], "one");

    let (status, body) = post_form(&app, "/borrow", "user_id=7&book_id=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = post_form(&app, "/return", "loan_id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a loan to return.");

    let (status, body) = post_form(&app, "/return", "loan_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid loan selection.");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;

    let (status, body) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/borrow"].is_object());
}
