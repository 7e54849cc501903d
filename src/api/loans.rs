//! Loan management endpoints

use axum::{extract::State, http::StatusCode, Form, Json};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FormFailure, FormResult},
    models::{
        book::Book,
        loan::{ActiveLoan, BorrowForm, ReturnForm, FINE_RATE},
        user::User,
    },
    AppState,
};

/// Choices offered on the borrow form
#[derive(Serialize, ToSchema)]
pub struct BorrowOptions {
    pub users: Vec<User>,
    pub available_books: Vec<Book>,
}

/// Loan created response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub loan_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub message: String,
}

/// Active loans with the fine rate in force
#[derive(Serialize, ToSchema)]
pub struct ActiveLoansResponse {
    pub loans: Vec<ActiveLoan>,
    pub fine_rate: i64,
}

/// Return outcome, with the refreshed list of active loans
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub loan_id: i64,
    pub return_date: NaiveDate,
    pub days_late: i64,
    pub fine: i64,
    pub message: String,
    /// Omitted when the refreshed list could not be read; the return itself is committed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_loans: Option<Vec<ActiveLoan>>,
}

/// Users and books available for borrowing
#[utoipa::path(
    get,
    path = "/borrow",
    tag = "loans",
    responses(
        (status = 200, description = "Borrow choices", body = BorrowOptions)
    )
)]
pub async fn borrow_form(State(state): State<AppState>) -> AppResult<Json<BorrowOptions>> {
    let users = state.services.patrons.list_users().await?;
    let available_books = state.services.catalog.list_available_books().await?;

    Ok(Json(BorrowOptions {
        users,
        available_books,
    }))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    request_body(content = BorrowForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Loan created", body = BorrowResponse),
        (status = 400, description = "Missing or invalid selection", body = crate::error::ErrorResponse),
        (status = 404, description = "User or book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copies left or already borrowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow(
    State(state): State<AppState>,
    Form(form): Form<BorrowForm>,
) -> FormResult<(StatusCode, Json<BorrowResponse>)> {
    let form = form.trimmed();
    let (user_id, book_id) = form.parse().map_err(|e| FormFailure::new(e, &form))?;

    let receipt = state
        .services
        .loans
        .borrow(user_id, book_id)
        .await
        .map_err(|e| FormFailure::new(e, &form))?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            loan_id: receipt.loan_id,
            borrow_date: receipt.borrow_date,
            due_date: receipt.due_date,
            message: format!("Book borrowed successfully. Due date: {}", receipt.due_date),
        }),
    ))
}

/// Active loans that can be returned
#[utoipa::path(
    get,
    path = "/return",
    tag = "loans",
    responses(
        (status = 200, description = "Active loans", body = ActiveLoansResponse)
    )
)]
pub async fn return_form(State(state): State<AppState>) -> AppResult<Json<ActiveLoansResponse>> {
    list_loans(State(state)).await
}

/// Return a book and assess its fine
#[utoipa::path(
    post,
    path = "/return",
    tag = "loans",
    request_body(content = ReturnForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Missing or invalid loan", body = crate::error::ErrorResponse),
        (status = 404, description = "Loan not active", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Form(form): Form<ReturnForm>,
) -> FormResult<Json<ReturnResponse>> {
    let form = form.trimmed();
    let loan_id = form.parse().map_err(|e| FormFailure::new(e, &form))?;

    let receipt = state
        .services
        .loans
        .return_book(loan_id)
        .await
        .map_err(|e| FormFailure::new(e, &form))?;

    let message = if receipt.fine.is_due() {
        format!(
            "Book returned. Fine due: {} ({} days late).",
            receipt.fine.amount, receipt.fine.days_late
        )
    } else {
        "Book returned. No fine due.".to_string()
    };

    let active_loans = match state.services.loans.list_active_loans().await {
        Ok(loans) => Some(loans),
        Err(e) => {
            tracing::error!(
                "Loan {} returned but active loans could not be listed: {}",
                receipt.loan_id,
                e
            );
            None
        }
    };

    Ok(Json(ReturnResponse {
        loan_id: receipt.loan_id,
        return_date: receipt.return_date,
        days_late: receipt.fine.days_late,
        fine: receipt.fine.amount,
        message,
        active_loans,
    }))
}

/// Active loans with live fines
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "Active loans", body = ActiveLoansResponse)
    )
)]
pub async fn list_loans(State(state): State<AppState>) -> AppResult<Json<ActiveLoansResponse>> {
    let loans = state.services.loans.list_active_loans().await?;

    Ok(Json(ActiveLoansResponse {
        loans,
        fine_rate: FINE_RATE,
    }))
}
