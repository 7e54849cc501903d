//! Loan model, fine computation and related types

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Days between borrowing and the due date
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Fine charged per day of lateness, in currency units
pub const FINE_RATE: i64 = 5;

/// Loan row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    /// `None` while the loan is active
    pub return_date: Option<NaiveDate>,
}

/// Due date for a loan starting on `borrow_date`
pub fn due_date_for(borrow_date: NaiveDate) -> NaiveDate {
    borrow_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// Lateness and fine for a loan, computed from its due date and today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Fine {
    pub days_late: i64,
    pub amount: i64,
}

impl Fine {
    /// Returns are free up to and including the due date; after that each day costs `FINE_RATE`.
    pub fn assess(due_date: NaiveDate, today: NaiveDate) -> Self {
        let days_late = (today - due_date).num_days().max(0);
        Self {
            days_late,
            amount: days_late * FINE_RATE,
        }
    }

    pub fn is_due(&self) -> bool {
        self.amount > 0
    }
}

/// Active loan joined with user and book details
#[derive(Debug, Clone, FromRow)]
pub struct ActiveLoanRow {
    pub id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub user_name: String,
    pub user_email: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Active loan for display, with a live fine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActiveLoan {
    pub id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub user_name: String,
    pub user_email: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_late: i64,
    pub fine: i64,
}

impl ActiveLoan {
    pub fn from_row(row: ActiveLoanRow, today: NaiveDate) -> Self {
        let fine = Fine::assess(row.due_date, today);
        Self {
            id: row.id,
            book_id: row.book_id,
            book_title: row.book_title,
            user_name: row.user_name,
            user_email: row.user_email,
            borrow_date: row.borrow_date,
            due_date: row.due_date,
            days_late: fine.days_late,
            fine: fine.amount,
        }
    }
}

/// Outcome of a successful borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub loan_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Outcome of a successful return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub loan_id: i64,
    pub return_date: NaiveDate,
    pub fine: Fine,
}

/// Borrow form, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BorrowForm {
    pub user_id: String,
    pub book_id: String,
}

impl BorrowForm {
    pub fn trimmed(&self) -> Self {
        Self {
            user_id: self.user_id.trim().to_string(),
            book_id: self.book_id.trim().to_string(),
        }
    }

    /// Parse into `(user_id, book_id)`
    pub fn parse(&self) -> AppResult<(i64, i64)> {
        if self.user_id.is_empty() || self.book_id.is_empty() {
            return Err(AppError::Validation(
                "Please select both a user and a book.".to_string(),
            ));
        }

        match (self.user_id.parse(), self.book_id.parse()) {
            (Ok(user_id), Ok(book_id)) => Ok((user_id, book_id)),
            _ => Err(AppError::Validation(
                "Invalid user or book selection.".to_string(),
            )),
        }
    }
}

/// Return form, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReturnForm {
    pub loan_id: String,
}

impl ReturnForm {
    pub fn trimmed(&self) -> Self {
        Self {
            loan_id: self.loan_id.trim().to_string(),
        }
    }

    pub fn parse(&self) -> AppResult<i64> {
        if self.loan_id.is_empty() {
            return Err(AppError::Validation(
                "Please select a loan to return.".to_string(),
            ));
        }

        self.loan_id
            .parse()
            .map_err(|_| AppError::Validation("Invalid loan selection.".to_string()))
    }
}
