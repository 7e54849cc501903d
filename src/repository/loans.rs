//! Loans repository for database operations
//!
//! Opening and closing a loan each run in a single transaction together with
//! the matching `available_copies` adjustment, so inventory and loan history
//! never disagree. Availability is claimed with a conditional update rather
//! than a read-then-write, and the partial unique index on active
//! `(user_id, book_id)` pairs backs up the duplicate-loan check.

use chrono::NaiveDate;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult, NotFound},
    models::loan::{ActiveLoanRow, Loan},
};

const DUPLICATE_LOAN: &str = "This user has already borrowed this book and not returned it yet.";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID, active or closed
    #[cfg(test)]
    pub(crate) async fn get_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, user_id, book_id, borrow_date, due_date, return_date FROM loans WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Take one copy of `book_id` off the shelf and record the loan
    pub async fn open(
        &self,
        user_id: i64,
        book_id: i64,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;

        // The conditional decrement goes first so the transaction takes the
        // write lock up front instead of upgrading from a read lock.
        let claimed = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE id = ? AND available_copies > 0
            "#,
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = ?")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

            return Err(match exists {
                Some(_) => AppError::Availability("This book is no longer available.".to_string()),
                None => AppError::NotFound(NotFound::Book),
            });
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE user_id = ? AND book_id = ? AND return_date IS NULL",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(AppError::DuplicateLoan(DUPLICATE_LOAN.to_string()));
        }

        let loan_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO loans (user_id, book_id, borrow_date, due_date, return_date)
            VALUES (?, ?, ?, ?, NULL)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(borrow_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::DuplicateLoan(DUPLICATE_LOAN.to_string())
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;

        Ok(loan_id)
    }

    /// Close an active loan and put the copy back on the shelf
    pub async fn close(&self, loan_id: i64, return_date: NaiveDate) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET return_date = ?
            WHERE id = ? AND return_date IS NULL
            RETURNING id, user_id, book_id, borrow_date, due_date, return_date
            "#,
        )
        .bind(return_date)
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound(NotFound::ActiveLoan))?;

        let restored = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + 1
            WHERE id = ? AND available_copies < total_copies
            "#,
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?;

        if restored.rows_affected() == 0 {
            tracing::warn!(
                "Book {} already has every copy on the shelf; loan {} closed without restock",
                loan.book_id,
                loan.id
            );
        }

        tx.commit().await?;

        Ok(loan)
    }

    /// Active loans with borrower and title, soonest due first
    pub async fn list_active(&self) -> AppResult<Vec<ActiveLoanRow>> {
        let rows = sqlx::query_as::<_, ActiveLoanRow>(
            r#"
            SELECT l.id, l.book_id, l.borrow_date, l.due_date,
                   u.name AS user_name, u.email AS user_email,
                   b.title AS book_title
            FROM loans l
            JOIN users u ON l.user_id = u.id
            JOIN books b ON l.book_id = b.id
            WHERE l.return_date IS NULL
            ORDER BY l.due_date ASC, l.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE return_date IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
