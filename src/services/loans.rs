//! Loan ledger service: borrowing, returns and fines

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    clock::Clock,
    error::AppResult,
    models::loan::{due_date_for, ActiveLoan, BorrowReceipt, Fine, ReturnReceipt},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Lend one copy of a book to a user for the standard loan period
    pub async fn borrow(&self, user_id: i64, book_id: i64) -> AppResult<BorrowReceipt> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;

        let borrow_date = self.today();
        let due_date = due_date_for(borrow_date);
        let loan_id = self
            .repository
            .loans
            .open(user_id, book_id, borrow_date, due_date)
            .await?;

        tracing::info!(
            "Loans: user {} borrowed book {} (loan {}, due {})",
            user_id,
            book_id,
            loan_id,
            due_date
        );

        Ok(BorrowReceipt {
            loan_id,
            borrow_date,
            due_date,
        })
    }

    /// Close an active loan and assess the fine owed for it
    pub async fn return_book(&self, loan_id: i64) -> AppResult<ReturnReceipt> {
        let today = self.today();
        let loan = self.repository.loans.close(loan_id, today).await?;
        let fine = Fine::assess(loan.due_date, today);

        if fine.is_due() {
            tracing::info!(
                "Loans: loan {} returned {} days late, fine {}",
                loan.id,
                fine.days_late,
                fine.amount
            );
        } else {
            tracing::info!("Loans: loan {} returned on time", loan.id);
        }

        Ok(ReturnReceipt {
            loan_id: loan.id,
            return_date: today,
            fine,
        })
    }

    /// Active loans, soonest due first, each with its fine as of today
    pub async fn list_active_loans(&self) -> AppResult<Vec<ActiveLoan>> {
        let today = self.today();
        let rows = self.repository.loans.list_active().await?;
        Ok(rows
            .into_iter()
            .map(|row| ActiveLoan::from_row(row, today))
            .collect())
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }
}
