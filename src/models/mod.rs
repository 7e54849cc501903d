//! Data models for the library catalog

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{AddBookForm, Book, BookQuery, BookSort, NewBook};
pub use loan::{ActiveLoan, BorrowForm, Fine, Loan, ReturnForm, FINE_RATE, LOAN_PERIOD_DAYS};
pub use user::{AddUserForm, NewUser, User};
