//! Book (inventory) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i64,
    pub available_copies: i64,
}

/// Validated parameters for a new book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i64,
}

/// Add-book form, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AddBookForm {
    #[validate(length(min = 1, message = "All fields are required."))]
    pub title: String,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub author: String,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub isbn: String,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub total_copies: String,
}

impl AddBookForm {
    /// Copy of the form with every field trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            total_copies: self.total_copies.trim().to_string(),
        }
    }

    /// Check the (already trimmed) form and convert it to domain parameters
    pub fn parse(self) -> AppResult<NewBook> {
        if self.validate().is_err() {
            return Err(AppError::Validation("All fields are required.".to_string()));
        }

        let total_copies: i64 = self
            .total_copies
            .parse()
            .map_err(|_| AppError::Validation("Total copies must be a number.".to_string()))?;

        if total_copies <= 0 {
            return Err(AppError::Validation(
                "Total copies must be greater than zero.".to_string(),
            ));
        }

        Ok(NewBook {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            total_copies,
        })
    }
}

/// Book list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    /// Title, case-insensitive ascending
    #[default]
    Title,
    /// Most available copies first, then title
    AvailableCopies,
}

impl BookSort {
    /// Parse a sort key; anything unknown falls back to title order
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("available_copies") => BookSort::AvailableCopies,
            _ => BookSort::Title,
        }
    }

    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            BookSort::Title => "title COLLATE NOCASE ASC",
            BookSort::AvailableCopies => "available_copies DESC, title COLLATE NOCASE ASC",
        }
    }
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// `title` (default) or `available_copies`
    pub sort: Option<String>,
    /// Case-insensitive substring matched against title and author
    pub search: Option<String>,
}

impl BookQuery {
    pub fn sort(&self) -> BookSort {
        BookSort::from_param(self.sort.as_deref())
    }

    /// Search text, `None` when absent or blank
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
