//! User (patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// User row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Validated parameters for a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Registration form, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AddUserForm {
    #[validate(length(min = 1, message = "Name and email are required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Name and email are required."))]
    pub email: String,
}

impl AddUserForm {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    pub fn parse(self) -> AppResult<NewUser> {
        self.validate()
            .map_err(|_| AppError::Validation("Name and email are required.".to_string()))?;

        Ok(NewUser {
            name: self.name,
            email: self.email,
        })
    }
}
