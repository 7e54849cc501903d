//! Patron registry service

use crate::{
    error::AppResult,
    models::user::{NewUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct PatronsService {
    repository: Repository,
}

impl PatronsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a patron
    pub async fn add_user(&self, user: NewUser) -> AppResult<User> {
        let created = self.repository.users.create(&user).await?;
        tracing::info!("Patrons: registered user id={}", created.id);
        Ok(created)
    }

    /// All patrons, ordered by name
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }
}
